//! 最近URL存储实现
//!
//! 记录文件是一个JSON字符串数组，最新一批检测的URL排在最前面。

use crate::error::RecencyError;
use async_trait::async_trait;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 默认保留的最近URL数量
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// 最近URL存储trait
#[async_trait]
pub trait RecencyStore: Send + Sync {
    /// 读取最近URL列表
    ///
    /// 文件不存在或内容无效时返回空列表，从不失败。
    async fn load(&self) -> Vec<String>;

    /// 把新检测的URL合并进记录并写回
    ///
    /// # 返回
    /// * 写入后的完整列表
    async fn update(&self, new_urls: &[String]) -> Result<Vec<String>, RecencyError>;

    /// 清空记录
    async fn clear(&self) -> Result<(), RecencyError>;
}

/// 合并最近URL列表
///
/// 新URL在前、旧记录在后，去重时保留第一次出现的位置，最后截断到 `limit`。
pub fn merge_recent(new_urls: &[String], existing: &[String], limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    new_urls
        .iter()
        .chain(existing)
        .filter(|url| seen.insert(*url))
        .take(limit)
        .cloned()
        .collect()
}

/// 基于JSON文件的最近URL存储
#[derive(Debug, Clone)]
pub struct JsonRecencyStore {
    /// 记录文件路径
    path: PathBuf,
    /// 最大保留数量
    limit: usize,
}

impl JsonRecencyStore {
    /// 创建新的存储
    pub fn new(path: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            path: path.into(),
            limit,
        }
    }

    /// 记录文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 最大保留数量
    pub fn limit(&self) -> usize {
        self.limit
    }

    fn write_error(&self, source: std::io::Error) -> RecencyError {
        RecencyError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl RecencyStore for JsonRecencyStore {
    async fn load(&self) -> Vec<String> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("最近URL文件不存在: {}", self.path.display());
                return Vec::new();
            }
            Err(e) => {
                warn!("读取最近URL文件失败 {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&content) {
            Ok(urls) => urls,
            Err(e) => {
                warn!(
                    "最近URL文件格式无效，按空记录处理 {}: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    async fn update(&self, new_urls: &[String]) -> Result<Vec<String>, RecencyError> {
        let existing = self.load().await;
        let updated = merge_recent(new_urls, &existing, self.limit);

        let json_data = serde_json::to_string(&updated)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.write_error(e))?;
        }

        tokio::fs::write(&self.path, json_data)
            .await
            .map_err(|e| self.write_error(e))?;

        debug!("最近URL已更新: {:?}", updated);
        Ok(updated)
    }

    async fn clear(&self) -> Result<(), RecencyError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(RecencyError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
