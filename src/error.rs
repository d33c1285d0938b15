//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use std::path::PathBuf;
use thiserror::Error;

/// URL Vitals 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum UrlVitalsError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 探测器相关错误
    #[error("探测错误: {0}")]
    Probe(#[from] ProbeError),

    /// 最近URL记录相关错误
    #[error("最近URL记录错误: {0}")]
    Recency(#[from] RecencyError),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON序列化/反序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },
}

/// 探测器错误类型
///
/// 单次探测的网络失败不会变成错误，只会体现在探测状态里。
#[derive(Error, Debug)]
pub enum ProbeError {
    /// HTTP客户端构建失败
    #[error("HTTP客户端创建失败: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// 最近URL记录错误类型
#[derive(Error, Debug)]
pub enum RecencyError {
    /// 写入记录文件失败
    #[error("写入最近URL文件失败 {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 删除记录文件失败
    #[error("删除最近URL文件失败 {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 序列化记录失败
    #[error("序列化最近URL列表失败: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, UrlVitalsError>;
