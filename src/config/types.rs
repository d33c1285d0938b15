//! 配置数据结构定义
//!
//! 定义应用程序的配置结构体和验证逻辑

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 主配置结构
///
/// 所有字段都有默认值，缺省配置与内置常量一致。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    /// 自动刷新间隔（秒）
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
    /// 最近URL记录文件
    #[serde(default = "default_recent_urls_file")]
    pub recent_urls_file: PathBuf,
    /// 最近URL保留数量
    #[serde(default = "default_recent_urls_limit")]
    pub recent_urls_limit: usize,
    /// 同一批次内最大并发探测数，1表示逐个探测
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_probes: usize,
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 启动时预填的URL
    #[serde(default)]
    pub urls: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_timeout_seconds: default_timeout(),
            refresh_interval_seconds: default_refresh_interval(),
            recent_urls_file: default_recent_urls_file(),
            recent_urls_limit: default_recent_urls_limit(),
            max_concurrent_probes: default_max_concurrent(),
            log_level: default_log_level(),
            urls: Vec::new(),
        }
    }
}

impl Config {
    /// 请求超时时间
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// 自动刷新间隔
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }
}

// 默认值函数
fn default_timeout() -> u64 {
    5
}
fn default_refresh_interval() -> u64 {
    10
}
fn default_recent_urls_file() -> PathBuf {
    PathBuf::from("recent_urls.json")
}
fn default_recent_urls_limit() -> usize {
    5
}
fn default_max_concurrent() -> usize {
    1
}
fn default_log_level() -> String {
    "info".to_string()
}

/// 配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &Config) -> Result<(), String> {
    if config.request_timeout_seconds == 0 {
        return Err("请求超时时间不能为0".to_string());
    }

    if config.refresh_interval_seconds == 0 {
        return Err("自动刷新间隔不能为0".to_string());
    }

    if config.recent_urls_limit == 0 {
        return Err("最近URL保留数量不能为0".to_string());
    }

    if config.max_concurrent_probes == 0 {
        return Err("最大并发探测数不能为0".to_string());
    }

    if config.recent_urls_file.as_os_str().is_empty() {
        return Err("最近URL记录文件路径不能为空".to_string());
    }

    let valid_log_levels = ["debug", "info", "warn", "error"];
    if !valid_log_levels.contains(&config.log_level.as_str()) {
        return Err(format!(
            "无效的日志级别: {}，支持的级别: {:?}",
            config.log_level, valid_log_levels
        ));
    }

    if let Some(url) = config.urls.iter().find(|u| u.trim().is_empty()) {
        return Err(format!("预填URL不能为空字符串: {url:?}"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_builtin_constants() {
        let config = Config::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.refresh_interval(), Duration::from_secs(10));
        assert_eq!(config.recent_urls_file, PathBuf::from("recent_urls.json"));
        assert_eq!(config.recent_urls_limit, 5);
        assert_eq!(config.max_concurrent_probes, 1);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validate_zero_values() {
        let mut config = Config::default();
        config.request_timeout_seconds = 0;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.refresh_interval_seconds = 0;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.recent_urls_limit = 0;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.max_concurrent_probes = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = Config::default();
        config.log_level = "verbose".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.contains("verbose"));
    }

    #[test]
    fn test_validate_blank_url() {
        let mut config = Config::default();
        config.urls = vec!["example.com".to_string(), "  ".to_string()];
        assert!(validate_config(&config).is_err());
    }
}
