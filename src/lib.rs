//! URL Vitals - 多URL健康监控工具
//!
//! 这是一个用Rust编写的URL健康监控工具，支持：
//! - 批量HTTP健康检测，按输入顺序编号
//! - 最近检测URL的持久化记录
//! - 定时自动刷新最近URL
//! - 结构化日志记录

pub mod cli;
pub mod config;
pub mod error;
pub mod health;
pub mod input;
pub mod logging;
pub mod recent;

// 重新导出主要类型
pub use config::Config;
pub use error::UrlVitalsError;
pub use health::{CheckBatch, HttpProber, ProbeResult, ProbeStatus, ResponseTime, TaskScheduler};
pub use input::UrlInputs;
pub use recent::{JsonRecencyStore, RecencyStore};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
