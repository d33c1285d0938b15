//! 最近URL记录模块
//!
//! 维护最近检测过的URL列表并持久化到磁盘

pub mod store;

// 重新导出主要类型
pub use store::{merge_recent, JsonRecencyStore, RecencyStore, DEFAULT_RECENT_LIMIT};
