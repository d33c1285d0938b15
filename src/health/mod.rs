//! 健康检测模块
//!
//! 提供URL探测、结果分类和检测调度功能

pub mod checker;
pub mod result;
pub mod scheduler;

// 重新导出主要类型
pub use checker::{normalize_url, HttpProber, Prober, DEFAULT_TIMEOUT};
pub use result::{
    CheckBatch, CheckTrigger, FailureLabel, ProbeResult, ProbeStatus, ResponseTime,
    INFINITE_SENTINEL, SLOW_RESPONSE_THRESHOLD,
};
pub use scheduler::{BatchCallback, Scheduler, TaskScheduler, DEFAULT_REFRESH_INTERVAL};
