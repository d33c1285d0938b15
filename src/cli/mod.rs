//! 命令行接口模块
//!
//! 提供CLI参数解析、命令处理和结果输出功能

pub mod args;
pub mod commands;
pub mod render;

// 重新导出主要类型
pub use args::Args;
pub use commands::{Command, CommandContext};
pub use render::{render_batch, render_recent};
