//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// URL Vitals - 多URL健康监控工具
#[derive(Parser, Debug, Clone)]
#[command(
    name = "url-vitals",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 配置文件路径
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "配置文件路径",
        env = "URL_VITALS_CONFIG"
    )]
    pub config: Option<PathBuf>,

    /// 日志级别，未指定时使用配置文件中的级别
    #[arg(
        short,
        long,
        value_enum,
        help = "日志级别",
        env = "URL_VITALS_LOG_LEVEL"
    )]
    pub log_level: Option<LogLevel>,

    /// 最近URL记录文件
    #[arg(
        long,
        value_name = "FILE",
        help = "最近URL记录文件",
        env = "URL_VITALS_RECENT_FILE"
    )]
    pub recent_file: Option<PathBuf>,

    /// 日志使用JSON格式
    #[arg(long, help = "日志使用JSON格式")]
    pub json_logs: bool,

    /// 日志文件，指定后日志只写入该文件
    #[arg(
        long,
        value_name = "FILE",
        help = "日志文件路径",
        env = "URL_VITALS_LOG_FILE"
    )]
    pub log_file: Option<PathBuf>,

    /// 子命令
    #[command(subcommand)]
    pub command: Commands,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// 子命令定义
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// 检测输入的所有URL，并记入最近URL
    Check {
        /// 要检测的URL，按输入顺序编号
        #[arg(value_name = "URL", required = true, help = "要检测的URL")]
        urls: Vec<String>,

        /// 输出格式
        #[arg(short, long, value_enum, default_value = "table", help = "输出格式")]
        format: OutputFormat,

        /// 超时时间（秒）
        #[arg(
            short,
            long,
            value_name = "SECONDS",
            help = "超时时间（秒）",
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        timeout: Option<u64>,
    },

    /// 重新检测最近URL一次
    Refresh {
        /// 输出格式
        #[arg(short, long, value_enum, default_value = "table", help = "输出格式")]
        format: OutputFormat,
    },

    /// 先检测输入的URL，然后定时刷新最近URL直到按下Ctrl+C
    Watch {
        /// 启动时检测的URL，不指定则使用配置文件中的urls
        #[arg(value_name = "URL", help = "启动时检测的URL")]
        urls: Vec<String>,

        /// 刷新间隔（秒）
        #[arg(
            short,
            long,
            value_name = "SECONDS",
            help = "刷新间隔（秒）",
            env = "URL_VITALS_INTERVAL",
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        interval: Option<u64>,

        /// 输出格式
        #[arg(short, long, value_enum, default_value = "table", help = "输出格式")]
        format: OutputFormat,
    },

    /// 查看最近检测过的URL
    Recent {
        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,

        /// 清空记录
        #[arg(long, help = "清空最近URL记录")]
        clear: bool,
    },

    /// 初始化配置文件
    Init {
        /// 配置文件路径
        #[arg(
            value_name = "FILE",
            help = "配置文件路径",
            default_value = "url-vitals.toml"
        )]
        config_path: PathBuf,

        /// 是否覆盖现有文件
        #[arg(short, long, help = "覆盖现有文件")]
        force: bool,
    },

    /// 显示版本信息
    Version {
        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,
    },
}

/// 输出格式枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// 文本格式
    Text,
    /// JSON格式
    Json,
    /// 表格格式
    Table,
}

impl Args {
    /// 获取配置文件路径
    pub fn get_config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::get_default_config_path)
    }
}
