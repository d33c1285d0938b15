//! URL Vitals 主程序入口
//!
//! 多URL健康监控工具

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{debug, error};
use url_vitals::cli::args::{Args, Commands, LogLevel};
use url_vitals::cli::commands::{
    CheckCommand, Command, CommandContext, InitCommand, RecentCommand, RefreshCommand,
    VersionCommand, WatchCommand,
};
use url_vitals::config::{self, ConfigLoader, TomlConfigLoader};
use url_vitals::logging::{LogConfig, LoggingSystem};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse();

    let config = match load_config(&args).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("加载配置失败: {e:#}");
            std::process::exit(1);
        }
    };

    // 初始化日志系统，命令行级别优先于配置文件
    let level = args
        .log_level
        .clone()
        .or_else(|| config.log_level.parse::<LogLevel>().ok())
        .unwrap_or(LogLevel::Info);
    let log_config = LogConfig {
        level: level.into(),
        file_path: args.log_file.clone(),
        console: args.log_file.is_none(),
        json_format: args.json_logs,
        // HTTP客户端内部日志只保留警告
        module_levels: [
            ("hyper_util".to_string(), log::LevelFilter::Warn),
            ("reqwest".to_string(), log::LevelFilter::Warn),
        ]
        .into_iter()
        .collect(),
    };

    let logging = LoggingSystem::setup_logging(log_config).context("初始化日志系统失败")?;

    debug!("URL Vitals v{} 启动", url_vitals::VERSION);

    let ctx = CommandContext {
        config,
        logging: Arc::new(logging),
    };

    // 执行命令
    if let Err(e) = execute_command(&args, &ctx).await {
        error!("命令执行失败: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// 加载配置文件并应用命令行覆盖
///
/// 显式指定的配置文件必须存在；默认路径下没有配置文件时使用内置默认值。
async fn load_config(args: &Args) -> Result<config::Config> {
    let loader = TomlConfigLoader::new(true);

    let mut config = match &args.config {
        Some(path) => loader
            .load_from_file(path)
            .await
            .with_context(|| format!("加载配置文件失败: {}", path.display()))?,
        None => {
            let path = args.get_config_path();
            loader
                .load_or_default(&path)
                .await
                .with_context(|| format!("加载配置文件失败: {}", path.display()))?
        }
    };

    if let Some(recent_file) = &args.recent_file {
        config.recent_urls_file = recent_file.clone();
    }

    Ok(config)
}

/// 执行CLI命令
async fn execute_command(args: &Args, ctx: &CommandContext) -> Result<()> {
    let command: Box<dyn Command> = match &args.command {
        Commands::Check { .. } => Box::new(CheckCommand),
        Commands::Refresh { .. } => Box::new(RefreshCommand),
        Commands::Watch { .. } => Box::new(WatchCommand),
        Commands::Recent { .. } => Box::new(RecentCommand),
        Commands::Init { .. } => Box::new(InitCommand),
        Commands::Version { .. } => Box::new(VersionCommand),
    };

    command.execute(args, ctx).await.map_err(anyhow::Error::from)
}
