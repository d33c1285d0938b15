//! 命令处理逻辑
//!
//! 实现各种CLI命令的处理逻辑

use crate::cli::args::{Args, Commands, OutputFormat};
use crate::cli::render::{render_batch, render_recent};
use crate::config::Config;
use crate::error::Result;
use crate::health::{HttpProber, Scheduler, TaskScheduler};
use crate::input::UrlInputs;
use crate::logging::LoggingSystem;
use crate::recent::{JsonRecencyStore, RecencyStore};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

/// 命令执行上下文
pub struct CommandContext {
    /// 生效的配置（已应用命令行覆盖）
    pub config: Config,
    /// 日志系统
    pub logging: Arc<LoggingSystem>,
}

impl CommandContext {
    /// 最近URL存储
    pub fn recency_store(&self) -> JsonRecencyStore {
        JsonRecencyStore::new(
            self.config.recent_urls_file.clone(),
            self.config.recent_urls_limit,
        )
    }

    /// 按配置创建调度器
    ///
    /// # 参数
    /// * `timeout` - 覆盖配置中的请求超时时间
    pub fn build_scheduler(&self, timeout: Option<Duration>) -> Result<TaskScheduler> {
        let prober = HttpProber::new(timeout.unwrap_or_else(|| self.config.request_timeout()))?;

        Ok(TaskScheduler::new(Arc::new(prober), Arc::new(self.recency_store()))
            .with_refresh_interval(self.config.refresh_interval())
            .with_max_concurrent(self.config.max_concurrent_probes))
    }
}

/// 命令处理器trait
#[async_trait]
pub trait Command: Send + Sync {
    /// 执行命令
    async fn execute(&self, args: &Args, ctx: &CommandContext) -> Result<()>;
}

/// 版本命令
pub struct VersionCommand;

#[async_trait]
impl Command for VersionCommand {
    async fn execute(&self, args: &Args, _ctx: &CommandContext) -> Result<()> {
        if let Commands::Version { format } = &args.command {
            match format {
                OutputFormat::Json => {
                    let version_info = serde_json::json!({
                        "name": crate::APP_NAME,
                        "version": crate::VERSION,
                        "description": crate::APP_DESCRIPTION
                    });
                    println!("{}", serde_json::to_string_pretty(&version_info)?);
                }
                _ => {
                    println!("{} v{}", crate::APP_NAME, crate::VERSION);
                    println!("{}", crate::APP_DESCRIPTION);
                }
            }
        }
        Ok(())
    }
}

/// 初始化命令
pub struct InitCommand;

#[async_trait]
impl Command for InitCommand {
    async fn execute(&self, args: &Args, _ctx: &CommandContext) -> Result<()> {
        if let Commands::Init { config_path, force } = &args.command {
            self.create_config_file(config_path, *force).await
        } else {
            Ok(())
        }
    }
}

impl InitCommand {
    /// 默认配置模板
    const TEMPLATE: &'static str = include_str!("../../demos/url-vitals.toml");

    /// 创建配置文件
    async fn create_config_file(&self, config_path: &Path, force: bool) -> Result<()> {
        if config_path.exists() && !force {
            eprintln!("配置文件已存在: {}", config_path.display());
            eprintln!("使用 --force 参数覆盖现有文件");
            return Ok(());
        }

        if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(config_path, Self::TEMPLATE).await?;

        println!("配置文件已创建: {}", config_path.display());
        Ok(())
    }
}

/// 手动检测命令
pub struct CheckCommand;

#[async_trait]
impl Command for CheckCommand {
    async fn execute(&self, args: &Args, ctx: &CommandContext) -> Result<()> {
        if let Commands::Check {
            urls,
            format,
            timeout,
        } = &args.command
        {
            let mut inputs = UrlInputs::from_urls(urls.iter().cloned());
            let to_check = inputs.take_for_check();
            if to_check.is_empty() {
                eprintln!("没有可检测的URL");
                return Ok(());
            }

            let scheduler = ctx.build_scheduler(timeout.map(Duration::from_secs))?;
            let batch = scheduler.check_all(to_check).await;

            ctx.logging.batch_log(&batch);
            println!("{}", render_batch(&batch, format)?);
        }
        Ok(())
    }
}

/// 单次自动刷新命令
pub struct RefreshCommand;

#[async_trait]
impl Command for RefreshCommand {
    async fn execute(&self, args: &Args, ctx: &CommandContext) -> Result<()> {
        if let Commands::Refresh { format } = &args.command {
            let scheduler = ctx.build_scheduler(None)?;
            let batch = scheduler.auto_refresh_recent().await;

            ctx.logging.batch_log(&batch);
            println!("{}", render_batch(&batch, format)?);
        }
        Ok(())
    }
}

/// 持续监控命令
pub struct WatchCommand;

#[async_trait]
impl Command for WatchCommand {
    async fn execute(&self, args: &Args, ctx: &CommandContext) -> Result<()> {
        if let Commands::Watch {
            urls,
            interval,
            format,
        } = &args.command
        {
            let mut scheduler = ctx.build_scheduler(None)?;
            if let Some(secs) = interval {
                scheduler = scheduler.with_refresh_interval(Duration::from_secs(*secs));
            }
            let scheduler = Arc::new(scheduler);

            // 每个批次整体替换上一次输出的结果表
            let logging = Arc::clone(&ctx.logging);
            let format = format.clone();
            scheduler
                .set_batch_callback(Arc::new(move |batch| {
                    logging.batch_log(batch);
                    match render_batch(batch, &format) {
                        Ok(output) => println!("{output}\n"),
                        Err(e) => error!("渲染检测结果失败: {}", e),
                    }
                }))
                .await;

            let initial = if urls.is_empty() {
                ctx.config.urls.clone()
            } else {
                urls.clone()
            };
            let to_check = UrlInputs::from_urls(initial).take_for_check();
            if !to_check.is_empty() {
                scheduler.check_all(to_check).await;
            }

            let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
            tokio::spawn(async move {
                match signal::ctrl_c().await {
                    Ok(()) => {
                        info!("收到中断信号，正在停止...");
                        let _ = shutdown_tx.send(());
                    }
                    Err(err) => {
                        error!("监听中断信号失败: {}", err);
                    }
                }
            });

            scheduler.run(shutdown_rx).await;
        }
        Ok(())
    }
}

/// 最近URL命令
pub struct RecentCommand;

#[async_trait]
impl Command for RecentCommand {
    async fn execute(&self, args: &Args, ctx: &CommandContext) -> Result<()> {
        if let Commands::Recent { format, clear } = &args.command {
            let store = ctx.recency_store();
            if *clear {
                store.clear().await?;
                println!("最近URL记录已清空: {}", store.path().display());
                return Ok(());
            }

            let urls = store.load().await;
            println!("{}", render_recent(&urls, format)?);
        }
        Ok(())
    }
}
