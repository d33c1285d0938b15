//! 检测调度器模块
//!
//! 负责手动批量检测和定时自动刷新最近URL

use crate::health::checker::{normalize_url, Prober};
use crate::health::result::{CheckBatch, CheckTrigger, ProbeResult};
use crate::recent::RecencyStore;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// 默认自动刷新间隔
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// 检测批次回调函数类型，每个新批次整体替换上一次的结果表
pub type BatchCallback = Arc<dyn Fn(&CheckBatch) + Send + Sync>;

/// 调度器trait，定义两种检测触发方式
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// 手动检测所有输入的URL
    ///
    /// # 参数
    /// * `urls` - 按输入顺序排列的URL，空白项会被忽略
    ///
    /// # 返回
    /// * `CheckBatch` - 序号从1开始按输入顺序分配
    async fn check_all(&self, urls: Vec<String>) -> CheckBatch;

    /// 重新检测最近URL记录中的所有URL，不修改记录
    async fn auto_refresh_recent(&self) -> CheckBatch;
}

/// 调度器实现
pub struct TaskScheduler {
    /// 探测器
    prober: Arc<dyn Prober>,
    /// 最近URL存储
    recent: Arc<dyn RecencyStore>,
    /// 自动刷新间隔
    refresh_interval: Duration,
    /// 同一批次内的最大并发探测数
    max_concurrent: usize,
    /// 保证同一时间只有一个批次在执行
    trigger_lock: Mutex<()>,
    /// 检测批次回调
    batch_callback: RwLock<Option<BatchCallback>>,
}

impl TaskScheduler {
    /// 创建新的调度器
    ///
    /// # 参数
    /// * `prober` - 探测器
    /// * `recent` - 最近URL存储
    pub fn new(prober: Arc<dyn Prober>, recent: Arc<dyn RecencyStore>) -> Self {
        Self {
            prober,
            recent,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            max_concurrent: 1,
            trigger_lock: Mutex::new(()),
            batch_callback: RwLock::new(None),
        }
    }

    /// 设置自动刷新间隔
    ///
    /// 间隔为0时保留原来的间隔。
    pub fn with_refresh_interval(mut self, refresh_interval: Duration) -> Self {
        if refresh_interval.is_zero() {
            warn!("自动刷新间隔不能为0，继续使用 {:?}", self.refresh_interval);
            return self;
        }
        self.refresh_interval = refresh_interval;
        self
    }

    /// 设置批次内最大并发探测数
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// 自动刷新间隔
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// 设置检测批次回调
    pub async fn set_batch_callback(&self, callback: BatchCallback) {
        let mut cb = self.batch_callback.write().await;
        *cb = Some(callback);
    }

    /// 把批次交给回调
    async fn deliver(&self, batch: &CheckBatch) {
        let callback_guard = self.batch_callback.read().await;
        if let Some(ref callback) = *callback_guard {
            callback(batch);
        }
    }

    /// 依次探测一组URL
    ///
    /// 并发数大于1时结果仍按输入顺序返回，序号与完成顺序无关。
    async fn probe_all(&self, urls: Vec<String>, trigger: CheckTrigger) -> Vec<ProbeResult> {
        let failure = trigger.failure_label();

        stream::iter(urls.into_iter().enumerate())
            .map(|(index, url)| {
                let prober = Arc::clone(&self.prober);
                let sequence_number = index as u32 + 1;
                async move {
                    debug!("检测URL {}: {}", sequence_number, url);
                    prober
                        .probe(&url, failure)
                        .await
                        .with_sequence_number(sequence_number)
                }
            })
            .buffered(self.max_concurrent)
            .collect()
            .await
    }

    /// 运行自动刷新循环，直到收到关闭信号
    ///
    /// 第一次刷新在启动后一个间隔触发。
    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) {
        let mut ticker = interval(self.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval 的第一次 tick 立即完成
        ticker.tick().await;

        info!("自动刷新已启动，间隔: {:?}", self.refresh_interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // 刷新进行中也要响应关闭信号
                    tokio::select! {
                        batch = self.auto_refresh_recent() => {
                            debug!("自动刷新完成，结果数量: {}", batch.len());
                        }
                        _ = shutdown_rx.recv() => {
                            info!("自动刷新已停止，放弃进行中的批次");
                            break;
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("自动刷新已停止");
                    break;
                }
            }
        }
    }
}

#[async_trait]
impl Scheduler for TaskScheduler {
    async fn check_all(&self, urls: Vec<String>) -> CheckBatch {
        let _guard = self.trigger_lock.lock().await;

        let urls: Vec<String> = urls
            .iter()
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
            .map(normalize_url)
            .collect();

        info!("开始检测所有URL，数量: {}", urls.len());

        let results = self.probe_all(urls.clone(), CheckTrigger::Manual).await;
        let batch = CheckBatch::new(CheckTrigger::Manual, results);
        self.deliver(&batch).await;

        // 空批次也写回记录，损坏的文件会被重写为空列表
        if let Err(e) = self.recent.update(&urls).await {
            error!("更新最近URL记录失败: {}", e);
        }

        batch
    }

    async fn auto_refresh_recent(&self) -> CheckBatch {
        let _guard = self.trigger_lock.lock().await;

        let recent_urls = self.recent.load().await;
        info!("自动刷新最近URL，数量: {}", recent_urls.len());

        let results = self
            .probe_all(recent_urls, CheckTrigger::AutoRefresh)
            .await;
        let batch = CheckBatch::new(CheckTrigger::AutoRefresh, results);
        self.deliver(&batch).await;

        batch
    }
}
