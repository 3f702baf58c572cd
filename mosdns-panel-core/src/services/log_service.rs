//! 运行日志读取与轮询
//!
//! 日志接口返回整个面板宿主的日志，这里只保留带 mosdns 标记的行。
//! [`LogWatcher`] 是面板里唯一的后台任务，按固定间隔轮询，视图销毁
//! 或开关关闭时停止。

use std::sync::Arc;
use std::time::Duration;

use mosdns_panel_client::{LogEntry, PanelBackend};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::PanelResult;
use crate::services::PanelContext;

/// 日志行必须包含的标记
pub const LOG_FILTER_NEEDLE: &str = "[mosdns]";

/// 自动刷新的轮询间隔
pub const AUTO_REFRESH_INTERVAL: Duration = Duration::from_secs(8);

fn filter_entries(entries: Vec<LogEntry>) -> Vec<LogEntry> {
    entries
        .into_iter()
        .filter(|entry| entry.message.contains(LOG_FILTER_NEEDLE))
        .collect()
}

/// 日志服务，持有最近一次拉取并过滤后的日志
pub struct LogService {
    ctx: Arc<PanelContext>,
    entries: Vec<LogEntry>,
    file: String,
}

impl LogService {
    /// 创建日志服务
    #[must_use]
    pub fn new(ctx: Arc<PanelContext>) -> Self {
        Self {
            ctx,
            entries: Vec::new(),
            file: String::new(),
        }
    }

    /// 过滤后的日志行
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// 日志来源文件
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// 拉取一次日志并过滤，返回保留的行数
    pub async fn refresh(&mut self) -> PanelResult<usize> {
        let payload = self.ctx.backend.fetch_logs().await?;
        self.file = payload.file;
        self.entries = filter_entries(payload.entries);
        Ok(self.entries.len())
    }

    /// 接管一批来自 [`LogWatcher`] 的日志行（已过滤）
    pub fn accept(&mut self, entries: Vec<LogEntry>) {
        self.entries = entries;
    }

    /// 启动自动轮询任务
    #[must_use]
    pub fn spawn_watcher(&self, interval: Duration) -> (LogWatcher, mpsc::Receiver<Vec<LogEntry>>) {
        LogWatcher::spawn(Arc::clone(&self.ctx.backend), interval)
    }
}

/// 日志轮询任务句柄，drop 即停止
pub struct LogWatcher {
    handle: JoinHandle<()>,
}

impl LogWatcher {
    /// 启动轮询任务
    ///
    /// 每个周期拉取一次日志，过滤后经通道送出；拉取失败只记日志，
    /// 下个周期照常重试不退避。接收端关闭时任务自行退出。
    #[must_use]
    pub fn spawn(
        backend: Arc<dyn PanelBackend>,
        interval: Duration,
    ) -> (Self, mpsc::Receiver<Vec<LogEntry>>) {
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // interval 的第一跳立即触发，吞掉它以保持整周期节奏
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match backend.fetch_logs().await {
                    Ok(payload) => {
                        if tx.send(filter_entries(payload.entries)).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        log::warn!("日志轮询失败: {err}");
                    }
                }
            }
        });
        (Self { handle }, rx)
    }

    /// 停止轮询
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for LogWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
