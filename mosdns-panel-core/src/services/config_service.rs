//! 配置文件管理
//!
//! 跟踪配置文件路径与存在性，负责官方模板下载及其引导步骤历史。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mosdns_panel_client::{ConfigStatus, DownloadReport, GuideStep};
use serde::Serialize;

use crate::error::{PanelError, PanelResult};
use crate::services::PanelContext;
use crate::types::{ProgressAnimator, DOWNLOAD_CADENCE};

/// 配置文件的默认路径，在后端给出实际路径前使用
pub const DEFAULT_CONFIG_PATH: &str = "/etc/mosdns/config.yaml";

/// 引导历史保留的最近运行次数
pub const GUIDE_HISTORY_LIMIT: usize = 10;

/// 一次模板下载的引导步骤记录
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideRun {
    pub at: DateTime<Utc>,
    pub steps: Vec<GuideStep>,
}

/// 配置状态与模板下载服务
pub struct ConfigService {
    ctx: Arc<PanelContext>,
    path: String,
    exists: bool,
    last_synced: Option<DateTime<Utc>>,
    guide_history: Vec<GuideRun>,
    download: ProgressAnimator,
}

impl ConfigService {
    /// 创建配置服务
    #[must_use]
    pub fn new(ctx: Arc<PanelContext>) -> Self {
        Self {
            ctx,
            path: DEFAULT_CONFIG_PATH.to_string(),
            exists: true,
            last_synced: None,
            guide_history: Vec::new(),
            download: ProgressAnimator::new(DOWNLOAD_CADENCE),
        }
    }

    /// 当前配置文件路径
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 配置文件是否存在
    #[must_use]
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// 配置文件的最近修改时间
    #[must_use]
    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.last_synced
    }

    /// 引导步骤历史，最新一次在前
    #[must_use]
    pub fn guide_history(&self) -> &[GuideRun] {
        &self.guide_history
    }

    /// 下载进度条的展示状态
    #[must_use]
    pub fn download_progress(&self) -> &ProgressAnimator {
        &self.download
    }

    /// 推进下载进度条一格，返回当前百分比
    pub fn tick_download(&mut self) -> u8 {
        self.download.tick()
    }

    /// 刷新配置状态
    pub async fn refresh_status(&mut self) -> PanelResult<ConfigStatus> {
        let status = self.ctx.backend.fetch_config_status().await?;
        self.consume_status(&status);
        Ok(status)
    }

    /// 更新配置文件路径，随后重新检测状态
    pub async fn update_path(&mut self, path: &str) -> PanelResult<ConfigStatus> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(PanelError::EmptyConfigPath);
        }
        self.ctx.backend.update_config_path(trimmed).await?;
        self.refresh_status().await
    }

    /// 下载官方配置模板
    ///
    /// 成功后记录引导步骤并刷新状态；刷新失败只记日志，下载结果照常
    /// 返回，状态退回用报告自带的字段。
    pub async fn download_template(&mut self) -> PanelResult<DownloadReport> {
        self.download.begin();
        match self.ctx.backend.download_config().await {
            Ok(report) => {
                self.download.finish(true);
                self.record_guide_run(&report.guide_steps);
                if let Err(err) = self.refresh_status().await {
                    log::warn!("下载后刷新配置状态失败: {err}");
                    if !report.path.is_empty() {
                        self.path = report.path.clone();
                    }
                    self.exists = report.exists;
                    if let Some(mod_time) = report.mod_time {
                        self.last_synced = Some(mod_time);
                    }
                }
                Ok(report)
            }
            Err(err) => {
                self.download.finish(false);
                Err(err.into())
            }
        }
    }

    fn consume_status(&mut self, status: &ConfigStatus) {
        if !status.path.is_empty() {
            self.path = status.path.clone();
        }
        self.exists = status.exists;
        if let Some(mod_time) = status.mod_time {
            self.last_synced = Some(mod_time);
        }
    }

    fn record_guide_run(&mut self, steps: &[GuideStep]) {
        if steps.is_empty() {
            return;
        }
        self.guide_history.insert(
            0,
            GuideRun {
                at: Utc::now(),
                steps: steps.to_vec(),
            },
        );
        self.guide_history.truncate(GUIDE_HISTORY_LIMIT);
    }
}
