//! mosdns 服务控制
//!
//! 启动/停止/重启与内核版本管理。所有状态迁移都以后端返回的快照为准，
//! 不在本地猜测结果。

use std::sync::Arc;

use chrono::Utc;
use mosdns_panel_client::{KernelUpdateReport, ServiceState};

use crate::error::PanelResult;
use crate::services::PanelContext;
use crate::types::ServiceOverview;

/// 服务控制器，持有最近一次已知的服务总览
pub struct ServiceControl {
    ctx: Arc<PanelContext>,
    overview: ServiceOverview,
}

impl ServiceControl {
    /// 创建服务控制器
    #[must_use]
    pub fn new(ctx: Arc<PanelContext>) -> Self {
        Self {
            ctx,
            overview: ServiceOverview::default(),
        }
    }

    /// 最近一次已知的服务总览
    #[must_use]
    pub fn overview(&self) -> &ServiceOverview {
        &self.overview
    }

    /// 刷新服务状态快照
    pub async fn refresh(&mut self) -> PanelResult<()> {
        let snapshot = self.ctx.backend.fetch_service_status().await?;
        self.overview.consume(&snapshot);
        Ok(())
    }

    /// 启动服务
    ///
    /// 未安装、已运行或配置缺失时跳过（返回 `Ok(false)`），与按钮置灰
    /// 的判断保持一致。
    pub async fn start(&mut self, config_exists: bool) -> PanelResult<bool> {
        if !self.overview.can_start(config_exists) {
            return Ok(false);
        }
        let snapshot = self.ctx.backend.start_service().await?;
        self.overview.consume(&snapshot);
        Ok(true)
    }

    /// 停止服务，仅在运行中时执行
    pub async fn stop(&mut self) -> PanelResult<bool> {
        if !self.overview.can_stop() {
            return Ok(false);
        }
        let snapshot = self.ctx.backend.stop_service().await?;
        self.overview.consume(&snapshot);
        Ok(true)
    }

    /// 重启服务，仅在运行中时执行
    pub async fn restart(&mut self) -> PanelResult<bool> {
        if !self.overview.is_running() {
            return Ok(false);
        }
        let snapshot = self.ctx.backend.restart_service().await?;
        self.overview.consume(&snapshot);
        Ok(true)
    }

    /// 主按钮行为：运行中则重启，否则启动
    pub async fn start_or_restart(&mut self, config_exists: bool) -> PanelResult<bool> {
        if self.overview.is_running() {
            self.restart().await
        } else {
            self.start(config_exists).await
        }
    }

    /// 查询最新内核版本并记录
    ///
    /// 返回规整后的版本标签；发布信息里没有可用标签时返回 `None`，
    /// 已记录的版本不变。
    pub async fn check_latest(&mut self) -> PanelResult<Option<String>> {
        let release = self.ctx.backend.fetch_latest_release().await?;
        let tag = release.normalized_tag();
        if tag.is_empty() {
            return Ok(None);
        }
        self.overview.record_latest(tag);
        Ok(Some(tag.to_string()))
    }

    /// 下载并安装最新内核
    ///
    /// 仅在有新版本或内核缺失时执行，其余情况返回 `Ok(None)`。
    /// 更新脚本会停掉旧进程，总览先按已停止处理，待下一次刷新校正。
    pub async fn apply_update(&mut self) -> PanelResult<Option<KernelUpdateReport>> {
        if !self.overview.update_available() && !self.overview.is_missing() {
            return Ok(None);
        }
        log::info!("开始更新 mosdns 内核");
        let report = self.ctx.backend.update_kernel().await?;
        if let Some(release) = &report.release {
            let tag = release.normalized_tag();
            if !tag.is_empty() {
                self.overview.record_latest(tag);
            }
        }
        self.overview.state = ServiceState::Stopped;
        self.overview.last_updated = Some(Utc::now());
        Ok(Some(report))
    }
}
