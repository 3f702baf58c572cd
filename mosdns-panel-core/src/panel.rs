//! 面板聚合根
//!
//! 把各服务组合成一个面板实例，负责跨服务编排：启动前检查配置文件、
//! 操作成功后刷新日志、内核更新后重拉全部状态。所有失败在这里转成
//! 通知，不再向外传播，面板始终保持可交互。

use std::sync::Arc;

use mosdns_panel_client::{LogEntry, PanelBackend};
use tokio::sync::mpsc;

use crate::services::{
    ConfigService, EditSession, ListSessions, LogService, LogWatcher, PanelContext, ServiceControl,
    SettingsService, SwitchService, AUTO_REFRESH_INTERVAL,
};
use crate::types::{ListKind, Notice, SettingsRecord};

/// 面板状态聚合
///
/// 各服务作为公开字段直接访问，本地编辑之类不碰后端的操作走字段；
/// 需要编排或通知的操作走聚合方法。
pub struct Panel {
    pub control: ServiceControl,
    pub config: ConfigService,
    pub settings: SettingsService,
    pub editor: EditSession,
    pub lists: ListSessions,
    pub logs: LogService,
    pub switches: SwitchService,
    notice: Option<Notice>,
}

impl Panel {
    /// 创建面板
    #[must_use]
    pub fn new(backend: Arc<dyn PanelBackend>) -> Self {
        Self::with_context(Arc::new(PanelContext::new(backend)))
    }

    /// 用现成的服务上下文创建面板
    #[must_use]
    pub fn with_context(ctx: Arc<PanelContext>) -> Self {
        Self {
            control: ServiceControl::new(ctx.clone()),
            config: ConfigService::new(ctx.clone()),
            settings: SettingsService::new(ctx.clone()),
            editor: EditSession::new(ctx.clone()),
            lists: ListSessions::new(ctx.clone()),
            logs: LogService::new(ctx.clone()),
            switches: SwitchService::new(ctx),
            notice: None,
        }
    }

    // ============ 通知 ============

    /// 当前通知
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// 取走当前通知，槽位清空
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    // ============ 启动引导 ============

    /// 初始加载
    ///
    /// 四个读取互不依赖，并发执行。任何一项失败都只产生通知，
    /// 面板照常进入可交互状态。
    pub async fn bootstrap(&mut self) {
        let (control, config, settings, logs) = futures::join!(
            self.control.refresh(),
            self.config.refresh_status(),
            self.settings.refresh(),
            self.logs.refresh(),
        );

        let config_known = config.is_ok();
        if let Err(err) = control {
            self.notify(Notice::error(format!("加载服务状态失败：{err}")));
        }
        if let Err(err) = config {
            self.notify(Notice::error(format!("检测配置失败：{err}")));
        }
        if let Err(err) = settings {
            self.notify(Notice::error(format!("加载前端设置失败：{err}")));
        }
        if let Err(err) = logs {
            self.notify(Notice::error(format!("获取日志失败：{err}")));
        }

        if self.control.overview().is_missing() {
            self.notify(Notice::error(
                "未检测到 mosdns 核心，请先执行“检查更新”或“一键更新”。",
            ));
        }
        if config_known && !self.config.exists() {
            self.notify(Notice::error("未检测到 mosdns 配置，请先下载配置文件。"));
        }
    }

    /// 按设置决定是否启动日志轮询
    #[must_use]
    pub fn watch_logs(&self) -> Option<(LogWatcher, mpsc::Receiver<Vec<LogEntry>>)> {
        if !self.settings.auto_refresh_logs() {
            return None;
        }
        Some(self.logs.spawn_watcher(AUTO_REFRESH_INTERVAL))
    }

    // ============ 服务生命周期 ============

    /// 启动服务
    pub async fn start(&mut self) -> bool {
        match self.control.start(self.config.exists()).await {
            Ok(true) => {
                self.notify(Notice::success("mosdns 已启动"));
                self.refresh_logs().await;
                true
            }
            Ok(false) => false,
            Err(err) => {
                self.notify(Notice::error(err.to_string()));
                false
            }
        }
    }

    /// 停止服务
    pub async fn stop(&mut self) -> bool {
        match self.control.stop().await {
            Ok(true) => {
                self.notify(Notice::success("mosdns 已停止"));
                self.refresh_logs().await;
                true
            }
            Ok(false) => false,
            Err(err) => {
                self.notify(Notice::error(err.to_string()));
                false
            }
        }
    }

    /// 主按钮行为：运行中则重启，否则启动
    pub async fn start_or_restart(&mut self) -> bool {
        let restarting = self.control.overview().is_running();
        match self.control.start_or_restart(self.config.exists()).await {
            Ok(true) => {
                self.notify(Notice::success(if restarting {
                    "mosdns 已重启"
                } else {
                    "mosdns 已启动"
                }));
                self.refresh_logs().await;
                true
            }
            Ok(false) => false,
            Err(err) => {
                self.notify(Notice::error(err.to_string()));
                false
            }
        }
    }

    // ============ 内核更新 ============

    /// 检测最新内核版本
    pub async fn check_updates(&mut self) -> Option<String> {
        self.notify(Notice::info("正在检测 mosdns 最新版本…"));
        match self.control.check_latest().await {
            Ok(tag) => {
                self.notify(Notice::success("已获取最新版本信息"));
                tag
            }
            Err(err) => {
                self.notify(Notice::error(format!("检测失败：{err}")));
                None
            }
        }
    }

    /// 一键更新内核
    ///
    /// 没有新版本且内核未缺失时直接返回，不打扰操作者。
    pub async fn update_kernel(&mut self) -> bool {
        let overview = self.control.overview();
        if !overview.update_available() && !overview.is_missing() {
            return false;
        }
        self.notify(Notice::info("正在下载并更新 mosdns 内核…"));
        match self.control.apply_update().await {
            Ok(Some(report)) => {
                if report.binary.is_empty() {
                    self.notify(Notice::success("更新完成"));
                } else {
                    self.notify(Notice::success(format!("更新完成，已写入 {}", report.binary)));
                }
                self.refresh_after_update().await;
                true
            }
            Ok(None) => false,
            Err(err) => {
                self.notify(Notice::error(format!("更新失败：{err}")));
                false
            }
        }
    }

    // ============ 配置文件 ============

    /// 下载模板前是否需要操作者确认
    ///
    /// 四个偏好字段都还是默认值时提醒一次，避免下载后才发现没改地址。
    #[must_use]
    pub fn download_requires_confirmation(&self) -> bool {
        self.settings.using_default_preferences()
    }

    /// 下载官方配置模板
    pub async fn download_template(&mut self) -> bool {
        self.notify(Notice::info("正在下载官方 mosdns 配置…"));
        match self.config.download_template().await {
            Ok(_) => {
                self.notify(Notice::success("配置下载完成并已解压"));
                true
            }
            Err(err) => {
                self.notify(Notice::error(format!("下载失败：{err}")));
                false
            }
        }
    }

    /// 更新配置文件路径
    pub async fn update_config_path(&mut self, path: &str) -> bool {
        match self.config.update_path(path).await {
            Ok(_) => {
                self.notify(Notice::success("配置路径已更新"));
                true
            }
            Err(err) => {
                self.notify(Notice::error(format!("更新配置路径失败：{err}")));
                false
            }
        }
    }

    /// 重新加载配置编辑区
    pub async fn reload_editor(&mut self) -> bool {
        match self.editor.reload().await {
            Ok(()) => true,
            Err(err) => {
                self.notify(Notice::error(format!("加载配置内容失败：{err}")));
                false
            }
        }
    }

    /// 保存当前编辑的配置文件
    pub async fn save_file(&mut self) -> bool {
        match self.editor.save().await {
            Ok(()) => {
                let text = self
                    .editor
                    .active_file()
                    .map_or_else(|| "已保存".to_string(), |path| format!("{path} 已保存"));
                self.notify(Notice::success(text));
                true
            }
            Err(err) => {
                self.notify(Notice::error(format!("保存失败：{err}")));
                false
            }
        }
    }

    // ============ 设置与列表 ============

    /// 保存偏好设置
    pub async fn save_settings(&mut self, draft: &SettingsRecord) -> bool {
        let result = self.settings.save(draft).await.map(|_| ());
        match result {
            Ok(()) => {
                self.notify(Notice::success("配置偏好已保存，下一次下载将自动应用。"));
                true
            }
            Err(err) => {
                self.notify(Notice::error(format!("保存偏好失败：{err}")));
                false
            }
        }
    }

    /// 加载一个规则列表
    pub async fn load_list(&mut self, kind: ListKind, force: bool) -> bool {
        match self.lists.load(kind, force).await {
            Ok(()) => true,
            Err(err) => {
                self.notify(Notice::error(format!("加载{}失败：{err}", kind.label())));
                false
            }
        }
    }

    /// 保存一个规则列表
    pub async fn save_list(&mut self, kind: ListKind) -> bool {
        match self.lists.save(kind).await {
            Ok(_) => {
                self.notify(Notice::success(format!("{} 已保存", kind.label())));
                true
            }
            Err(err) => {
                self.notify(Notice::error(format!("保存失败：{err}")));
                false
            }
        }
    }

    // ============ 内部 ============

    async fn refresh_logs(&mut self) {
        if let Err(err) = self.logs.refresh().await {
            self.notify(Notice::error(format!("获取日志失败：{err}")));
        }
    }

    /// 更新脚本停掉了旧进程，状态、配置与日志全部重拉
    async fn refresh_after_update(&mut self) {
        if let Err(err) = self.control.refresh().await {
            self.notify(Notice::error(format!("加载服务状态失败：{err}")));
        }
        if let Err(err) = self.config.refresh_status().await {
            self.notify(Notice::error(format!("检测配置失败：{err}")));
        }
        self.refresh_logs().await;
    }
}
