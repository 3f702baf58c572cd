//! 业务逻辑服务层

mod config_service;
mod edit_session;
mod list_session;
mod log_service;
mod service_control;
mod settings_service;
mod switch_service;

pub use config_service::{ConfigService, GuideRun, DEFAULT_CONFIG_PATH, GUIDE_HISTORY_LIMIT};
pub use edit_session::{EditPhase, EditSession};
pub use list_session::ListSessions;
pub use log_service::{LogService, LogWatcher, AUTO_REFRESH_INTERVAL, LOG_FILTER_NEEDLE};
pub use service_control::ServiceControl;
pub use settings_service::SettingsService;
pub use switch_service::{SwitchId, SwitchService};

use std::sync::Arc;

use mosdns_panel_client::PanelBackend;

/// 服务上下文 - 持有所有共享依赖
///
/// 平台层需要创建此上下文，并注入具体的后端实现。
pub struct PanelContext {
    /// 后端接口
    pub backend: Arc<dyn PanelBackend>,
}

impl PanelContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(backend: Arc<dyn PanelBackend>) -> Self {
        Self { backend }
    }
}
