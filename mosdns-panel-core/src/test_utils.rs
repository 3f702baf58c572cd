//! 测试辅助模块
//!
//! 提供内存版后端 Mock 和便捷的测试工厂方法。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mosdns_panel_client::{
    BackendError, ConfigFileEntry, ConfigStatus, ConfigTreePayload, DownloadReport,
    KernelUpdateReport, LogEntry, LogsPayload, PanelBackend, ReleaseInfo, Result as BackendResult,
    SaveFileAck, SaveListAck, ServiceSnapshot, ServiceState, SettingsPayload, SwitchPayload,
};
use tokio::sync::{RwLock, RwLockWriteGuard};

use crate::services::PanelContext;

// ===== MockPanelBackend =====

/// Mock 后端的可变状态，测试里直接读写
#[derive(Default)]
pub struct MockState {
    pub status: ServiceSnapshot,
    pub logs: Vec<LogEntry>,
    pub log_file: String,
    pub config_status: ConfigStatus,
    pub download_report: DownloadReport,
    pub tree: Vec<ConfigFileEntry>,
    pub dir: String,
    pub settings: HashMap<String, String>,
    /// Some 时 `save_settings` 原样回显它，None 时按键合并进 `settings` 再回显
    pub settings_echo: Option<HashMap<String, String>>,
    pub lists: HashMap<String, String>,
    pub switches: HashMap<String, String>,
    pub latest: ReleaseInfo,
    pub update_report: KernelUpdateReport,
    /// 写操作留痕，便于断言提交内容
    pub saved_files: Vec<(String, String)>,
    pub saved_lists: Vec<(String, Vec<String>)>,
    pub saved_settings: Vec<HashMap<String, String>>,
    pub updated_paths: Vec<String>,
    fail: HashMap<&'static str, BackendError>,
    ops: Vec<&'static str>,
}

pub struct MockPanelBackend {
    pub state: RwLock<MockState>,
}

impl MockPanelBackend {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MockState::default()),
        }
    }

    /// 让指定操作固定失败，直到 `clear_error`
    pub async fn set_error(&self, op: &'static str, err: BackendError) {
        self.state.write().await.fail.insert(op, err);
    }

    pub async fn clear_error(&self, op: &'static str) {
        self.state.write().await.fail.remove(op);
    }

    /// 已到达后端的操作名，按调用顺序
    pub async fn ops(&self) -> Vec<&'static str> {
        self.state.read().await.ops.clone()
    }

    async fn begin(&self, op: &'static str) -> BackendResult<RwLockWriteGuard<'_, MockState>> {
        let mut state = self.state.write().await;
        state.ops.push(op);
        if let Some(err) = state.fail.get(op) {
            return Err(err.clone());
        }
        Ok(state)
    }
}

#[async_trait]
impl PanelBackend for MockPanelBackend {
    async fn fetch_service_status(&self) -> BackendResult<ServiceSnapshot> {
        let state = self.begin("fetch_service_status").await?;
        Ok(state.status.clone())
    }

    async fn start_service(&self) -> BackendResult<ServiceSnapshot> {
        let state = self.begin("start_service").await?;
        Ok(state.status.clone())
    }

    async fn stop_service(&self) -> BackendResult<ServiceSnapshot> {
        let state = self.begin("stop_service").await?;
        Ok(state.status.clone())
    }

    async fn restart_service(&self) -> BackendResult<ServiceSnapshot> {
        let state = self.begin("restart_service").await?;
        Ok(state.status.clone())
    }

    async fn fetch_logs(&self) -> BackendResult<LogsPayload> {
        let state = self.begin("fetch_logs").await?;
        Ok(LogsPayload {
            entries: state.logs.clone(),
            file: state.log_file.clone(),
        })
    }

    async fn fetch_config_status(&self) -> BackendResult<ConfigStatus> {
        let state = self.begin("fetch_config_status").await?;
        Ok(state.config_status.clone())
    }

    async fn update_config_path(&self, path: &str) -> BackendResult<ConfigStatus> {
        let mut state = self.begin("update_config_path").await?;
        state.updated_paths.push(path.to_string());
        state.config_status.path = path.to_string();
        Ok(state.config_status.clone())
    }

    async fn download_config(&self) -> BackendResult<DownloadReport> {
        let state = self.begin("download_config").await?;
        Ok(state.download_report.clone())
    }

    async fn fetch_config_tree(&self) -> BackendResult<ConfigTreePayload> {
        let state = self.begin("fetch_config_tree").await?;
        Ok(ConfigTreePayload {
            path: state.config_status.path.clone(),
            dir: state.dir.clone(),
            tree: state.tree.clone(),
        })
    }

    async fn save_config_file(&self, path: &str, content: &str) -> BackendResult<SaveFileAck> {
        let mut state = self.begin("save_config_file").await?;
        state
            .saved_files
            .push((path.to_string(), content.to_string()));
        Ok(SaveFileAck {
            path: path.to_string(),
            saved: true,
        })
    }

    async fn fetch_settings(&self) -> BackendResult<SettingsPayload> {
        let state = self.begin("fetch_settings").await?;
        Ok(SettingsPayload {
            settings: state.settings.clone(),
        })
    }

    async fn save_settings(&self, values: &HashMap<String, String>) -> BackendResult<SettingsPayload> {
        let mut state = self.begin("save_settings").await?;
        state.saved_settings.push(values.clone());
        let settings = match &state.settings_echo {
            Some(echo) => echo.clone(),
            None => {
                for (key, value) in values {
                    state.settings.insert(key.clone(), value.clone());
                }
                state.settings.clone()
            }
        };
        Ok(SettingsPayload { settings })
    }

    async fn fetch_list(&self, tag: &str) -> BackendResult<String> {
        let state = self.begin("fetch_list").await?;
        Ok(state.lists.get(tag).cloned().unwrap_or_default())
    }

    async fn save_list(&self, tag: &str, values: &[String]) -> BackendResult<SaveListAck> {
        let mut state = self.begin("save_list").await?;
        state.saved_lists.push((tag.to_string(), values.to_vec()));
        Ok(SaveListAck { saved: true })
    }

    async fn fetch_switch(&self, tag: &str) -> BackendResult<SwitchPayload> {
        let state = self.begin("fetch_switch").await?;
        Ok(SwitchPayload {
            value: state.switches.get(tag).cloned().unwrap_or_default(),
        })
    }

    async fn save_switch(&self, tag: &str, value: &str) -> BackendResult<SwitchPayload> {
        let mut state = self.begin("save_switch").await?;
        state.switches.insert(tag.to_string(), value.to_string());
        Ok(SwitchPayload {
            value: value.to_string(),
        })
    }

    async fn fetch_latest_release(&self) -> BackendResult<ReleaseInfo> {
        let state = self.begin("fetch_latest_release").await?;
        Ok(state.latest.clone())
    }

    async fn update_kernel(&self) -> BackendResult<KernelUpdateReport> {
        let state = self.begin("update_kernel").await?;
        Ok(state.update_report.clone())
    }
}

// ===== 工厂方法 =====

/// 创建测试用 `PanelContext`
pub fn create_test_context() -> (Arc<PanelContext>, Arc<MockPanelBackend>) {
    let backend = Arc::new(MockPanelBackend::new());
    let ctx = Arc::new(PanelContext::new(backend.clone()));
    (ctx, backend)
}

/// 构造一个网络错误
pub fn net_err(endpoint: &str) -> BackendError {
    BackendError::NetworkError {
        endpoint: endpoint.to_string(),
        detail: "connection refused".to_string(),
    }
}

/// 构造一份服务状态快照
pub fn snapshot(state: ServiceState, version: Option<&str>) -> ServiceSnapshot {
    ServiceSnapshot {
        name: "mosdns".to_string(),
        unit: "mosdns.service".to_string(),
        status: state,
        last_updated: Some(Utc::now()),
        version: version.map(str::to_string),
    }
}

/// 构造一条日志
pub fn log_entry(message: &str) -> LogEntry {
    LogEntry {
        timestamp: Some(Utc::now()),
        message: message.to_string(),
        level: "info".to_string(),
    }
}

/// 构造标准的配置树样例
///
/// ```text
/// config.yaml
/// rules/
///   whitelist.txt
///   blocklist.txt
/// dns.yaml
/// ```
pub fn sample_tree_entries() -> Vec<ConfigFileEntry> {
    vec![
        ConfigFileEntry {
            name: "config.yaml".to_string(),
            path: "config.yaml".to_string(),
            is_dir: false,
            content: Some("log:\n  level: info\n".to_string()),
            children: Vec::new(),
        },
        ConfigFileEntry {
            name: "rules".to_string(),
            path: "rules".to_string(),
            is_dir: true,
            content: None,
            children: vec![
                ConfigFileEntry {
                    name: "whitelist.txt".to_string(),
                    path: "rules/whitelist.txt".to_string(),
                    is_dir: false,
                    content: Some("example.com\n".to_string()),
                    children: Vec::new(),
                },
                ConfigFileEntry {
                    name: "blocklist.txt".to_string(),
                    path: "rules/blocklist.txt".to_string(),
                    is_dir: false,
                    content: Some("ads.example\n".to_string()),
                    children: Vec::new(),
                },
            ],
        },
        ConfigFileEntry {
            name: "dns.yaml".to_string(),
            path: "dns.yaml".to_string(),
            is_dir: false,
            content: Some("plugins: []\n".to_string()),
            children: Vec::new(),
        },
    ]
}
