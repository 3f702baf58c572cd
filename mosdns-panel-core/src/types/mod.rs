//! 类型定义模块

mod lists;
mod notice;
mod progress;
mod service;
mod settings;
mod tree;

pub use lists::{ListKind, ListSlot};
pub use notice::{Notice, NoticeKind};
pub use progress::{
    Cadence, OperationPhase, ProgressAnimator, DOWNLOAD_CADENCE, FILE_SAVE_CADENCE,
    SETTINGS_SAVE_CADENCE,
};
pub use service::ServiceOverview;
pub use settings::{
    parse_bool, SettingsRecord, DEFAULT_DOMESTIC_DNS, DEFAULT_DOMESTIC_FAKE_DNS,
    DEFAULT_FAKE_IP_RANGE, DEFAULT_FORWARD_ECS, DEFAULT_LISTEN_7777, DEFAULT_LISTEN_8888,
    DEFAULT_PROXY_INBOUND, DEFAULT_SOCKS5_ADDRESS,
};
pub use tree::{ConfigNode, ConfigTree, ExpandState, FlatItem, NodeId};

// Re-export client 库的公共类型
pub use mosdns_panel_client::{
    ConfigFileEntry, ConfigStatus, ConfigTreePayload, DownloadReport, GuideStep,
    KernelUpdateReport, LogEntry, LogsPayload, ReleaseAsset, ReleaseInfo, SaveFileAck, SaveListAck,
    ServiceSnapshot, ServiceState, SettingsPayload, SwitchPayload,
};
