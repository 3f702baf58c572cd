//! # mosdns-panel-client
//!
//! Typed HTTP client for the mosdns control panel backend: service
//! lifecycle, log retrieval, configuration tree editing, rule lists,
//! settings and kernel updates, all behind the [`PanelBackend`] trait.
//!
//! ## Endpoint Coverage
//!
//! | Area | Operations |
//! |------|-----------|
//! | Service | status snapshot, start, stop, restart |
//! | Logs | fetch parsed log entries |
//! | Config | status, entry-point path, template download, full tree, single-file save |
//! | Settings | fetch store, partial save |
//! | Lists & switches | raw text fetch, whole-list replace, switch get/set |
//! | Kernel | latest release lookup, update run |
//!
//! ## Feature Flags
//!
//! ### TLS Backend
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mosdns_panel_client::{HttpPanelBackend, PanelBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Point the client at the backend
//!     let backend = HttpPanelBackend::new("http://127.0.0.1:8190");
//!
//!     // 2. Inspect the managed service
//!     let snapshot = backend.fetch_service_status().await?;
//!     println!("{} is {}", snapshot.name, snapshot.status.as_str());
//!
//!     // 3. Read the served config tree
//!     let payload = backend.fetch_config_tree().await?;
//!     for entry in &payload.tree {
//!         println!("{} ({})", entry.name, entry.path);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Saving Files
//!
//! ```rust,no_run
//! # use mosdns_panel_client::*;
//! # async fn example(backend: std::sync::Arc<dyn PanelBackend>) -> Result<()> {
//! let ack = backend
//!     .save_config_file("rules/whitelist.txt", "example.com\n")
//!     .await?;
//! assert!(ack.saved);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, BackendError>`](BackendError). The error
//! enum provides structured variants for common failure modes:
//!
//! - [`BackendError::NetworkError`] — network connectivity issue
//! - [`BackendError::Timeout`] — request timed out
//! - [`BackendError::HttpStatus`] — non-success status with the backend's message
//! - [`BackendError::ParseError`] — unexpected response shape
//!
//! Nothing is retried automatically: every failure is reported once and the
//! panel decides what to surface to the operator.

mod error;
mod http;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{BackendError, Result};

// Re-export the backend trait and its HTTP implementation
pub use http::HttpPanelBackend;
pub use traits::PanelBackend;

// Re-export types
pub use types::{
    ConfigFileEntry, ConfigStatus, ConfigTreePayload, DownloadReport, GuideStep,
    KernelUpdateReport, LogEntry, LogsPayload, ReleaseAsset, ReleaseInfo, SaveFileAck,
    SaveFileRequest, SaveListAck, SaveListRequest, ServiceSnapshot, ServiceState,
    SetSwitchRequest, SettingsPayload, SwitchPayload, UpdateConfigPathRequest,
};

// Re-export utils module
pub use utils::datetime;
