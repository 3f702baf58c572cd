//! Service overview state.

use chrono::{DateTime, Utc};
use mosdns_panel_client::{ServiceSnapshot, ServiceState};
use serde::Serialize;

/// Last-known view of the mosdns unit, fed by status snapshots.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOverview {
    pub state: ServiceState,
    pub last_updated: Option<DateTime<Utc>>,
    /// Installed kernel version, kept across snapshots that omit it.
    pub version: Option<String>,
    /// Newest published kernel version, once checked.
    pub latest_version: Option<String>,
}

impl ServiceOverview {
    /// Folds a status snapshot into the overview.
    ///
    /// The installed version only moves on a non-blank value; a snapshot
    /// without one keeps whatever was known before.
    pub fn consume(&mut self, snapshot: &ServiceSnapshot) {
        self.state = snapshot.status;
        self.last_updated = snapshot.last_updated;
        if let Some(version) = snapshot.version.as_deref() {
            let trimmed = version.trim();
            if !trimmed.is_empty() {
                self.version = Some(trimmed.to_string());
            }
        }
    }

    /// Records the newest published version tag. Blank tags are ignored.
    pub fn record_latest(&mut self, tag: &str) {
        let trimmed = tag.trim();
        if !trimmed.is_empty() {
            self.latest_version = Some(trimmed.to_string());
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == ServiceState::Running
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.state == ServiceState::Missing
    }

    /// Whether both versions are known and disagree.
    #[must_use]
    pub fn update_available(&self) -> bool {
        match (self.version.as_deref(), self.latest_version.as_deref()) {
            (Some(installed), Some(latest)) => installed != latest,
            _ => false,
        }
    }

    /// Start (or restart) is allowed for an installed, stopped unit whose
    /// config file exists.
    #[must_use]
    pub fn can_start(&self, config_exists: bool) -> bool {
        !self.is_missing() && !self.is_running() && config_exists
    }

    #[must_use]
    pub fn can_stop(&self) -> bool {
        self.is_running()
    }
}
