use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============ Config tree ============

/// One node of the served configuration tree.
///
/// Directories carry `children`; files carry `content`. The backend omits
/// empty collections, so both fields are tolerant of being absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFileEntry {
    /// Display name (file or directory base name).
    #[serde(default)]
    pub name: String,
    /// Path relative to the served config directory. Empty for the root entry.
    #[serde(default)]
    pub path: String,
    /// Whether this entry is a directory.
    #[serde(default, rename = "isDir")]
    pub is_dir: bool,
    /// File contents. Only present for files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Child entries in server order. Only present for directories.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ConfigFileEntry>,
}

/// Response of the config content endpoint: the full tree plus the directory
/// it was collected from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigTreePayload {
    /// Configured entry-point path (the main config file).
    #[serde(default)]
    pub path: String,
    /// Directory the tree was collected from.
    #[serde(default)]
    pub dir: String,
    /// Root entries in server order.
    #[serde(default)]
    pub tree: Vec<ConfigFileEntry>,
}

/// Request body for saving a single config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFileRequest {
    /// Path relative to the served config directory.
    pub path: String,
    /// Full replacement contents.
    pub content: String,
}

/// Acknowledgement returned after saving a single config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveFileAck {
    /// Absolute path the file was written to.
    #[serde(default)]
    pub path: String,
    /// Whether the write succeeded.
    #[serde(default)]
    pub saved: bool,
}

// ============ Config status & download ============

/// Status of the configured entry-point file on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigStatus {
    /// Configured path of the main config file.
    #[serde(default)]
    pub path: String,
    /// Whether the file exists on disk.
    #[serde(default)]
    pub exists: bool,
    /// File size in bytes, when the file exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Last modification time, when the file exists.
    #[serde(
        default,
        rename = "modTime",
        with = "crate::utils::datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub mod_time: Option<DateTime<Utc>>,
}

/// Request body for updating the config entry-point path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateConfigPathRequest {
    /// New path of the main config file.
    pub path: String,
}

/// One step of the post-download rewrite guide.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuideStep {
    /// Step title.
    #[serde(default)]
    pub title: String,
    /// Human-readable outcome description.
    #[serde(default)]
    pub detail: String,
    /// Whether the step applied a change.
    #[serde(default)]
    pub success: bool,
}

/// Outcome of downloading and rewriting the config template.
///
/// Carries the refreshed config status plus the per-step rewrite guide. The
/// backend attaches further diagnostic fields which are not modeled here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadReport {
    /// Configured path of the main config file.
    #[serde(default)]
    pub path: String,
    /// Whether the main config file exists after the download.
    #[serde(default)]
    pub exists: bool,
    /// Modification time of the main config file after the download.
    #[serde(
        default,
        rename = "modTime",
        with = "crate::utils::datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub mod_time: Option<DateTime<Utc>>,
    /// Rewrite steps applied to the downloaded template, in order.
    #[serde(default, rename = "guideSteps", skip_serializing_if = "Vec::is_empty")]
    pub guide_steps: Vec<GuideStep>,
}

// ============ Settings ============

/// Settings store payload: a flat string-to-string map.
///
/// Every value is transported as a string; booleans travel as `"true"`/`"false"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsPayload {
    /// Raw key/value pairs as stored on the server.
    #[serde(default)]
    pub settings: HashMap<String, String>,
}

// ============ Lists & switches ============

/// Request body for replacing a rule list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveListRequest {
    /// Entries in final order, already trimmed and blank-free.
    pub values: Vec<String>,
}

/// Acknowledgement returned after saving a rule list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveListAck {
    /// Whether the list was persisted.
    #[serde(default)]
    pub saved: bool,
}

/// Value of a named switch slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwitchPayload {
    /// Current switch value, trimmed by the server.
    #[serde(default)]
    pub value: String,
}

/// Request body for setting a switch slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetSwitchRequest {
    /// New switch value. Must be non-empty after trimming.
    pub value: String,
}

// ============ Service lifecycle ============

/// Lifecycle state of the managed service unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    /// The unit is active.
    Running,
    /// The unit is installed but inactive.
    Stopped,
    /// The unit is not installed on the host.
    Missing,
    /// The state could not be determined. Unrecognized values parse to this.
    #[default]
    Unknown,
}

impl ServiceState {
    /// Maps a raw status label to a state, case-insensitively.
    ///
    /// Unrecognized labels map to [`ServiceState::Unknown`] so that a newer
    /// backend never breaks deserialization.
    #[must_use]
    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "running" => Self::Running,
            "stopped" => Self::Stopped,
            "missing" => Self::Missing,
            _ => Self::Unknown,
        }
    }

    /// Stable lowercase label, matching the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Missing => "missing",
            Self::Unknown => "unknown",
        }
    }
}

impl<'de> Deserialize<'de> for ServiceState {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_label(&raw))
    }
}

/// Point-in-time status snapshot of the managed service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceSnapshot {
    /// Service display name.
    #[serde(default)]
    pub name: String,
    /// Underlying unit name.
    #[serde(default)]
    pub unit: String,
    /// Lifecycle state at snapshot time.
    #[serde(default)]
    pub status: ServiceState,
    /// When the snapshot was taken.
    #[serde(
        default,
        rename = "lastUpdated",
        with = "crate::utils::datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<DateTime<Utc>>,
    /// Installed binary version, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

// ============ Logs ============

/// One parsed service log line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the line was produced.
    #[serde(
        default,
        with = "crate::utils::datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    /// Raw log message.
    #[serde(default)]
    pub message: String,
    /// Severity label as reported by the service.
    #[serde(default)]
    pub level: String,
}

/// Response of the logs endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogsPayload {
    /// Parsed entries, oldest first.
    #[serde(default)]
    pub entries: Vec<LogEntry>,
    /// Log file the entries were read from.
    #[serde(default)]
    pub file: String,
}

// ============ Kernel releases ============

/// One downloadable artifact attached to a release.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseAsset {
    /// Asset file name.
    #[serde(default)]
    pub name: String,
    /// Direct download URL.
    #[serde(default)]
    pub browser_download_url: String,
    /// Asset size in bytes.
    #[serde(default)]
    pub size: u64,
    /// MIME type reported by the release host.
    #[serde(default)]
    pub content_type: String,
}

/// Upstream kernel release metadata.
///
/// Older backend builds emitted `tagName` instead of `tag_name`; the alias
/// keeps both readable. [`ReleaseInfo::normalized_tag`] applies the fallback
/// chain the panel relies on for version comparison.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseInfo {
    /// Release tag, e.g. `v5.3.3`.
    #[serde(default, alias = "tagName")]
    pub tag_name: String,
    /// Release display name, used as a fallback when the tag is absent.
    #[serde(default)]
    pub name: String,
    /// Publication time.
    #[serde(
        default,
        with = "crate::utils::datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<DateTime<Utc>>,
    /// Downloadable artifacts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<ReleaseAsset>,
}

impl ReleaseInfo {
    /// The trimmed release tag, falling back to the display name.
    ///
    /// Returns an empty string when neither field carries a usable value.
    #[must_use]
    pub fn normalized_tag(&self) -> &str {
        let tag = self.tag_name.trim();
        if tag.is_empty() { self.name.trim() } else { tag }
    }
}

/// Outcome of a kernel update run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KernelUpdateReport {
    /// Release the kernel was updated to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<ReleaseInfo>,
    /// Path the new binary was written to.
    #[serde(default)]
    pub binary: String,
}
