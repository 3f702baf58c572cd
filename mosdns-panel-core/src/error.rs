//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use mosdns_panel_client::BackendError;

/// Panel layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum PanelError {
    /// The requested file is not part of the currently visible tree
    #[error("File not found in config tree: {0}")]
    FileNotFound(String),

    /// The requested path names a directory, not an editable file
    #[error("Not a file: {0}")]
    NotAFile(String),

    /// A file operation was attempted with no file selected
    #[error("No file selected")]
    NoFileSelected,

    /// The config entry-point path was empty after trimming
    #[error("Config path must not be empty")]
    EmptyConfigPath,

    /// A list entry was empty after trimming
    #[error("List entry must not be empty")]
    EmptyListEntry,

    /// A switch value was empty after trimming
    #[error("Switch value must not be empty")]
    EmptySwitchValue,

    /// Backend error (converting from library)
    #[error("{0}")]
    Backend(#[from] BackendError),
}

impl PanelError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::FileNotFound(_)
            | Self::NotAFile(_)
            | Self::NoFileSelected
            | Self::EmptyConfigPath
            | Self::EmptyListEntry
            | Self::EmptySwitchValue => true,
            Self::Backend(e) => e.is_expected(),
        }
    }
}

/// Panel layer Result type alias
pub type PanelResult<T> = std::result::Result<T, PanelError>;
