//! mosdns Panel Core Library
//!
//! Provides core business logic for the mosdns control panel, including:
//! - Service lifecycle and kernel updates (Service Control)
//! - Configuration tree browsing and editing (Edit Session)
//! - Rule list management (List Sessions)
//! - Settings normalization (Settings Service)
//!
//! This library is designed to be platform-independent, abstracting the
//! backend through the `PanelBackend` trait, so the same services drive a
//! web panel, a TUI or tests against an in-memory mock.

pub mod error;
pub mod panel;
pub mod services;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{PanelError, PanelResult};
pub use panel::Panel;
pub use services::PanelContext;
