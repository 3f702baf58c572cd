//! Utility modules.

/// Date/time serialization helpers shared by the wire types.
pub mod datetime;

/// Log truncation utilities to keep response bodies out of full-length logs.
pub mod log_sanitizer;
