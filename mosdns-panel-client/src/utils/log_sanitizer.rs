//! Debug-log clipping.
//!
//! Config file bodies and log batches can run to hundreds of kilobytes.
//! Everything logged at debug level goes through [`truncate_for_log`] so a
//! single oversized response cannot flood the log output.

/// Longest prefix (in bytes) kept in clipped log output.
const CLIP_LIMIT: usize = 256;

/// Clips `s` for logging, appending the original size when shortened.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= CLIP_LIMIT {
        return s.to_string();
    }
    // Back off to a char boundary so multi-byte text never gets split.
    let mut cut = CLIP_LIMIT;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}... [clipped, {} bytes total]", &s[..cut], s.len())
}
