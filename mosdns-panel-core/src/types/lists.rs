//! Line-oriented list buffers.
//!
//! Each named list (allow/block/grey/DDNS/client-IP) is one independent
//! slot: raw text, a dirty flag and a last-saved stamp. Saving serializes
//! the buffer into trimmed, blank-free lines; the buffer itself keeps
//! whatever the operator typed.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// The named lists served under `/api/mosdns/lists/{tag}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ListKind {
    Whitelist,
    Blocklist,
    Greylist,
    Ddns,
    ClientIp,
}

impl ListKind {
    pub const ALL: [Self; 5] = [
        Self::Whitelist,
        Self::Blocklist,
        Self::Greylist,
        Self::Ddns,
        Self::ClientIp,
    ];

    /// The URL tag of this list.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Whitelist => "whitelist",
            Self::Blocklist => "blocklist",
            Self::Greylist => "greylist",
            Self::Ddns => "ddnslist",
            Self::ClientIp => "client_ip",
        }
    }

    /// Operator-facing name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Whitelist => "白名单",
            Self::Blocklist => "黑名单",
            Self::Greylist => "灰名单",
            Self::Ddns => "DDNS 域名",
            Self::ClientIp => "客户端 IP",
        }
    }

    /// Resolves a URL tag back to a kind.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

/// Editable state of one list.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSlot {
    content: String,
    loaded: bool,
    dirty: bool,
    last_saved: Option<DateTime<Utc>>,
}

impl ListSlot {
    /// Replaces the buffer with freshly fetched text: line endings
    /// normalized, trailing whitespace stripped, slot marked clean.
    pub fn fill(&mut self, raw: &str) {
        self.content = raw.replace("\r\n", "\n").trim_end().to_string();
        self.loaded = true;
        self.dirty = false;
    }

    /// Replaces the buffer verbatim and marks the slot dirty.
    pub fn edit(&mut self, text: &str) {
        self.content = text.to_string();
        self.dirty = true;
    }

    /// Appends one entry on its own line and marks the slot dirty.
    /// Callers validate the entry; blank entries are rejected upstream.
    pub fn append_line(&mut self, entry: &str) {
        if self.content.is_empty() {
            self.content = entry.to_string();
        } else {
            self.content.push('\n');
            self.content.push_str(entry);
        }
        self.dirty = true;
    }

    /// Marks a completed save: slot clean, save time stamped.
    pub fn mark_saved(&mut self, at: DateTime<Utc>) {
        self.dirty = false;
        self.last_saved = Some(at);
    }

    /// The persisted form of the buffer: each line trimmed, blank lines
    /// dropped, order and duplicates preserved.
    #[must_use]
    pub fn serialize_lines(&self) -> Vec<String> {
        self.content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()
    }

    /// Count of non-blank trimmed lines, for display.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .count()
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether this slot was ever filled from the backend.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Whether the buffer diverges from the last loaded or saved state.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }
}
