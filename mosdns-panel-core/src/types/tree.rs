//! Config tree arena and flattening.
//!
//! The served tree arrives as recursive [`ConfigFileEntry`] values. The panel
//! re-homes them into an index-addressed arena so that row projection stays
//! iterative and editing one file is an O(1) write-back instead of a
//! recursive search. The arena is replaced wholesale on every reload; expand
//! state lives next to it and only influences projection, never the nodes.

use std::collections::HashMap;

use mosdns_panel_client::ConfigFileEntry;
use serde::Serialize;

/// Index of a node inside a [`ConfigTree`] arena.
pub type NodeId = usize;

/// One node of the panel-side config tree.
#[derive(Debug, Clone)]
pub struct ConfigNode {
    /// Display name (file or directory base name).
    pub name: String,
    /// Path relative to the served config directory. Empty for the root.
    pub path: String,
    /// Whether this node is a directory.
    pub is_dir: bool,
    /// File contents. `None` for directories.
    pub content: Option<String>,
    /// Child node ids in server order.
    pub children: Vec<NodeId>,
}

impl ConfigNode {
    /// Expand-state key: the path when non-empty, the name otherwise.
    ///
    /// The served root directory has an empty path, so its name stands in.
    #[must_use]
    pub fn key(&self) -> &str {
        if self.path.is_empty() {
            &self.name
        } else {
            &self.path
        }
    }
}

/// Expand/collapse state of directory rows, keyed by [`ConfigNode::key`].
///
/// A key that was never touched counts as expanded, so a freshly loaded tree
/// shows fully open. Reset on every reload.
#[derive(Debug, Clone, Default)]
pub struct ExpandState {
    state: HashMap<String, bool>,
}

impl ExpandState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the row with `key` is expanded. Missing keys are expanded.
    #[must_use]
    pub fn is_expanded(&self, key: &str) -> bool {
        self.state.get(key).copied() != Some(false)
    }

    /// Flips the state for `key` and returns the new value.
    pub fn toggle(&mut self, key: &str) -> bool {
        let next = !self.is_expanded(key);
        self.state.insert(key.to_string(), next);
        next
    }

    /// Forces the state for `key`.
    pub fn set(&mut self, key: &str, expanded: bool) {
        self.state.insert(key.to_string(), expanded);
    }

    /// Forgets all explicit state, returning every row to default-open.
    pub fn reset(&mut self) {
        self.state.clear();
    }
}

/// One visible row of the flattened tree.
///
/// Derived on every projection, never stored back. Carries a copy of the
/// file contents so a row is self-contained for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatItem {
    /// Display name.
    pub name: String,
    /// Path relative to the served config directory.
    pub path: String,
    /// Whether the row is a directory.
    pub is_dir: bool,
    /// File contents at projection time. `None` for directories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Nesting depth, roots at 0.
    pub level: usize,
    /// Expand-state key of the row.
    pub key: String,
    /// Whether the row is currently expanded. Meaningful for directories.
    pub expanded: bool,
    /// Whether the row has child rows to reveal.
    pub has_children: bool,
}

/// Index-addressed config tree.
///
/// Nodes sit in one `Vec`; parents address children by [`NodeId`] and a path
/// index gives O(1) access for content write-back. With duplicate paths the
/// last occurrence wins in the index; the backend is trusted to emit unique
/// paths, the index just makes that assumption explicit.
#[derive(Debug, Clone, Default)]
pub struct ConfigTree {
    nodes: Vec<ConfigNode>,
    roots: Vec<NodeId>,
    by_path: HashMap<String, NodeId>,
}

impl ConfigTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an arena from wire entries, preserving sibling order.
    #[must_use]
    pub fn from_entries(entries: Vec<ConfigFileEntry>) -> Self {
        let mut tree = Self::new();
        // Children go onto the stack reversed so sibling order survives
        // the stack's LIFO pops.
        let mut stack: Vec<(ConfigFileEntry, Option<NodeId>)> = Vec::new();
        for entry in entries.into_iter().rev() {
            stack.push((entry, None));
        }
        while let Some((entry, parent)) = stack.pop() {
            let ConfigFileEntry {
                name,
                path,
                is_dir,
                content,
                children,
            } = entry;
            let id = tree.nodes.len();
            tree.by_path.insert(path.clone(), id);
            tree.nodes.push(ConfigNode {
                name,
                path,
                is_dir,
                content,
                children: Vec::new(),
            });
            match parent {
                Some(parent) => tree.nodes[parent].children.push(id),
                None => tree.roots.push(id),
            }
            for child in children.into_iter().rev() {
                stack.push((child, Some(id)));
            }
        }
        tree
    }

    /// Whether the tree holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total node count, visible or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The node with the given arena id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&ConfigNode> {
        self.nodes.get(id)
    }

    /// Looks a node up by path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&ConfigNode> {
        self.by_path.get(path).and_then(|&id| self.nodes.get(id))
    }

    /// The contents of the file at `path`, when known.
    #[must_use]
    pub fn content_of(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|node| node.content.as_deref())
    }

    /// Replaces the stored contents of the file at `path`.
    ///
    /// O(1) via the path index. Directories and unknown paths are left
    /// alone and report `false`; sibling nodes and the tree structure are
    /// never touched.
    pub fn set_content(&mut self, path: &str, content: &str) -> bool {
        match self.by_path.get(path) {
            Some(&id) if !self.nodes[id].is_dir => {
                self.nodes[id].content = Some(content.to_string());
                true
            }
            _ => false,
        }
    }

    /// The first non-directory node in pre-order, if any.
    ///
    /// Used to auto-select a file right after a reload, when every directory
    /// is still expanded.
    #[must_use]
    pub fn first_file(&self) -> Option<&ConfigNode> {
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if !node.is_dir {
                return Some(node);
            }
            for &child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        None
    }

    /// Projects the visible rows: pre-order, children in server order, with a
    /// collapsed directory contributing its own row but none of its subtree.
    ///
    /// Runs iteratively in one pass over the visible nodes. The arena itself
    /// is never mutated by projection.
    #[must_use]
    pub fn flatten(&self, expand: &ExpandState) -> Vec<FlatItem> {
        let mut items = Vec::new();
        let mut stack: Vec<(NodeId, usize)> =
            self.roots.iter().rev().map(|&id| (id, 0)).collect();
        while let Some((id, level)) = stack.pop() {
            let node = &self.nodes[id];
            let key = node.key().to_string();
            let expanded = expand.is_expanded(&key);
            items.push(FlatItem {
                name: node.name.clone(),
                path: node.path.clone(),
                is_dir: node.is_dir,
                content: node.content.clone(),
                level,
                key,
                expanded,
                has_children: !node.children.is_empty(),
            });
            if node.is_dir && expanded {
                for &child in node.children.iter().rev() {
                    stack.push((child, level + 1));
                }
            }
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, path: &str, content: &str) -> ConfigFileEntry {
        ConfigFileEntry {
            name: name.to_string(),
            path: path.to_string(),
            is_dir: false,
            content: Some(content.to_string()),
            children: Vec::new(),
        }
    }

    fn dir(name: &str, path: &str, children: Vec<ConfigFileEntry>) -> ConfigFileEntry {
        ConfigFileEntry {
            name: name.to_string(),
            path: path.to_string(),
            is_dir: true,
            content: None,
            children,
        }
    }

    /// The shape most tests use:
    ///
    /// ```text
    /// mosdns/                (dir, path "")
    ///   config.yaml
    ///   rules/
    ///     whitelist.txt
    ///     blocklist.txt
    ///   dns.yaml
    /// ```
    fn sample_tree() -> ConfigTree {
        ConfigTree::from_entries(vec![dir(
            "mosdns",
            "",
            vec![
                file("config.yaml", "config.yaml", "log:\n  level: info\n"),
                dir(
                    "rules",
                    "rules",
                    vec![
                        file("whitelist.txt", "rules/whitelist.txt", "example.com\n"),
                        file("blocklist.txt", "rules/blocklist.txt", "ads.example\n"),
                    ],
                ),
                file("dns.yaml", "dns.yaml", "plugins: []\n"),
            ],
        )])
    }

    // ============ Arena construction ============

    #[test]
    fn build_preserves_sibling_order() {
        let tree = sample_tree();
        assert_eq!(tree.len(), 6);
        let flat = tree.flatten(&ExpandState::new());
        let names: Vec<&str> = flat.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "mosdns",
                "config.yaml",
                "rules",
                "whitelist.txt",
                "blocklist.txt",
                "dns.yaml"
            ]
        );
    }

    #[test]
    fn root_with_empty_path_keys_by_name() {
        let tree = sample_tree();
        let root = tree.get("").unwrap();
        assert_eq!(root.key(), "mosdns");
        let nested = tree.get("rules/whitelist.txt").unwrap();
        assert_eq!(nested.key(), "rules/whitelist.txt");
    }

    #[test]
    fn duplicate_paths_keep_last_occurrence() {
        let tree = ConfigTree::from_entries(vec![
            file("a.txt", "a.txt", "first"),
            file("a.txt", "a.txt", "second"),
        ]);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.content_of("a.txt"), Some("second"));
    }

    #[test]
    fn empty_tree_projects_nothing() {
        let tree = ConfigTree::new();
        assert!(tree.is_empty());
        assert!(tree.flatten(&ExpandState::new()).is_empty());
        assert!(tree.first_file().is_none());
    }

    // ============ Flattening ============

    #[test]
    fn default_state_shows_every_row() {
        let tree = sample_tree();
        let flat = tree.flatten(&ExpandState::new());
        assert_eq!(flat.len(), 6);
        assert!(flat.iter().all(|item| item.expanded));
        let levels: Vec<usize> = flat.iter().map(|i| i.level).collect();
        assert_eq!(levels, vec![0, 1, 1, 2, 2, 1]);
    }

    #[test]
    fn collapsed_directory_prunes_subtree_from_view_only() {
        let tree = sample_tree();
        let mut expand = ExpandState::new();
        expand.toggle("rules");

        let flat = tree.flatten(&expand);
        let names: Vec<&str> = flat.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["mosdns", "config.yaml", "rules", "dns.yaml"]);

        let rules = flat.iter().find(|i| i.key == "rules").unwrap();
        assert!(!rules.expanded);
        assert!(rules.has_children);

        // The subtree survives in the arena and in the path index.
        assert_eq!(tree.content_of("rules/whitelist.txt"), Some("example.com\n"));
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn collapsing_root_hides_everything_below() {
        let tree = sample_tree();
        let mut expand = ExpandState::new();
        expand.toggle("mosdns");
        let flat = tree.flatten(&expand);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].name, "mosdns");
    }

    #[test]
    fn rows_serialize_in_wire_shape() {
        let tree = sample_tree();
        let flat = tree.flatten(&ExpandState::new());

        let dir_row = serde_json::to_value(&flat[2]).unwrap();
        assert_eq!(dir_row["isDir"], true);
        assert_eq!(dir_row["hasChildren"], true);
        assert!(dir_row.get("content").is_none());

        let file_row = serde_json::to_value(&flat[1]).unwrap();
        assert_eq!(file_row["path"], "config.yaml");
        assert_eq!(file_row["content"], "log:\n  level: info\n");
    }

    #[test]
    fn flatten_is_idempotent() {
        let tree = sample_tree();
        let mut expand = ExpandState::new();
        expand.toggle("rules");
        assert_eq!(tree.flatten(&expand), tree.flatten(&expand));
    }

    #[test]
    fn collapse_then_expand_restores_previous_rows() {
        let tree = sample_tree();
        let mut expand = ExpandState::new();
        let initial = tree.flatten(&expand);
        assert!(!expand.toggle("rules"));
        assert!(expand.toggle("rules"));
        assert_eq!(tree.flatten(&expand), initial);
    }

    #[test]
    fn toggling_one_directory_leaves_other_rows_identical() {
        let tree = sample_tree();
        let mut expand = ExpandState::new();
        let before = tree.flatten(&expand);
        expand.toggle("rules");
        let after = tree.flatten(&expand);

        let before_rest: Vec<&FlatItem> =
            before.iter().filter(|i| !i.key.starts_with("rules")).collect();
        let after_rest: Vec<&FlatItem> =
            after.iter().filter(|i| !i.key.starts_with("rules")).collect();
        assert_eq!(before_rest, after_rest);
    }

    #[test]
    fn file_rows_never_spend_their_children() {
        // A malformed backend answer: a file carrying children. The row shows
        // up, its children stay unreachable.
        let tree = ConfigTree::from_entries(vec![ConfigFileEntry {
            name: "weird.yaml".to_string(),
            path: "weird.yaml".to_string(),
            is_dir: false,
            content: Some(String::new()),
            children: vec![file("ghost.txt", "ghost.txt", "")],
        }]);
        let flat = tree.flatten(&ExpandState::new());
        assert_eq!(flat.len(), 1);
        assert!(flat[0].has_children);
    }

    // ============ Write-back ============

    #[test]
    fn set_content_patches_exactly_one_row() {
        let mut tree = sample_tree();
        let expand = ExpandState::new();
        let before = tree.flatten(&expand);

        assert!(tree.set_content("rules/whitelist.txt", "example.com\nnew.example\n"));

        let after = tree.flatten(&expand);
        assert_eq!(before.len(), after.len());
        for (old, new) in before.iter().zip(&after) {
            if old.path == "rules/whitelist.txt" {
                assert_eq!(new.content.as_deref(), Some("example.com\nnew.example\n"));
            } else {
                assert_eq!(old, new);
            }
        }
        // Sibling contents are untouched in the arena as well.
        assert_eq!(tree.content_of("rules/blocklist.txt"), Some("ads.example\n"));
    }

    #[test]
    fn set_content_skips_directories_and_unknown_paths() {
        let mut tree = sample_tree();
        assert!(!tree.set_content("missing.yaml", "x"));
        assert!(!tree.set_content("rules", "x"));
        assert!(tree.get("rules").unwrap().content.is_none());
    }

    // ============ First file ============

    #[test]
    fn first_file_walks_pre_order() {
        let tree = sample_tree();
        assert_eq!(tree.first_file().unwrap().path, "config.yaml");
    }

    #[test]
    fn first_file_descends_through_leading_directories() {
        let tree = ConfigTree::from_entries(vec![
            dir("empty", "empty", vec![]),
            dir(
                "nested",
                "nested",
                vec![dir(
                    "deeper",
                    "nested/deeper",
                    vec![file("target.yaml", "nested/deeper/target.yaml", "")],
                )],
            ),
        ]);
        assert_eq!(tree.first_file().unwrap().path, "nested/deeper/target.yaml");
    }

    #[test]
    fn directories_only_tree_has_no_first_file() {
        let tree = ConfigTree::from_entries(vec![dir("only", "only", vec![])]);
        assert!(tree.first_file().is_none());
    }

    // ============ Depth safety ============

    #[test]
    fn deep_chain_builds_and_projects_iteratively() {
        // 2000 nested directories with one file at the bottom. Recursive
        // implementations overflow the stack well before this.
        let mut entry = file("leaf.txt", "leaf.txt", "bottom");
        for depth in (0..2000).rev() {
            entry = dir(&format!("d{depth}"), &format!("d{depth}"), vec![entry]);
        }
        let tree = ConfigTree::from_entries(vec![entry]);
        assert_eq!(tree.len(), 2001);
        assert_eq!(tree.first_file().unwrap().path, "leaf.txt");
        let flat = tree.flatten(&ExpandState::new());
        assert_eq!(flat.len(), 2001);
        assert_eq!(flat.last().unwrap().level, 2000);
    }
}
