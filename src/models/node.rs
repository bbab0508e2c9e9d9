//! Nodes of the virtual file tree and their persisted form.

use chrono::{DateTime, Utc};
use hashlink::LinkedHashMap;
use serde::{Deserialize, Serialize};

use crate::config;

// =============================================================================
// In-Memory Nodes
// =============================================================================

/// Payload distinguishing files from directories.
///
/// A file carries content and nothing else; a directory carries an
/// insertion-ordered map of owned children keyed by child name. A file has
/// no children map at all, not an empty one.
#[derive(Clone, Debug)]
pub enum NodeKind {
    File { content: String },
    Directory { children: LinkedHashMap<String, Node> },
}

/// A single entry in the virtual tree.
///
/// Nodes are owned exclusively by their parent's children map (the root by
/// the tree itself). There are no parent back-references; parents are found
/// by re-walking from the root.
#[derive(Clone, Debug)]
pub struct Node {
    /// Entry name, never contains `/`.
    pub name: String,
    pub kind: NodeKind,
    /// Owner/group/other permission triad, cosmetic only.
    pub permissions: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Node {
    /// Create a file node with the given content.
    pub fn file(name: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            kind: NodeKind::File {
                content: content.into(),
            },
            permissions: config::FILE_PERMISSIONS.to_string(),
            created: now,
            modified: now,
        }
    }

    /// Create an empty directory node.
    pub fn directory(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            kind: NodeKind::Directory {
                children: LinkedHashMap::new(),
            },
            permissions: config::DIR_PERMISSIONS.to_string(),
            created: now,
            modified: now,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    /// Byte length of the content for files, 0 for directories
    /// (not recursive).
    pub fn size(&self) -> u64 {
        match &self.kind {
            NodeKind::File { content } => content.len() as u64,
            NodeKind::Directory { .. } => 0,
        }
    }

    /// File content, `None` for directories.
    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { content } => Some(content),
            NodeKind::Directory { .. } => None,
        }
    }

    /// Overwrite file content in place, refreshing the modified time.
    /// No-op returning `false` on directories.
    pub fn set_content(&mut self, new_content: impl Into<String>) -> bool {
        match &mut self.kind {
            NodeKind::File { content } => {
                *content = new_content.into();
                self.modified = Utc::now();
                true
            }
            NodeKind::Directory { .. } => false,
        }
    }

    /// Refresh the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    /// Children map, `None` for files.
    pub fn children(&self) -> Option<&LinkedHashMap<String, Node>> {
        match &self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut LinkedHashMap<String, Node>> {
        match &mut self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    /// Convert into the persisted record form.
    pub fn to_record(&self) -> NodeRecord {
        let (kind, content, children) = match &self.kind {
            NodeKind::File { content } => (RecordKind::File, Some(content.clone()), None),
            NodeKind::Directory { children } => (
                RecordKind::Directory,
                None,
                Some(
                    children
                        .iter()
                        .map(|(name, child)| (name.clone(), child.to_record()))
                        .collect(),
                ),
            ),
        };
        NodeRecord {
            name: self.name.clone(),
            kind,
            content,
            permissions: self.permissions.clone(),
            created: self.created,
            modified: self.modified,
            size: self.size(),
            children,
        }
    }

    /// Rebuild a node from its persisted record.
    ///
    /// The stored `size` is ignored; it is derived from content. Children
    /// are re-keyed by their own names to uphold the map-key invariant.
    pub fn from_record(record: NodeRecord) -> Self {
        let kind = match record.kind {
            RecordKind::File => NodeKind::File {
                content: record.content.unwrap_or_default(),
            },
            RecordKind::Directory => {
                let mut map = LinkedHashMap::new();
                for (_, child_record) in record.children.unwrap_or_default() {
                    let child = Node::from_record(child_record);
                    map.insert(child.name.clone(), child);
                }
                NodeKind::Directory { children: map }
            }
        };
        Self {
            name: record.name,
            kind,
            permissions: record.permissions,
            created: record.created,
            modified: record.modified,
        }
    }
}

// =============================================================================
// Persisted Records
// =============================================================================

/// Node kind tag in the persisted format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    File,
    Directory,
}

/// One node in the persisted tree format.
///
/// `content` and `children` are each present for exactly one kind: files
/// carry content and no children entry, directories the reverse. Children
/// are an ordered list of `[name, record]` pairs so insertion order
/// survives the round trip. Timestamps serialize as ISO-8601 strings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeRecord {
    pub name: String,
    pub kind: RecordKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub permissions: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<(String, NodeRecord)>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_size_tracks_content() {
        let mut node = Node::file("a.txt", "hello");
        assert_eq!(node.size(), 5);
        assert!(node.set_content("hi"));
        assert_eq!(node.size(), 2);
        assert_eq!(node.content(), Some("hi"));
    }

    #[test]
    fn test_directory_has_no_content() {
        let mut node = Node::directory("d");
        assert_eq!(node.size(), 0);
        assert!(node.content().is_none());
        assert!(!node.set_content("x"));
        assert!(node.children().is_some());
    }

    #[test]
    fn test_record_round_trip_preserves_order() {
        let mut dir = Node::directory("d");
        let children = dir.children_mut().unwrap();
        children.insert("zeta".to_string(), Node::file("zeta", "1"));
        children.insert("alpha".to_string(), Node::file("alpha", "22"));

        let rebuilt = Node::from_record(dir.to_record());
        let names: Vec<_> = rebuilt.children().unwrap().keys().cloned().collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(rebuilt.children().unwrap().get("alpha").unwrap().size(), 2);
    }

    #[test]
    fn test_record_json_shape() {
        let record = Node::file("a.txt", "hi").to_record();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "file");
        assert_eq!(json["content"], "hi");
        assert_eq!(json["size"], 2);
        // files carry no children entry at all
        assert!(json.get("children").is_none());
        // timestamps serialize as ISO-8601 strings
        assert!(json["created"].as_str().unwrap().contains('T'));
    }
}
