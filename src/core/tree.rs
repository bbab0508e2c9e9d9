//! The virtual file tree.
//!
//! An in-memory node graph addressed by absolute path. There is exactly one
//! root (`/`), owned by the tree; every other node is owned by its parent's
//! children map. Traversal always starts at the root and walks down by path
//! segment; there are no parent pointers.
//!
//! Every mutating operation is all-or-nothing and signals failure through a
//! boolean or `None` instead of an error. The tree is mutated by exactly one
//! caller at a time by construction: the dispatcher holds `&mut VirtualTree`
//! for the full duration of a command.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::config;
use crate::core::path;
use crate::models::{Node, NodeKind, NodeRecord};

/// Child descriptor returned by [`VirtualTree::list`].
#[derive(Clone, Debug)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub permissions: String,
    pub modified: DateTime<Utc>,
}

/// Virtual hierarchical file tree with a current working directory.
#[derive(Clone, Debug)]
pub struct VirtualTree {
    root: Node,
    /// Current working path in `~`-normalized display form. Always resolves
    /// to an existing directory.
    cwd: String,
    home: String,
}

impl VirtualTree {
    /// Create the default seeded tree with the working directory at home.
    pub fn new() -> Self {
        let mut tree = Self {
            root: Node::directory(""),
            cwd: "~".to_string(),
            home: config::HOME_PATH.to_string(),
        };
        for dir in config::SEED_DIRECTORIES {
            tree.ensure_directory_path(dir);
        }
        for (file_path, content) in config::SEED_FILES {
            tree.insert_file_at(file_path, content);
        }
        tree
    }

    pub fn home(&self) -> &str {
        &self.home
    }

    /// The raw current-path field, `~`-form when applicable.
    pub fn current_directory(&self) -> &str {
        &self.cwd
    }

    /// The current working directory as an absolute path.
    pub fn current_absolute(&self) -> String {
        path::to_absolute_display_path(&self.cwd, &self.home)
    }

    /// Change the current working directory.
    ///
    /// Succeeds only when the resolved target exists and is a directory;
    /// otherwise the current path is left unchanged.
    pub fn set_current_directory(&mut self, target: &str) -> bool {
        let absolute = path::resolve(target, &self.current_absolute(), &self.home);
        match self.lookup(&absolute) {
            Some(node) if node.is_directory() => {
                self.cwd = path::to_display_path(&absolute, &self.home);
                true
            }
            _ => false,
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Walk from the root to the node at an absolute path.
    fn lookup(&self, absolute: &str) -> Option<&Node> {
        let mut current = &self.root;
        for segment in absolute.split('/').filter(|s| !s.is_empty()) {
            current = current.children()?.get(segment)?;
        }
        Some(current)
    }

    fn lookup_mut(&mut self, absolute: &str) -> Option<&mut Node> {
        let mut current = &mut self.root;
        for segment in absolute.split('/').filter(|s| !s.is_empty()) {
            current = current.children_mut()?.get_mut(segment)?;
        }
        Some(current)
    }

    fn current_dir_node_mut(&mut self) -> Option<&mut Node> {
        let absolute = self.current_absolute();
        self.lookup_mut(&absolute)
    }

    /// Look up a node the way commands address them: a path containing `/`
    /// is resolved against the tree root, while a bare name is looked up
    /// only as a direct child of the current directory. Commands pass bare
    /// filenames for same-directory operations and slash paths for
    /// cross-directory ones.
    pub fn get_node(&self, target: &str) -> Option<&Node> {
        if target.contains('/') || target == "~" {
            let absolute = path::resolve(target, "/", &self.home);
            self.lookup(&absolute)
        } else {
            self.lookup(&self.current_absolute())?.children()?.get(target)
        }
    }

    /// Whether [`get_node`](Self::get_node) would find anything.
    pub fn exists(&self, target: &str) -> bool {
        self.get_node(target).is_some()
    }

    /// Expand `~` forms and absolute paths as-is; a plain relative input is
    /// taken relative to home, without consulting the current directory.
    pub fn absolute_path(&self, target: &str) -> String {
        if target == "~" || target.starts_with("~/") || target.starts_with('/') {
            path::to_absolute_display_path(target, &self.home)
        } else {
            format!("{}/{}", self.home, target)
        }
    }

    // =========================================================================
    // Listing
    // =========================================================================

    /// List child descriptors of a directory (the current directory when
    /// `target` is `None`). A missing or non-directory target yields an
    /// empty list, not an error.
    ///
    /// Ordering: directories before files; within each group, case-sensitive
    /// lexicographic by name.
    pub fn list(&self, target: Option<&str>) -> Vec<DirEntry> {
        let absolute = match target {
            Some(t) => path::resolve(t, &self.current_absolute(), &self.home),
            None => self.current_absolute(),
        };
        let Some(children) = self.lookup(&absolute).and_then(Node::children) else {
            return Vec::new();
        };

        let mut entries: Vec<DirEntry> = children
            .iter()
            .map(|(name, child)| DirEntry {
                name: name.clone(),
                is_dir: child.is_directory(),
                size: child.size(),
                permissions: child.permissions.clone(),
                modified: child.modified,
            })
            .collect();
        entries.sort_by(|a, b| match (a.is_dir, b.is_dir) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => a.name.cmp(&b.name),
        });
        entries
    }

    // =========================================================================
    // Mutation (current directory)
    // =========================================================================

    /// Insert a new file into the current directory. Fails on name
    /// collisions and on names containing `/`.
    pub fn create_file(&mut self, name: &str, content: &str) -> bool {
        self.insert_child(Node::file(name, content))
    }

    /// Insert a new empty directory into the current directory, same
    /// collision rule as [`create_file`](Self::create_file).
    pub fn create_directory(&mut self, name: &str) -> bool {
        self.insert_child(Node::directory(name))
    }

    fn insert_child(&mut self, node: Node) -> bool {
        if node.name.is_empty() || node.name.contains('/') {
            return false;
        }
        let Some(parent) = self.current_dir_node_mut() else {
            return false;
        };
        let Some(children) = parent.children_mut() else {
            return false;
        };
        if children.contains_key(&node.name) {
            return false;
        }
        children.insert(node.name.clone(), node);
        parent.touch();
        true
    }

    /// Remove an entry from the current directory, deleting its entire
    /// subtree. Fails when the entry is absent, or when it is a non-empty
    /// directory and `recursive` is false. Deletion is immediate and total.
    pub fn delete_node(&mut self, name: &str, recursive: bool) -> bool {
        let Some(parent) = self.current_dir_node_mut() else {
            return false;
        };
        let Some(children) = parent.children_mut() else {
            return false;
        };
        let non_empty_dir = match children.get(name) {
            None => return false,
            Some(node) => node.children().is_some_and(|c| !c.is_empty()),
        };
        if non_empty_dir && !recursive {
            return false;
        }
        children.remove(name);
        parent.touch();
        true
    }

    /// Content of a file in the current directory, `None` when absent or a
    /// directory.
    pub fn read_file(&self, name: &str) -> Option<String> {
        self.lookup(&self.current_absolute())?
            .children()?
            .get(name)?
            .content()
            .map(str::to_string)
    }

    /// Overwrite an existing file in place, or create it when absent.
    /// Fails when the name is taken by a directory.
    pub fn write_file(&mut self, name: &str, content: &str) -> bool {
        let existing_kind = self
            .lookup(&self.current_absolute())
            .and_then(Node::children)
            .and_then(|c| c.get(name))
            .map(Node::is_directory);
        match existing_kind {
            Some(true) => false,
            Some(false) => {
                let Some(parent) = self.current_dir_node_mut() else {
                    return false;
                };
                parent
                    .children_mut()
                    .and_then(|c| c.get_mut(name))
                    .is_some_and(|node| node.set_content(content))
            }
            None => self.create_file(name, content),
        }
    }

    // =========================================================================
    // Mutation (arbitrary path)
    // =========================================================================

    /// Write (or append) content to a file at a possibly cross-directory
    /// path, resolved against the current directory. The parent directory
    /// must already exist. Used by the dispatcher for output redirection.
    pub fn write_file_at(&mut self, target: &str, content: &str, append: bool) -> bool {
        let absolute = path::resolve(target, &self.current_absolute(), &self.home);
        let parent_abs = path::parent_path(&absolute);
        let Some(name) = absolute
            .rsplit('/')
            .next()
            .filter(|n| !n.is_empty())
            .map(str::to_string)
        else {
            return false;
        };
        let Some(children) = self.lookup_mut(&parent_abs).and_then(Node::children_mut) else {
            return false;
        };
        match children.get_mut(&name) {
            Some(node) if node.is_directory() => false,
            Some(node) => {
                let new_content = if append {
                    match node.content() {
                        Some("") | None => content.to_string(),
                        Some(old) => format!("{}\n{}", old, content),
                    }
                } else {
                    content.to_string()
                };
                node.set_content(new_content)
            }
            None => {
                children.insert(name.clone(), Node::file(name, content));
                true
            }
        }
    }

    /// Create every missing directory along an absolute path. Stops at a
    /// file blocking the walk.
    fn ensure_directory_path(&mut self, absolute: &str) {
        let mut current = &mut self.root;
        for segment in absolute.split('/').filter(|s| !s.is_empty()) {
            let Some(children) = current.children_mut() else {
                warn!(path = absolute, "seed path blocked by a file");
                return;
            };
            if !children.contains_key(segment) {
                children.insert(segment.to_string(), Node::directory(segment));
            }
            current = match children.get_mut(segment) {
                Some(node) => node,
                None => return,
            };
        }
    }

    fn insert_file_at(&mut self, absolute: &str, content: &str) {
        self.ensure_directory_path(&path::parent_path(absolute));
        if let Some(name) = absolute.rsplit('/').next().filter(|n| !n.is_empty())
            && let Some(children) = self
                .lookup_mut(&path::parent_path(absolute))
                .and_then(Node::children_mut)
            && !children.contains_key(name)
        {
            children.insert(name.to_string(), Node::file(name, content));
        }
    }

    // =========================================================================
    // Serialization Hooks
    // =========================================================================

    /// Snapshot the whole tree as a persisted record.
    pub fn to_record(&self) -> NodeRecord {
        self.root.to_record()
    }

    /// Rebuild a tree from a persisted record. The working directory resets
    /// to home.
    pub fn from_record(record: NodeRecord) -> Self {
        Self {
            root: Node::from_record(record),
            cwd: "~".to_string(),
            home: config::HOME_PATH.to_string(),
        }
    }

    /// Serialize the tree to its storage blob.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_record())
    }

    /// Deserialize a tree from its storage blob, falling back to the
    /// default seeded structure on missing or corrupt data.
    pub fn from_json(data: &str) -> Self {
        match serde_json::from_str::<NodeRecord>(data) {
            Ok(record) => Self::from_record(record),
            Err(err) => {
                warn!(%err, "tree blob unreadable, falling back to seeded tree");
                Self::new()
            }
        }
    }

    /// Total node count including the root. Diagnostic only.
    pub fn node_count(&self) -> usize {
        fn count(node: &Node) -> usize {
            1 + match &node.kind {
                NodeKind::Directory { children } => children.values().map(count).sum(),
                NodeKind::File { .. } => 0,
            }
        }
        count(&self.root)
    }
}

impl Default for VirtualTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_tree() {
        let tree = VirtualTree::new();
        assert_eq!(tree.current_directory(), "~");
        assert!(tree.exists("/etc/motd"));
        assert!(tree.exists("~/docs"));
        assert!(tree.exists("readme.txt")); // bare name, child of cwd
        assert!(tree.node_count() > 5);
    }

    #[test]
    fn test_set_current_directory() {
        let mut tree = VirtualTree::new();
        assert!(tree.set_current_directory("/etc"));
        assert_eq!(tree.current_directory(), "/etc");
        assert!(tree.set_current_directory("~"));
        assert_eq!(tree.current_directory(), "~");
        assert!(tree.set_current_directory("docs"));
        assert_eq!(tree.current_directory(), "~/docs");
    }

    #[test]
    fn test_cd_rejects_files_and_missing_targets() {
        let mut tree = VirtualTree::new();
        assert!(!tree.set_current_directory("/etc/motd"));
        assert!(!tree.set_current_directory("/no/such/dir"));
        assert_eq!(tree.current_directory(), "~");
    }

    #[test]
    fn test_create_file_and_collision() {
        let mut tree = VirtualTree::new();
        assert!(tree.create_file("x", "first"));
        assert!(tree.exists("x"));
        assert!(!tree.create_file("x", "second"));
        // the first file's content is untouched by the failed create
        assert_eq!(tree.read_file("x").as_deref(), Some("first"));
    }

    #[test]
    fn test_create_rejects_slashes() {
        let mut tree = VirtualTree::new();
        assert!(!tree.create_file("a/b", ""));
        assert!(!tree.create_directory(""));
    }

    #[test]
    fn test_delete_node() {
        let mut tree = VirtualTree::new();
        // docs is seeded non-empty
        assert!(!tree.delete_node("docs", false));
        assert!(tree.exists("docs"));
        assert!(tree.get_node("~/docs/notes.txt").is_some());
        assert!(tree.delete_node("docs", true));
        assert!(!tree.exists("docs"));
        assert!(!tree.delete_node("docs", true));
    }

    #[test]
    fn test_delete_empty_directory_without_recursive() {
        let mut tree = VirtualTree::new();
        assert!(tree.create_directory("empty"));
        assert!(tree.delete_node("empty", false));
    }

    #[test]
    fn test_read_write_file() {
        let mut tree = VirtualTree::new();
        assert!(tree.read_file("missing").is_none());
        assert!(tree.read_file("docs").is_none()); // directory, not a file

        assert!(tree.write_file("new.txt", "v1"));
        assert_eq!(tree.read_file("new.txt").as_deref(), Some("v1"));
        assert!(tree.write_file("new.txt", "v2"));
        assert_eq!(tree.read_file("new.txt").as_deref(), Some("v2"));
        assert!(!tree.write_file("docs", "nope"));
    }

    #[test]
    fn test_list_ordering() {
        let mut tree = VirtualTree::new();
        tree.create_file("bbb.txt", "");
        tree.create_file("aaa.txt", "");
        tree.create_directory("zdir");
        let entries = tree.list(None);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        // directories first, each group lexicographic
        assert_eq!(names, vec!["docs", "zdir", "aaa.txt", "bbb.txt", "readme.txt"]);
        let unique: std::collections::HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_list_missing_is_empty() {
        let tree = VirtualTree::new();
        assert!(tree.list(Some("/nope")).is_empty());
        assert!(tree.list(Some("/etc/motd")).is_empty());
    }

    #[test]
    fn test_get_node_asymmetry() {
        let tree = VirtualTree::new();
        // cwd is ~, but a bare name only matches direct children of cwd
        assert!(tree.get_node("motd").is_none());
        // slash paths resolve against the tree root
        assert!(tree.get_node("/etc/motd").is_some());
        assert!(tree.get_node("~/docs/notes.txt").is_some());
        assert!(tree.get_node("etc/motd").is_some());
    }

    #[test]
    fn test_absolute_path_defaults_to_home() {
        let tree = VirtualTree::new();
        assert_eq!(tree.absolute_path("~"), "/home/user");
        assert_eq!(tree.absolute_path("~/x"), "/home/user/x");
        assert_eq!(tree.absolute_path("/etc"), "/etc");
        assert_eq!(tree.absolute_path("notes"), "/home/user/notes");
    }

    #[test]
    fn test_write_file_at() {
        let mut tree = VirtualTree::new();
        assert!(tree.write_file_at("/tmp/out.txt", "one", false));
        assert_eq!(
            tree.get_node("/tmp/out.txt").unwrap().content(),
            Some("one")
        );
        assert!(tree.write_file_at("/tmp/out.txt", "two", true));
        assert_eq!(
            tree.get_node("/tmp/out.txt").unwrap().content(),
            Some("one\ntwo")
        );
        assert!(tree.write_file_at("/tmp/out.txt", "fresh", false));
        assert_eq!(
            tree.get_node("/tmp/out.txt").unwrap().content(),
            Some("fresh")
        );
        // parent directory must already exist
        assert!(!tree.write_file_at("/nope/out.txt", "x", false));
        // a directory cannot be a redirect target
        assert!(!tree.write_file_at("/tmp", "x", false));
    }

    #[test]
    fn test_json_round_trip() {
        let mut tree = VirtualTree::new();
        tree.create_file("extra.txt", "payload");
        let blob = tree.to_json().unwrap();

        let restored = VirtualTree::from_json(&blob);
        for dir in ["/", "/etc", "/home/user", "/home/user/docs", "/tmp"] {
            let before = tree.list(Some(dir));
            let after = restored.list(Some(dir));
            assert_eq!(before.len(), after.len(), "{dir}");
            for (a, b) in before.iter().zip(after.iter()) {
                assert_eq!(a.name, b.name);
                assert_eq!(a.is_dir, b.is_dir);
                assert_eq!(a.size, b.size);
            }
        }
        assert_eq!(
            restored.get_node("/home/user/extra.txt").unwrap().content(),
            Some("payload")
        );
    }

    #[test]
    fn test_corrupt_blob_falls_back_to_seed() {
        let tree = VirtualTree::from_json("{not json");
        assert!(tree.exists("/etc/motd"));
        let tree = VirtualTree::from_json("");
        assert_eq!(tree.current_directory(), "~");
    }
}
