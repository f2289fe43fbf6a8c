//! Tree object
//!
//! A tree is a directory listing, one child per line:
//!
//! ```text
//! <kind> <child-hash> <name>
//! ```
//!
//! where `<kind>` is `blob` or `tree`. In memory a tree is a typed nested
//! map; entries are kept in a BTreeMap so serialization order, and with it
//! the tree's hash, is deterministic.
//!
//! A flattened tree is a table of contents (TOC): a map from
//! slash-separated repo-relative path to blob hash.

use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;

/// Flattened view of a tree: path -> blob hash
pub type Toc = BTreeMap<String, ObjectId>;

/// A single tree entry: either a file or a nested directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Blob(ObjectId),
    Tree(Tree),
}

/// Tree object: a node in the directory DAG
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tree {
    entries: BTreeMap<String, TreeNode>,
}

impl Tree {
    pub fn new() -> Self {
        Tree::default()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &TreeNode)> {
        self.entries.iter()
    }

    pub fn insert(&mut self, name: String, node: TreeNode) {
        self.entries.insert(name, node);
    }

    pub fn get(&self, name: &str) -> Option<&TreeNode> {
        self.entries.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nest a flat TOC into a tree of blobs and subtrees
    ///
    /// Paths are split on `/`; intermediate segments become nested trees.
    pub fn from_toc(toc: &Toc) -> Self {
        let mut root = Tree::new();

        for (path, hash) in toc {
            let mut segments = path.split('/').collect::<Vec<_>>();
            let leaf = segments.pop().expect("toc paths are non-empty");

            let mut node = &mut root;
            for segment in segments {
                let child = node
                    .entries
                    .entry(segment.to_string())
                    .or_insert_with(|| TreeNode::Tree(Tree::new()));
                node = match child {
                    TreeNode::Tree(subtree) => subtree,
                    // a file and a directory with the same name cannot both
                    // be staged; the later directory entry wins
                    TreeNode::Blob(_) => {
                        *child = TreeNode::Tree(Tree::new());
                        match child {
                            TreeNode::Tree(subtree) => subtree,
                            TreeNode::Blob(_) => unreachable!(),
                        }
                    }
                };
            }

            node.entries.insert(leaf.to_string(), TreeNode::Blob(hash.clone()));
        }

        root
    }

    /// Flatten the nested tree back into a TOC
    pub fn flatten(&self) -> Toc {
        let mut toc = Toc::new();
        self.flatten_into("", &mut toc);
        toc
    }

    fn flatten_into(&self, prefix: &str, toc: &mut Toc) {
        for (name, node) in &self.entries {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}/{name}")
            };

            match node {
                TreeNode::Blob(hash) => {
                    toc.insert(path, hash.clone());
                }
                TreeNode::Tree(subtree) => subtree.flatten_into(&path, toc),
            }
        }
    }
}
