//! Object database
//!
//! The database stores all objects (blobs, trees, commits) under
//! `objects/<hash>` as uncompressed text, content-addressed by the SHA-1 of
//! the serialized form. Writes are idempotent: storing equal payloads twice
//! lands on the same file.
//!
//! Beyond raw storage, the database materializes trees into nested
//! structures and tables of contents, and answers commit ancestry queries
//! for the merge engine.
//!
//! ## Failure model
//!
//! A missing object on read is not an error; `load` returns `None` and the
//! caller decides what absence means. Integrity beyond hash-to-content
//! equality is not enforced.

use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{hash_content, Object, ObjectKind};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Toc, Tree, TreeNode};
use anyhow::Context;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Object database handle over an `objects/` directory
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    /// Store serialized content, returning its id
    ///
    /// Content is hashed and written to `objects/<hash>` unless that file
    /// already exists.
    pub fn store(&self, content: &str) -> anyhow::Result<ObjectId> {
        let oid = hash_content(content)?;
        let object_path = self.path.join(oid.as_ref());

        if !object_path.exists() {
            std::fs::create_dir_all(&self.path).with_context(|| {
                format!("unable to create objects directory {}", self.path.display())
            })?;
            std::fs::write(&object_path, content).with_context(|| {
                format!("unable to write object file {}", object_path.display())
            })?;
        }

        Ok(oid)
    }

    /// Store a typed object by serializing it
    pub fn store_object(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        self.store(&object.serialize())
    }

    /// Load stored content, or `None` when the object is absent
    pub fn load(&self, oid: &ObjectId) -> anyhow::Result<Option<String>> {
        let object_path = self.path.join(oid.as_ref());
        if !object_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&object_path).with_context(|| {
            format!("unable to read object file {}", object_path.display())
        })?;
        Ok(Some(content))
    }

    /// Load stored content, erroring when the object is absent
    pub fn load_required(&self, oid: &ObjectId) -> anyhow::Result<String> {
        self.load(oid)?
            .with_context(|| format!("object {oid} not found in database"))
    }

    pub fn exists(&self, oid: &ObjectId) -> bool {
        self.path.join(oid.as_ref()).exists()
    }

    /// Enumerate the content of every stored object
    ///
    /// Used by the naive whole-store transfer during fetch and push.
    pub fn all_objects(&self) -> anyhow::Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut objects = Vec::new();
        for entry in std::fs::read_dir(&self.path)? {
            let entry = entry?;
            if entry.path().is_file() {
                objects.push(std::fs::read_to_string(entry.path()).with_context(|| {
                    format!("unable to read object file {}", entry.path().display())
                })?);
            }
        }
        Ok(objects)
    }

    /// Classify a stored object by its content
    pub fn kind_of(&self, oid: &ObjectId) -> anyhow::Result<ObjectKind> {
        Ok(ObjectKind::classify(&self.load_required(oid)?))
    }

    /// Write a nested tree to the store bottom-up, returning the root hash
    ///
    /// Blob leaves are already stored; each subtree is serialized after its
    /// children so every referenced hash resolves.
    pub fn write_tree(&self, tree: &Tree) -> anyhow::Result<ObjectId> {
        let mut lines = Vec::new();

        for (name, node) in tree.entries() {
            match node {
                TreeNode::Blob(hash) => lines.push(format!("blob {hash} {name}")),
                TreeNode::Tree(subtree) => {
                    let hash = self.write_tree(subtree)?;
                    lines.push(format!("tree {hash} {name}"));
                }
            }
        }

        self.store(&(lines.join("\n") + "\n"))
    }

    /// Materialize a stored tree into its nested form
    pub fn file_tree(&self, tree_hash: &ObjectId) -> anyhow::Result<Tree> {
        let content = self.load_required(tree_hash)?;
        let mut tree = Tree::new();

        for line in content.lines().filter(|line| !line.trim().is_empty()) {
            let mut tokens = line.split(' ');
            let (kind, hash, name) = (tokens.next(), tokens.next(), tokens.next());
            let (kind, hash, name) = match (kind, hash, name) {
                (Some(kind), Some(hash), Some(name)) => (kind, hash, name),
                _ => anyhow::bail!("malformed tree entry in {tree_hash}: {line:?}"),
            };
            let child_hash = ObjectId::try_parse(hash.to_string())?;

            let node = match kind {
                "tree" => TreeNode::Tree(self.file_tree(&child_hash)?),
                "blob" => TreeNode::Blob(child_hash),
                other => anyhow::bail!("unknown tree entry kind {other:?} in {tree_hash}"),
            };
            tree.insert(name.to_string(), node);
        }

        Ok(tree)
    }

    /// The flattened table of contents of a commit's tree
    pub fn commit_toc(&self, commit_hash: &ObjectId) -> anyhow::Result<Toc> {
        let content = self.load_required(commit_hash)?;
        let tree_hash = Commit::tree_hash(&content)?;
        Ok(self.file_tree(&tree_hash)?.flatten())
    }

    /// The parent hashes of a stored commit
    pub fn parent_hashes(&self, commit_hash: &ObjectId) -> anyhow::Result<Vec<ObjectId>> {
        let content = self.load_required(commit_hash)?;
        if ObjectKind::classify(&content) != ObjectKind::Commit {
            anyhow::bail!("object {commit_hash} is not a commit");
        }
        Commit::parent_hashes(&content)
    }

    /// The transitive closure of a commit's parents
    ///
    /// Parents come before grandparents, and the first parent's line of
    /// history is listed before the second's. The order is deterministic;
    /// ancestor selection during merge depends on it.
    pub fn ancestors(&self, commit_hash: &ObjectId) -> anyhow::Result<Vec<ObjectId>> {
        fn walk(
            database: &Database,
            commit_hash: &ObjectId,
            memo: &mut HashMap<ObjectId, Vec<ObjectId>>,
        ) -> anyhow::Result<Vec<ObjectId>> {
            if let Some(cached) = memo.get(commit_hash) {
                return Ok(cached.clone());
            }

            // a hash whose object was never transferred has no known
            // ancestry; push compares against such hashes conservatively
            if !database.exists(commit_hash) {
                return Ok(Vec::new());
            }

            let parents = database.parent_hashes(commit_hash)?;
            let mut closure = parents.clone();
            for parent in &parents {
                closure.extend(walk(database, parent, memo)?);
            }

            let mut seen = HashSet::new();
            closure.retain(|hash| seen.insert(hash.clone()));

            memo.insert(commit_hash.clone(), closure.clone());
            Ok(closure)
        }

        walk(self, commit_hash, &mut HashMap::new())
    }

    /// Whether `ancestor` appears in the ancestry of `descendent`
    ///
    /// A commit is not its own ancestor.
    pub fn is_ancestor(&self, descendent: &ObjectId, ancestor: &ObjectId) -> anyhow::Result<bool> {
        Ok(self.ancestors(descendent)?.contains(ancestor))
    }

    /// Whether the receiver already contains the giver's history
    pub fn is_up_to_date(
        &self,
        receiver: Option<&ObjectId>,
        giver: &ObjectId,
    ) -> anyhow::Result<bool> {
        match receiver {
            None => Ok(false),
            Some(receiver) => Ok(receiver == giver || self.is_ancestor(receiver, giver)?),
        }
    }
}
