//! Core object trait and content classification
//!
//! Objects are serialized to plain text and identified by the SHA-1 of that
//! text. Classification inspects only the first whitespace-separated token
//! of the content:
//!
//! - `commit` marks a commit header;
//! - `tree` or `blob` marks a tree listing, since every tree line starts
//!   with the kind token of its child entry;
//! - anything else is a blob.
//!
//! A file whose content happens to start with the word `blob` is therefore
//! classified as a tree. No caller distinguishes trees from blobs through
//! this function; only the commit/non-commit split is load-bearing.

use crate::artifacts::objects::object_id::ObjectId;
use sha1::{Digest, Sha1};

/// Object kind, as recovered from serialized content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
}

impl ObjectKind {
    /// Classify serialized content by its first token
    pub fn classify(content: &str) -> ObjectKind {
        match content.split_whitespace().next() {
            Some("commit") => ObjectKind::Commit,
            Some("tree") | Some("blob") => ObjectKind::Tree,
            _ => ObjectKind::Blob,
        }
    }
}

/// Hash serialized content into its object id
pub fn hash_content(content: &str) -> anyhow::Result<ObjectId> {
    let mut hasher = Sha1::new();
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();
    ObjectId::try_parse(format!("{digest:x}"))
}

/// Core object trait
///
/// Implemented by Blob and Commit. Trees hash the same way but serialize
/// through the database, which must write child objects bottom-up first.
pub trait Object {
    /// Serialize the object to its exact stored text
    fn serialize(&self) -> String;

    /// The object's kind
    fn kind(&self) -> ObjectKind;

    /// Compute the object id by hashing the serialized content
    fn object_id(&self) -> anyhow::Result<ObjectId> {
        hash_content(&self.serialize())
    }
}
