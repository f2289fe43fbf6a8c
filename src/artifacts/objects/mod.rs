//! Gitlet object types
//!
//! The object store knows three kinds of objects:
//!
//! - `blob`: raw file content
//! - `tree`: a line-per-entry directory listing referencing blobs and trees
//! - `commit`: a snapshot header referencing one tree and 0..n parents
//!
//! All objects are plain text and are addressed by the SHA-1 of their exact
//! serialized form.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod tree;

/// Length of a full object id (SHA-1 hex digest)
pub const OBJECT_ID_LENGTH: usize = 40;
