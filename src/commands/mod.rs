//! Command implementations
//!
//! Commands are organized into two categories:
//!
//! - `plumbing`: low-level index and ref manipulation (update-index,
//!   write-tree, update-ref)
//! - `porcelain`: user-facing verbs composing the plumbing into version
//!   control workflows

pub mod plumbing;
pub mod porcelain;
