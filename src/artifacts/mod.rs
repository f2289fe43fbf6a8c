//! Data structures and algorithms
//!
//! - `diff`: three-way table-of-contents diffing
//! - `merge`: common ancestors, fast-forward, merge state
//! - `objects`: object types (blob, tree, commit)
//! - `revision`: ref-or-hash resolution
//! - `status`: working tree status assembly

pub mod diff;
pub mod merge;
pub mod objects;
pub mod revision;
pub mod status;
