//! Gitlet object identifier (SHA-1 hash)
//!
//! Object ids are 40-character hexadecimal strings. They uniquely identify
//! every object in the store (blobs, trees, commits) and double as branch
//! head values in ref files.

use crate::artifacts::objects::OBJECT_ID_LENGTH;

/// Object identifier (SHA-1 hash)
///
/// A validated 40-character hexadecimal string. Because the store is
/// content-addressed, equal ids imply equal object content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object id from a string
    ///
    /// # Returns
    ///
    /// A validated ObjectId, or an error on invalid length or characters
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("invalid object id length: {}", id.len()));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!("invalid object id characters: {}", id));
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
