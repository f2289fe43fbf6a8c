//! Blob object
//!
//! A blob is the stored content of a single file, kept verbatim. There is
//! no header; the content is the serialized form.

use crate::artifacts::objects::object::{Object, ObjectKind};
use derive_new::new;

/// Blob object wrapping raw file content
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: String,
}

impl Blob {
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Object for Blob {
    fn serialize(&self) -> String {
        self.content.clone()
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Blob
    }
}
