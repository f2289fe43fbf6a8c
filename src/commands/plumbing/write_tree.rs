//! write-tree: promote the index into tree objects

use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use std::io::Write;

impl Repository {
    /// Write the index as tree objects and print the root tree hash
    pub fn write_tree(&mut self) -> anyhow::Result<()> {
        let hash = self.write_tree_object()?;
        writeln!(self.writer(), "{hash}")?;
        Ok(())
    }

    /// Write the index's stage 0 contents as tree objects, bottom-up
    pub(crate) fn write_tree_object(&self) -> anyhow::Result<ObjectId> {
        let toc = self.index().toc()?;
        self.database().write_tree(&Tree::from_toc(&toc))
    }
}
