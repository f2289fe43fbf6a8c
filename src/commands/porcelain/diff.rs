//! diff: print name-status lines between two repository states

use crate::areas::repository::Repository;
use crate::artifacts::diff;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    pub fn diff(&mut self, ref1: Option<&str>, ref2: Option<&str>) -> anyhow::Result<()> {
        self.assert_not_bare()?;

        let resolve = |rev: Option<&str>| -> anyhow::Result<Option<ObjectId>> {
            match rev {
                None => Ok(None),
                Some(rev) => match self.resolve(rev)? {
                    Some(hash) => Ok(Some(hash)),
                    None => anyhow::bail!("ambiguous argument {rev}: unknown revision"),
                },
            }
        };
        let hash1 = resolve(ref1)?;
        let hash2 = resolve(ref2)?;

        let name_status = diff::name_status(&diff::diff(self, hash1.as_ref(), hash2.as_ref())?);
        for (path, status) in name_status {
            writeln!(self.writer(), "{status} {path}")?;
        }
        Ok(())
    }
}
