//! update-ref: point a ref at a commit

use crate::areas::refs::Refs;
use crate::areas::repository::Repository;
use crate::artifacts::objects::object::ObjectKind;

impl Repository {
    /// Point the terminal ref of `ref_to_update` at the commit named by
    /// `ref_or_hash`
    pub fn update_ref(&mut self, ref_to_update: &str, ref_or_hash: &str) -> anyhow::Result<()> {
        let hash = match self.resolve(ref_or_hash)? {
            Some(hash) => hash,
            None => anyhow::bail!("{ref_or_hash} not a valid SHA1"),
        };

        if !Refs::is_ref(ref_to_update) {
            anyhow::bail!("cannot lock the ref {ref_to_update}");
        }

        let terminal = self.refs().terminal_ref(ref_to_update)?;
        if self.database().kind_of(&hash)? != ObjectKind::Commit {
            anyhow::bail!("Trying to write non-commit object {hash} to branch {terminal}");
        }

        self.refs().write(&terminal, hash.as_ref())
    }
}
