//! Revision resolution
//!
//! Commands accept refs and object hashes interchangeably. A `Revision`
//! resolves by trying the object store first, then the ref namespace:
//!
//! 1. a valid hash naming a stored object passes through;
//! 2. `FETCH_HEAD` resolves to the hash most recently fetched for the
//!    branch `HEAD` is attached to, which is how `pull` feeds `merge`;
//! 3. any other name resolves through its terminal ref file.

use crate::areas::refs::{Refs, FETCH_HEAD};
use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;

/// A ref name or object hash awaiting resolution
#[derive(Debug, Clone, Copy, new)]
pub struct Revision<'a> {
    raw: &'a str,
}

impl Revision<'_> {
    /// Resolve to a stored object hash, or `None` when nothing matches
    pub fn resolve(&self, repository: &Repository) -> anyhow::Result<Option<ObjectId>> {
        if let Ok(oid) = ObjectId::try_parse(self.raw.to_string()) {
            if repository.database().exists(&oid) {
                return Ok(Some(oid));
            }
        }

        let terminal = repository.refs().terminal_ref(self.raw)?;

        if terminal == FETCH_HEAD {
            return match repository.refs().head_branch_name()? {
                Some(branch) => repository.refs().fetch_head_branch_to_merge(&branch),
                None => Ok(None),
            };
        }

        if Refs::is_ref(&terminal) && repository.refs().exists(&terminal) {
            return repository.refs().read_hash(&terminal);
        }

        Ok(None)
    }
}
