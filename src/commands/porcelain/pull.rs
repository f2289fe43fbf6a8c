//! pull: fetch a remote branch and merge FETCH_HEAD

use crate::areas::refs;
use crate::areas::repository::Repository;

impl Repository {
    pub fn pull(&mut self, remote: &str, branch: &str) -> anyhow::Result<()> {
        self.assert_not_bare()?;
        self.fetch(remote, branch)?;
        self.merge(refs::FETCH_HEAD)
    }
}
