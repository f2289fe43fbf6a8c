//! fetch: import a remote branch's objects and record its head
//!
//! Every remote object is copied wholesale; content addressing makes the
//! copy idempotent. The remote-tracking ref moves to the fetched hash and
//! FETCH_HEAD gains a record for the branch.

use crate::areas::refs::to_remote_ref;
use crate::areas::repository::Repository;
use crate::areas::transport::with_repository_at;
use crate::artifacts::merge;
use std::io::Write;
use std::path::PathBuf;

impl Repository {
    pub fn fetch(&mut self, remote: &str, branch: &str) -> anyhow::Result<()> {
        let config = self.config_data()?;
        let url = match config.remote_url(remote) {
            Some(url) => url.to_string(),
            None => anyhow::bail!("{remote} does not appear to be a git repository"),
        };
        let remote_path = self.remote_disk_path(&url);

        let remote_ref = to_remote_ref(remote, branch);
        let (new_hash, remote_objects) = with_repository_at(&remote_path, |peer| {
            Ok((peer.resolve(branch)?, peer.database().all_objects()?))
        })?;
        let new_hash = match new_hash {
            Some(hash) => hash,
            None => anyhow::bail!("couldn't find remote ref {branch}"),
        };

        let old_hash = self.resolve(&remote_ref)?;
        let count = remote_objects.len();
        for object in &remote_objects {
            self.database().store(object)?;
        }

        self.update_ref(&remote_ref, new_hash.as_ref())?;
        self.refs().record_fetch(&new_hash, branch, &url)?;

        let forced = merge::is_force_fetch(self.database(), old_hash.as_ref(), &new_hash)?;
        writeln!(
            self.writer(),
            "From {url}\nCount {count}\n{branch} -> {remote}/{branch}{}",
            if forced { " (forced)" } else { "" }
        )?;
        Ok(())
    }

    /// Resolve a remote url against the repository root
    pub(crate) fn remote_disk_path(&self, url: &str) -> PathBuf {
        let path = PathBuf::from(url);
        if path.is_absolute() {
            path
        } else {
            self.work_dir().join(path)
        }
    }
}
