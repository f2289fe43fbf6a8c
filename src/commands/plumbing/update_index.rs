//! update-index: stage or unstage a single path
//!
//! The decision table over (on disk, in index, flags):
//!
//! | on disk | in index | add | remove | action                           |
//! |---------|----------|-----|--------|----------------------------------|
//! | dir     | *        | *   | *      | error: is a directory            |
//! | no      | yes      | *   | yes    | conflicted: unsupported; else rm |
//! | no      | no       | *   | yes    | no-op                            |
//! | yes     | no       | no  | *      | error: use --add                 |
//! | yes     | *        | yes or in index | | stage current content     |
//! | no      | *        | *   | no     | error: does not exist            |

use crate::areas::index::Stage;
use crate::areas::repository::Repository;

impl Repository {
    /// Stage or unstage one repo-root-relative path
    pub fn update_index(&mut self, path: &str, add: bool, remove: bool) -> anyhow::Result<()> {
        self.assert_not_bare()?;

        let is_on_disk = self.workspace().exists(path);
        if is_on_disk && self.workspace().is_dir(path) {
            anyhow::bail!("{path} is a directory - add files inside");
        }

        let is_in_index = self.index().has_file(path, Stage::Clean)?;

        if remove && !is_on_disk && is_in_index {
            if self.index().is_file_in_conflict(path)? {
                anyhow::bail!("unsupported");
            }
            return self.index().write_rm(path);
        }

        if remove && !is_on_disk && !is_in_index {
            return Ok(());
        }

        if !add && is_on_disk && !is_in_index {
            anyhow::bail!("cannot add {path} to index - use --add option");
        }

        if is_on_disk && (add || is_in_index) {
            let blob = self.workspace().parse_blob(path)?;
            return self
                .index()
                .write_non_conflict(path, blob.content(), self.database());
        }

        if !remove && !is_on_disk {
            anyhow::bail!("{path} does not exist and --remove not passed");
        }

        Ok(())
    }
}
