//! rm: unstage and delete files
//!
//! Refuses directories without `-r`, refuses targets with unsaved
//! changes, and keeps `-f` reserved as unsupported.

use crate::areas::repository::Repository;
use crate::artifacts::diff;

impl Repository {
    pub fn rm(&mut self, path: &str, recursive: bool, force: bool) -> anyhow::Result<()> {
        self.assert_not_bare()?;

        if force {
            anyhow::bail!("unsupported");
        }

        let rooted = self.path_from_root(path);
        let targets = self.index().matching_files(&rooted)?;
        if targets.is_empty() {
            anyhow::bail!("{rooted} did not match any files");
        }

        if self.workspace().is_dir(&rooted) && !recursive {
            anyhow::bail!("not removing {rooted} recursively without -r");
        }

        let changed = diff::added_or_modified_files(self)?
            .into_iter()
            .filter(|path| targets.contains(path))
            .collect::<Vec<_>>();
        if !changed.is_empty() {
            anyhow::bail!("these files have changes:\n{}\n", changed.join("\n"));
        }

        for target in &targets {
            if self.workspace().exists(target) {
                self.workspace().remove_file(target)?;
            }
            self.update_index(target, false, true)?;
        }
        self.workspace().remove_empty_dirs()?;

        Ok(())
    }
}
