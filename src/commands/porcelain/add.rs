//! add: stage files, recursively

use crate::areas::repository::Repository;

impl Repository {
    pub fn add(&mut self, path: &str) -> anyhow::Result<()> {
        self.assert_not_bare()?;

        let rooted = self.path_from_root(path);
        let files = self.workspace().ls_recursive(&rooted)?;
        if files.is_empty() {
            anyhow::bail!("{} did not match any files", display_pathspec(&rooted));
        }

        for file in files {
            self.update_index(&file, true, false)?;
        }
        Ok(())
    }
}

fn display_pathspec(rooted: &str) -> &str {
    match rooted.is_empty() {
        true => ".",
        false => rooted,
    }
}
