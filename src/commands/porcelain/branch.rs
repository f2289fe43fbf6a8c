//! branch: list local branches or create one at HEAD

use crate::areas::refs::{self, to_local_ref};
use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    pub fn branch(&mut self, name: Option<&str>) -> anyhow::Result<()> {
        let name = match name {
            None => {
                let current = self.refs().head_branch_name()?;
                for branch in self.refs().local_heads()?.keys() {
                    let marker = if current.as_deref() == Some(branch) { "*" } else { " " };
                    writeln!(self.writer(), "{marker} {branch}")?;
                }
                return Ok(());
            }
            Some(name) => name,
        };

        let head = match self.resolve(refs::HEAD)? {
            Some(head) => head,
            None => {
                let label = self
                    .refs()
                    .head_branch_name()?
                    .unwrap_or_else(|| refs::HEAD.to_string());
                anyhow::bail!("{label} not a valid object name");
            }
        };

        if self.refs().exists(&to_local_ref(name)) {
            anyhow::bail!("A branch named {name} already exists");
        }

        self.refs().write(&to_local_ref(name), head.as_ref())
    }
}
