//! status: show the working tree status

use crate::areas::repository::Repository;
use crate::artifacts::status::StatusReport;
use std::io::Write;

impl Repository {
    pub fn status(&mut self) -> anyhow::Result<()> {
        self.assert_not_bare()?;

        let report = StatusReport::gather(self)?;
        writeln!(self.writer(), "{report}")?;
        Ok(())
    }
}
