//! remote: record other repositories in config
//!
//! Only the `add` subcommand exists; everything else is reserved.

use crate::areas::repository::Repository;

impl Repository {
    pub fn remote(&mut self, subcommand: &str, name: &str, url: &str) -> anyhow::Result<()> {
        if subcommand != "add" {
            anyhow::bail!("unsupported");
        }

        let mut config = self.config_data()?;
        if config.has_remote(name) {
            anyhow::bail!("remote {name} already exists");
        }

        config.set("remote", name, "url", url);
        self.config().write(&config)
    }
}
