use std::path::Path;

use anyhow::Context;
use reqlock::Config;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Overwrite an existing config file
    #[arg(long)]
    force: bool,
}

impl Command {
    #[instrument]
    pub fn run(self, config_path: &Path) -> anyhow::Result<()> {
        if config_path.exists() && !self.force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                config_path.display()
            );
        }

        Config::default()
            .save(config_path)
            .with_context(|| format!("cannot initialise {}", config_path.display()))?;

        println!("Created {}", config_path.display().to_string().emphasis());
        println!();
        println!("Next steps:");
        println!("  make-requirements resolve --dry-run  {}", "# check the commands".dim());
        println!("  make-requirements                    {}", "# regenerate and deduplicate".dim());
        Ok(())
    }
}
