use reqlock::{Layout, SystemRunner};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Default, clap::Parser)]
pub struct Command {}

impl Command {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, layout: &Layout) -> anyhow::Result<()> {
        reqlock::run(layout, &mut SystemRunner)?;

        println!(
            "{}",
            "Requirements files have been successfully processed.".success()
        );
        Ok(())
    }
}
