use reqlock::{Layout, SystemRunner, resolver};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Print the resolver commands instead of running them
    #[arg(long)]
    dry_run: bool,
}

impl Command {
    #[instrument(level = "debug", skip(layout))]
    pub fn run(self, layout: &Layout) -> anyhow::Result<()> {
        if self.dry_run {
            println!("{}", format!("# in {}", layout.root().display()).dim());
            for invocation in resolver::plan(layout) {
                println!("{invocation}");
            }
            return Ok(());
        }

        resolver::resolve(layout, &mut SystemRunner)?;
        println!(
            "Regenerated requirements in {}",
            layout.requirements_dir().display().to_string().emphasis()
        );
        Ok(())
    }
}
