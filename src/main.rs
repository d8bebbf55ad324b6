//! `make-requirements`: regenerate and deduplicate layered requirement files.

use clap::Parser;

mod cli;
use cli::Cli;

fn main() -> anyhow::Result<()> {
    Cli::parse().run()
}
