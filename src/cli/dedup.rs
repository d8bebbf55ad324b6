use reqlock::{Layout, Summary};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Command {
    #[instrument(level = "debug", skip(layout))]
    pub fn run(self, layout: &Layout) -> anyhow::Result<()> {
        let summary = reqlock::deduplicate(layout)?;

        match self.format {
            OutputFormat::Table => print_table(&summary),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        }
        Ok(())
    }
}

fn print_table(summary: &Summary) {
    for file in &summary.files {
        let includes = file
            .includes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        println!(
            "{} {:>4} kept {:>4} dropped  {}",
            format!("{:<12}", file.tier).emphasis(),
            file.kept,
            file.dropped(),
            if includes.is_empty() {
                String::new()
            } else {
                format!("-r {includes}").dim()
            }
        );
    }
}
