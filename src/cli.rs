use std::path::{Path, PathBuf};

mod dedup;
mod init;
mod resolve;
mod run;
mod terminal;

use clap::ArgAction;
use reqlock::{Config, Layout, domain::CONFIG_FILE_NAME};

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The project root, containing the manifest
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// Path to the config file [default: <ROOT>/reqlock.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config_path = self
            .config
            .unwrap_or_else(|| self.root.join(CONFIG_FILE_NAME));

        match self.command.unwrap_or_default() {
            Command::Run(command) => command.run(&Self::layout(&self.root, &config_path)?),
            Command::Resolve(command) => command.run(&Self::layout(&self.root, &config_path)?),
            Command::Dedup(command) => command.run(&Self::layout(&self.root, &config_path)?),
            Command::Init(command) => command.run(&config_path),
        }
    }

    fn layout(root: &Path, config_path: &Path) -> anyhow::Result<Layout> {
        let config = Config::load_or_default(config_path)?;
        tracing::debug!(?config, "Loaded configuration");
        Layout::new(root, &config)
            .map_err(|e| anyhow::anyhow!("Failed to resolve project root {}: {e}", root.display()))
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Regenerate and deduplicate every requirements file (default)
    Run(run::Command),

    /// Only regenerate the requirements files with the resolver
    Resolve(resolve::Command),

    /// Only deduplicate the existing requirements files
    Dedup(dedup::Command),

    /// Write a default config file
    Init(init::Command),
}

impl Default for Command {
    fn default() -> Self {
        Self::Run(run::Command::default())
    }
}
