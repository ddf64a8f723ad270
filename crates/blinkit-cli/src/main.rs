mod collect;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::collect::{run_collect, CollectArgs};

#[derive(Debug, Parser)]
#[command(name = "blinkit-cli")]
#[command(about = "Collect Blinkit category listings into a products CSV")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch every category at every location (the default command)
    Collect(CollectArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = blinkit_core::load_app_config().context("failed to load app config")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))
        .context("failed to build log filter")?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = match cli.command {
        Some(Commands::Collect(args)) => args,
        None => CollectArgs::default(),
    };
    args.apply(&mut config);

    run_collect(&config).await
}
