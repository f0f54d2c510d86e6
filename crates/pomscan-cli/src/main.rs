//! pomscan - rebuild a pom.xml from a directory of jars

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pomscan_cli::Cli;
use pomscan_cli::cmd;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("pomscan=debug,pomscan_cli=debug,pomscan_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    cmd::scan::scan(cli).await
}
