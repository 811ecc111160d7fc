//! CivicAlert - citizen incident reporting and triage server.

use anyhow::Result;
use civicalert::cli::Cli;
use civicalert::config::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.log_level.as_deref())?;

    cli.run().await
}
