use anyhow::Result;
use clap::Parser;
use kakeibo::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    kakeibo::logging::init(cli.verbose);
    cli.run().await
}
