//! CLI entry point for the key/value store demo.

use clap::Parser;
use cli::CliConfig;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let config = CliConfig::parse();
    let result = config.run()?;
    println!("{result}");
    Ok(())
}
