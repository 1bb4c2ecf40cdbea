//! `memoir` command-line entry point.

use anyhow::Context;
use clap::Parser;
use log::info;
use memoir_rs::cli::{Cli, run};

fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    info!("starting memoir (config_set={})", cli.config.is_some());
    let cwd = std::env::current_dir().context("failed to resolve current working directory")?;
    let output = run(cli, &cwd)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
