use anyhow::Context;
use aloha_config::AlohaConfig;
use clap::Parser;

mod cli;
mod commands;
mod context;
mod output;
mod surface;
mod write_lock;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("aloha error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();
    init_tracing(&flags)?;

    let config = load_config(&flags)?;

    let command = cli.command;
    let write_lock = if command.requires_write_lock() {
        Some(write_lock::acquire_for_settings(&config.storage.settings_path).await?)
    } else {
        None
    };

    let mut ctx = context::AppContext::init(config, &flags)
        .await
        .context("failed to initialize aloha application context")?;

    let result = commands::dispatch::dispatch(command, &mut ctx, &flags).await;
    ctx.shutdown(&flags).await;
    drop(write_lock);
    result
}

fn load_config(flags: &cli::GlobalFlags) -> anyhow::Result<AlohaConfig> {
    let mut config = AlohaConfig::load_with_dotenv().context("failed to load aloha config")?;
    if let Some(path) = &flags.settings {
        config.storage.settings_path.clone_from(path);
    }
    Ok(config)
}

fn init_tracing(flags: &cli::GlobalFlags) -> anyhow::Result<()> {
    let level = if flags.quiet {
        "error"
    } else if flags.verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("ALOHA_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
