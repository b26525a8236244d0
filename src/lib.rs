pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod merge;
pub mod models;
pub mod services;

use clap::CommandFactory;
use cli::{Cli, Commands};
pub use config::Config;
use config::LogFormat;
use tracing_subscriber::EnvFilter;

pub fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.general.log_format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    config.validate()?;
    init_tracing(&config);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Init => cli::cmd_init(&config, cli.config.as_deref()).await,
        Commands::Inspect { file } => cli::cmd_inspect(&config, &file).await,
        Commands::Merge { file, yes, json } => cli::cmd_merge(&config, &file, yes, json).await,
        Commands::Export { dest } => cli::cmd_export(&config, &dest).await,
        Commands::Stats => cli::cmd_stats(&config).await,
    }
}
