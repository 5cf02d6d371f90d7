use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use replag::clap_parser::Args;
use replag::settings::{ConnectionSettings, SettingsManager};
use replag::{LagChecker, PgConnector, TableReporter};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("ERROR: {e:#}").red());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let file_settings = match &args.config {
        Some(path) => SettingsManager::new(path).load_settings_from_file().await?,
        None => ConnectionSettings::default(),
    };
    let env_settings = ConnectionSettings::from_environment(|name| std::env::var(name).ok())?;
    let params = args
        .connection_settings()
        .or(env_settings)
        .or(file_settings)
        .into_params(std::env::var("USER").ok());

    let connector = PgConnector;
    let mut reporter = TableReporter::new();
    let mut checker = LagChecker::new(&connector, &mut reporter, &params);
    checker.run().await?;
    Ok(())
}
