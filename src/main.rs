mod cli;
mod collect;
mod config;
mod error;
mod forge;
mod report;
mod types;

use crate::error::ShowcaseError;
use chrono::Utc;
use clap::Parser;
use forge::http::HttpTransport;
use forge::ForgeClient;
use std::io::{self, IsTerminal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const CONFIGURATION_FAILURE: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn collect_stage(paths: &cli::PathArgs) -> Result<(), ShowcaseError> {
    let site_config = config::load_site_config(&paths.config_path())?;
    let overrides = config::load_overrides(&paths.overrides_path())?;
    let transport = HttpTransport::new(site_config.credentials())?;
    let client = ForgeClient::new(transport, &site_config.api_url);

    let snapshot = collect::collect(&client, &site_config, &overrides, Utc::now())?;
    report::json::write_snapshot(&paths.snapshot_path(), &snapshot)
}

fn render_stage(paths: &cli::PathArgs) -> Result<(), ShowcaseError> {
    let site_config = config::load_site_config(&paths.config_path())?;
    let snapshot = report::json::read_snapshot(&paths.snapshot_path())?;
    report::html::write_page(
        &paths.template_path(),
        &snapshot,
        site_config.featured_count,
        &paths.page_path(),
    )
}

fn run(cli: &cli::Cli) -> Result<(), ShowcaseError> {
    match cli.command.unwrap_or(cli::Commands::Run) {
        cli::Commands::Collect => collect_stage(&cli.paths),
        cli::Commands::Render => render_stage(&cli.paths),
        cli::Commands::Run => {
            collect_stage(&cli.paths)?;
            render_stage(&cli.paths)
        }
    }
}

fn exit_code_for(err: &ShowcaseError) -> i32 {
    match err {
        ShowcaseError::Configuration { .. } => exit_code::CONFIGURATION_FAILURE,
        ShowcaseError::RateLimited { .. }
        | ShowcaseError::ForgeApi { .. }
        | ShowcaseError::MissingReadme { .. }
        | ShowcaseError::Payload { .. }
        | ShowcaseError::Io(_)
        | ShowcaseError::Json(_)
        | ShowcaseError::Yaml(_)
        | ShowcaseError::Http(_)
        | ShowcaseError::Template(_) => exit_code::RUNTIME_FAILURE,
    }
}

fn log_filter(cli: &cli::Cli) -> EnvFilter {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn main() {
    let cli = cli::Cli::parse();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(log_filter(&cli))
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .finish();

    let code = tracing::subscriber::with_default(subscriber, || match run(&cli) {
        Ok(()) => {
            info!("done");
            exit_code::SUCCESS
        }
        Err(e) => {
            if let ShowcaseError::RateLimited { .. } = e {
                error!("aborting: the forge rate limit was hit; supply `username` and `token` in the config or retry later");
            }
            error!("{e}");
            exit_code_for(&e)
        }
    });

    if code != exit_code::SUCCESS {
        std::process::exit(code);
    }
}
