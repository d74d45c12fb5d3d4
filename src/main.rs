use anyhow::Result;
use tracing::info;

mod api;
mod args;
mod auth;
mod cfg;
mod drive;
mod error;
mod job;
mod sheets;
mod transform;

use api::GoogleApi;
use args::Args;
use cfg::Cfg;
use job::Action;

#[tokio::main]
async fn main() -> Result<()> {
    // a missing .env is fine, the variables may come from the shell
    dotenvy::dotenv().ok();

    let args = Args::parse_with_legacy_flags();

    init_logging(&args.log_level)?;

    info!("Starting travel_budget");

    let cfg = Cfg::load(&args.config)?;
    let action = Action::from_args(&args);

    let (sheets, drive) = auth::create_hubs(&cfg.service_account).await?;
    let api = GoogleApi::new(sheets, drive);

    let outcome = job::run_job(&api, &cfg, action).await?;
    println!("{}", outcome);

    info!("travel_budget completed successfully");
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = match level {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    // stdout carries the command output
    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
