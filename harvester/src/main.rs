#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

use bill_harvest::{app, cli::Args, config::Config, logging};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    args.validate()?;

    // Load and validate configuration first (fail-fast)
    let config = Config::load_from(&args.config).map_err(|e| anyhow::anyhow!("{e}"))?;
    config
        .validate_for(args.source)
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    logging::init(&config.logging, args.verbose)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        source = %args.source,
        bill_type = %args.bill_type,
        congress = args.session,
        "bill-harvest starting up"
    );

    let summary = app::run(&args, &config).await?;

    tracing::info!(
        identifiers = summary.identifiers,
        parsed = summary.parsed,
        failed = summary.failed,
        legislators = summary.legislators,
        files = summary.files.len(),
        "harvest finished"
    );

    Ok(())
}
