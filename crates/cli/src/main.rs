use clap::Parser;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nccompress_cli::{run, Cli, EXIT_FAILURE};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Records from every worker go through this one subscriber to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(cli.log_json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!cli.log_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            EXIT_FAILURE
        }
    };
    std::process::exit(code);
}
