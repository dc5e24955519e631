use std::process;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use wcag_reporter::cli::{Cli, CliHandler};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let cli = match Cli::parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Argument parsing failed: {}", e);
            process::exit(e.exit_code());
        }
    };

    // Logs go to stderr so stdout carries only the report
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling");
            on_interrupt.cancel();
        }
    });

    let handler = CliHandler::with_cancellation(cli, cancel);

    let exit_code = match handler.run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Execution failed: {}", e);
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
