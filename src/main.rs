use clap::Parser;
use flowline::cli::{execute_command, get_log_level, report_failure, Cli};
use tracing::{debug, error, trace};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(get_log_level(cli.verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2) // Show target module for -vv and above
        .with_line_number(cli.verbose >= 3) // Show line numbers for -vvv
        .init();

    debug!("flow started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = execute_command(cli).await {
        error!("Fatal error: {:#}", e);
        let (message, status) = report_failure(&e);
        eprint!("{message}");
        std::process::exit(status);
    }
}
