mod ui;

use clap::Parser;
use crate::ui::cli;
use netscan_core::utils::logging::init_logging;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    init_logging(args.verbose);
    if let Err(e) = cli::run_cli(args).await {
        eprintln!("CLI error: {e}");
        std::process::exit(1);
    }
}
