use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let level = if verbose { "sprintcap=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = sprintcap::cli::Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = sprintcap::cli::run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
