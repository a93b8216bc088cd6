use clap::Parser;
use ctprotein2gene::cli::{self, Cli};
use log::error;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = cli::run(cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}
