mod args;
mod tabulation;

use clap::Parser;
use log::LevelFilter;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    if let Err(e) = tabulation::run_election_cli(&args) {
        eprintln!("An error occured: {}", e);
        std::process::exit(1);
    }
}
