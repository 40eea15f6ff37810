mod args;
mod rcv;

use clap::Parser;
use log::{debug, error, LevelFilter};

fn main() {
    let args = args::Args::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if args.verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
    debug!("args: {:?}", args);

    match rcv::run_election(&args) {
        Ok(result) => {
            println!("\nWinner: {}", result.winner);
        }
        Err(e) => {
            error!("{:?}", e);
            eprintln!("\nError: {}", e);
            std::process::exit(1);
        }
    }
}
