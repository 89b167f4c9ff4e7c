mod audit;
mod cli;
mod dedup;
mod error;
mod fmt;
mod ignore;
mod loader;
mod models;
mod normalizer;
mod pipeline;
mod reports;
mod settings;
mod writer;

use clap::Parser;
use env_logger::Env;

use cli::{Cli, Commands};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Run {
            data_dir,
            summary,
            starting_balance,
        } => cli::run::run(data_dir.as_deref(), summary, starting_balance),
        Commands::Summary {
            data_dir,
            starting_balance,
            month,
        } => cli::summary::run(data_dir.as_deref(), starting_balance, month),
        Commands::Read { data_dir } => cli::read::run(data_dir.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
