//! zipbrute - brute-force the password of a classic-encrypted ZIP archive.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;
use zipbrute::search::{
    progress_bar, Config, ConfigError, FullCheck, Search, SearchError, DEFAULT_DB_PATH,
    DEFAULT_LENGTH, DEFAULT_WORKERS,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Exact password length to try
    #[arg(short, long, default_value_t = DEFAULT_LENGTH as i64, allow_negative_numbers = true)]
    length: i64,

    /// Encrypted ZIP archive
    #[arg(short, long, value_name = "ZIP")]
    input: String,

    /// Number of worker threads
    #[arg(short, long = "worker", default_value_t = DEFAULT_WORKERS)]
    worker: usize,

    /// Directory of the cache of failed candidates
    #[arg(short, long, default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Accept a single-member archive after the first-member probe alone
    #[arg(long)]
    trust_single_probe: bool,

    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn build_config(args: &Args) -> Result<Config, ConfigError> {
    let length = usize::try_from(args.length).map_err(|_| ConfigError::InvalidLength(args.length))?;
    let full_check = if args.trust_single_probe {
        FullCheck::MultiMemberOnly
    } else {
        FullCheck::Always
    };
    Ok(Config::new(&args.input)
        .with_length(length)
        .with_workers(args.worker)
        .with_db_path(args.db.clone())
        .with_full_check(full_check))
}

fn exit_code(err: &SearchError) -> ExitCode {
    if err.is_config() {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    let search = match Search::open(config) {
        Ok(search) => search,
        Err(e) => {
            eprintln!("error: {e}");
            return exit_code(&e);
        }
    };
    println!("Have {} elements", search.cached());

    let bar = progress_bar(search.total());
    match search.run(&bar) {
        Ok(report) => {
            if let Some(password) = report.password {
                println!("Password: {password}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            exit_code(&e)
        }
    }
}
