use std::path::PathBuf;

use clap::{Parser, Subcommand};

use sawmill::{ingest, prime, render, Mode};

/// Log parsing and prime calculation, spread over a worker pool.
#[derive(Parser)]
#[command(name = "sawmill", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse access logs and report aggregate statistics
    Ingest {
        /// Log file, or directory of .log files
        #[arg(long)]
        path: PathBuf,
        /// Number of workers
        #[arg(long, default_value_t = 2)]
        worker: usize,
        /// Execution mode
        #[arg(long, value_enum, default_value_t = Mode::Threading)]
        mode: Mode,
        /// Emit the snapshot as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },
    /// Find primes up to a limit by chunked trial division
    Prime {
        /// Upper bound of the search, inclusive
        #[arg(long, default_value_t = 100_000)]
        max: u64,
        /// Number of workers
        #[arg(long, default_value_t = 2)]
        worker: usize,
        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {
        Command::Ingest {
            path,
            worker,
            mode,
            json,
        } => {
            let snapshot = ingest(&path, worker, mode)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print!("{}", render(&snapshot));
            }
        }
        Command::Prime { max, worker, json } => {
            let primes = prime::find_primes(max, worker);
            match prime::summarize(&primes) {
                Some(summary) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&summary)?);
                    } else {
                        let first: Vec<_> = primes.iter().take(10).collect();
                        let last: Vec<_> = primes.iter().rev().take(10).rev().collect();
                        println!("First 10 primes: {first:?}");
                        println!("Last 10 primes: {last:?}");
                        println!("Smallest prime: {}", summary.smallest);
                        println!("Largest prime: {}", summary.largest);
                        println!("Average of first 100: {:.2}", summary.avg_first_100);
                    }
                }
                None => println!("No primes up to {max}"),
            }
        }
    }
    Ok(())
}
