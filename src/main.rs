use clap::Parser;
use songplay_etl::cli::{self, Args};
use songplay_etl::EtlError;
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();
    cli::setup_logging(args.verbose);

    // Create async runtime and run the ETL with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = cli::run(args) => result,
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    return Err(anyhow::Error::new(e).context("Failed to listen for CTRL+C"));
                }
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(EtlError::Interrupted {
                    reason: "Run interrupted by user".to_string(),
                }
                .into())
            }
        }
    });

    match result {
        Ok(_summary) => {
            // Summary has already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
