//! # Procura Entry Point
//!
//! ```text
//! procura kit --recipes kits.json --snapshot stock.json --sku KIT-01 --target 10
//! procura quote --input quotation.json --container 40HC
//! procura ship --volume 50 --weight 10000
//! procura containers
//! ```
//!
//! Results are printed to stdout as JSON. Errors are printed to stderr as
//! `{"code": ..., "message": ...}` with exit status 1.

use std::process::ExitCode;

use clap::Parser;
use procura_cli::{init_tracing, run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli) {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            match serde_json::to_string(&err) {
                Ok(text) => eprintln!("{}", text),
                Err(_) => eprintln!("{}", err),
            }
            ExitCode::FAILURE
        }
    }
}
