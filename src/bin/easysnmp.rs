//! easysnmp: run one SNMP operation and print structured results.

use clap::Parser;
use easy_snmp::{Error, ParseStage};
use easy_snmp::cli::args::Args;
use easy_snmp::cli::output::{OutputContext, write_error};
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let args = Args::parse();
    args.init_tracing();

    let start = Instant::now();
    let result = args.operation.run(&args.tokens);
    let elapsed = start.elapsed();

    match result {
        Ok(results) => {
            let output = OutputContext {
                format: args.format,
                show_timing: args.timing,
            };
            if let Err(e) = output.write_results(&results, elapsed) {
                eprintln!("Error writing output: {}", e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(Error::Parse {
            stage: ParseStage::Help,
            message,
        }) => {
            print!("{}", message);
            ExitCode::SUCCESS
        }
        Err(e) => {
            write_error(&e);
            ExitCode::FAILURE
        }
    }
}
