//! # DVFS Scheduler Host
//!
//! Main entry point for the scheduler simulation.

use dvfsd::{parse_args, Command, HostRuntime};
use services_logger::HostLogger;
use std::env;
use std::io;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("dvfsd");

    let config = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            print_usage(program);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage(program);
            process::exit(1);
        }
    };

    if let Err(e) = HostLogger::new(config.log_level).install() {
        eprintln!("Failed to install logger: {}", e);
        process::exit(1);
    }

    let runtime = HostRuntime::new(config).unwrap_or_else(|e| {
        eprintln!("Failed to create runtime: {}", e);
        process::exit(1);
    });

    let stdout = io::stdout();
    if let Err(e) = runtime.run(&mut stdout.lock()) {
        eprintln!("Runtime error: {}", e);
        process::exit(1);
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -t, --tasks <FILE>       JSON task file (default: built-in demonstration set)");
    eprintln!("  -q, --quantum <MS>       Time quantum in milliseconds (default: 50)");
    eprintln!("  -p, --pacing <PACING>    real (default) or simulated");
    eprintln!("  -f, --format <FORMAT>    text (default) or json");
    eprintln!("  -l, --log-level <LEVEL>  error, warn (default), info or debug");
    eprintln!("  -h, --help               Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} --quantum 50", program);
    eprintln!(
        "  {} --tasks tasks.json --pacing simulated --format json",
        program
    );
}
