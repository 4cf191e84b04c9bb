//! # RRSim
//!
//! Main entry point for the Round-Robin scheduling simulator.

use env_logger::Builder;
use rrsim::{parse_args, usage, HostRuntime, Invocation};
use std::env;
use std::io::{self, Write};
use std::process;

fn main() {
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("rrsim");

    let config = match parse_args(&args) {
        Ok(Invocation::Run(config)) => config,
        Ok(Invocation::Help) => {
            println!("{}", usage(program));
            return;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("{}", usage(program));
            process::exit(e.exit_code());
        }
    };

    let runtime = HostRuntime::new(config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    });

    let output = runtime.run().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    });

    if let Err(e) = output.write_to(io::stdout().lock()) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }

    if runtime.config().print_digest {
        eprintln!("digest: {}", output.digest);
    }
}
