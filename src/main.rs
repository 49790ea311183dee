//! logicsim - Digital Logic Circuit Simulator
//!
//! Loads a JSON netlist, settles it, and answers stimuli with the
//! settled external outputs.
//!
//! # Usage
//!
//! ```bash
//! # One-shot: apply stimuli from the command line
//! logicsim circuit.json --set 0=1 --set 1=0
//!
//! # Stream: one stimulus line in, one output line out
//! printf '0=0 1=1\n0=1 1=1\n' | logicsim circuit.json
//! ```

use std::path::PathBuf;

use clap::Parser;
use logicsim_core::{
    bench::{process_stream, Bench},
    error::Result,
    netlist, SimulatorConfig, DEFAULT_MAX_ROUNDS,
};

/// Digital logic circuit simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the circuit netlist (JSON)
    #[arg(value_name = "CIRCUIT_FILE")]
    circuit_file: PathBuf,

    /// Apply a stimulus (ID=VALUE) before printing the settled
    /// outputs; repeatable. Without this flag, stimulus lines are read
    /// from stdin instead.
    #[arg(short, long, value_name = "ID=VALUE")]
    set: Vec<String>,

    /// Maximum propagation rounds per stimulus
    #[arg(long, default_value_t = DEFAULT_MAX_ROUNDS)]
    max_rounds: usize,

    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    // Load the netlist
    let netlist = netlist::read_file(&args.circuit_file)?;

    // Import it and settle the initial state
    let config = SimulatorConfig::new().with_max_rounds(args.max_rounds);
    let mut bench = Bench::new(&netlist, config)?;

    if args.set.is_empty() {
        // Stream mode: stdin lines in, output lines out
        process_stream(&mut bench)?;
    } else {
        // One-shot mode: apply the --set stimuli, print once
        let line = args.set.join(" ");
        println!("{}", bench.apply_line(&line, 1)?);
    }

    Ok(())
}
