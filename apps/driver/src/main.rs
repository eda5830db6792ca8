//! # MDS Driver
//!
//! Runs a command file against an in-memory item store.
//!
//! ## Usage
//! ```bash
//! # Read commands from a file, print the checksum
//! mds-driver commands.txt
//!
//! # Read from stdin, print a JSON report
//! mds-driver --json < commands.txt
//!
//! # Use a specific config file
//! mds-driver --config ./driver.toml commands.txt
//! ```

use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mds_driver::{DriverConfig, ReportFormat, Runner};

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut input_path: Option<PathBuf> = None;
    let mut force_json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 >= args.len() {
                    bail!("--config needs a path");
                }
                config_path = Some(PathBuf::from(&args[i + 1]));
                i += 1;
            }
            "--json" | "-j" => force_json = true,
            "--help" | "-h" => {
                println!("MDS Command Driver");
                println!();
                println!("Usage: mds-driver [OPTIONS] [INPUT]");
                println!();
                println!("Reads commands from INPUT, or stdin when omitted.");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  Config file (default: platform config dir)");
                println!("  -j, --json           Print a JSON report instead of the checksum");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            other if other.starts_with('-') && other != "-" => {
                bail!("unknown option '{}'", other);
            }
            path => {
                if input_path.is_some() {
                    bail!("only one input file may be given");
                }
                if path != "-" {
                    input_path = Some(PathBuf::from(path));
                }
            }
        }
        i += 1;
    }

    let mut config = DriverConfig::load(config_path).context("loading driver config")?;
    if force_json {
        config.run.report = ReportFormat::Json;
    }

    init_tracing(&config.log.filter);

    let mut runner = Runner::new(config.run.clone());
    let report = match &input_path {
        Some(path) => {
            info!(?path, "Reading commands from file");
            let file = File::open(path)
                .with_context(|| format!("opening input {}", path.display()))?;
            runner.run(BufReader::new(file))?
        }
        None => {
            info!("Reading commands from stdin");
            runner.run(io::stdin().lock())?
        }
    };

    println!("{}", report.render(config.run.report)?);
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins over the configured filter. Logs go to stderr so the
/// report on stdout stays clean.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
