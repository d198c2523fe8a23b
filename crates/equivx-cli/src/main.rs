//! EquivX CLI
//!
//! Command-line interface for comparing JSON documents structurally

use clap::{Parser, Subcommand};
use equivx_core::logging_facility::{init, Profile};

mod commands;

use commands::compare::Verdict;

#[derive(Debug, Parser)]
#[command(name = "equivx")]
#[command(about = "EquivX - Deep structural equivalence", long_about = None)]
struct Cli {
    /// Log comparison progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare two JSON documents
    Compare(commands::compare::CompareArgs),
}

fn main() {
    let cli = Cli::parse();
    if cli.verbose {
        init(Profile::Development);
    }

    let result = match cli.command {
        Commands::Compare(args) => commands::compare::execute(args),
    };

    match result {
        Ok(Verdict::Equivalent) => {}
        Ok(Verdict::NotEquivalent) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}
