//! Command-line surface: `run`, `eval`, `check`, plus the global
//! `-v`/`--config` flags.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "scripty")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compiler and VM driver for the scripty scripting language", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a scripty.toml config file (overrides standard-location search)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile and execute a function source file
    Run {
        /// Path to a file containing one `(args) => (rets) { ... }` function
        input: PathBuf,

        /// An argument value, in declaration order (repeatable)
        #[arg(long = "arg", value_name = "VALUE")]
        args: Vec<String>,
    },

    /// Parse and evaluate a single bare expression
    Eval {
        /// The expression text, e.g. "1 + 2 * 3"
        expr: String,
    },

    /// Compile a function source file and print its instruction listing, without executing it
    Check {
        /// Path to a file containing one `(args) => (rets) { ... }` function
        input: PathBuf,
    },
}
