//! `scripty` — compile and run scripty function sources from the command
//! line.

mod cli;
mod config;
mod logging;

use std::fs;
use std::process;

use clap::Parser;
use scripty_compiler::{compile_function, eval, gen_optree};
use scripty_core::format::format_value;
use scripty_core::literal::{read_value_string, ParsedLiteral};
use scripty_core::stack::NamedStack;
use scripty_core::{Context, ScriptError};
use scripty_vm::{call_function, disassemble};
use tracing::info;

use cli::{Cli, Commands};
use config::RunConfig;

fn main() {
    let args = Cli::parse();

    let run_config = match RunConfig::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }
    };
    logging::init(args.verbose, run_config.trace);

    let result = match args.command {
        Commands::Run { input, args: arg_values } => run_file(&input, &arg_values, &run_config),
        Commands::Eval { expr } => run_eval(&expr),
        Commands::Check { input } => run_check(&input, &run_config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn read_source(path: &std::path::Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("reading {}: {e}", path.display()))
}

fn run_file(input: &std::path::Path, raw_args: &[String], config: &RunConfig) -> Result<(), String> {
    let source = read_source(input)?;
    let mut ctx = Context::with_capacities(config.stack_capacity, config.table_capacity);
    let func = compile_function(&mut ctx, &source).map_err(|e| format!("compiling {}: {e}", input.display()))?;

    if raw_args.len() != func.n_args() {
        return Err(format!("function expects {} argument(s), got {}", func.n_args(), raw_args.len()));
    }

    let mut values = Vec::with_capacity(raw_args.len());
    for (raw, tag) in raw_args.iter().zip(func.arg_types.iter()) {
        match read_value_string(raw, Some(*tag)).map_err(|e: ScriptError| e.to_string())? {
            ParsedLiteral::Value(v) => values.push(v),
            ParsedLiteral::UnresolvedName(name) => {
                return Err(format!("argument '{raw}' looks like an unresolved name '{name}', not a literal"));
            }
        }
    }

    info!(path = %input.display(), n_args = values.len(), "running function");
    let results = call_function(&mut ctx, &func, values).map_err(|e| e.to_string())?;
    for v in &results {
        println!("{}", format_value(v));
    }
    Ok(())
}

fn run_eval(expr: &str) -> Result<(), String> {
    let tree = gen_optree(expr, None).map_err(|e| e.to_string())?;
    let result = eval(&tree, &NamedStack::new()).map_err(|e| e.to_string())?;
    println!("{}", format_value(&result));
    Ok(())
}

fn run_check(input: &std::path::Path, config: &RunConfig) -> Result<(), String> {
    let source = read_source(input)?;
    let mut ctx = Context::with_capacities(config.stack_capacity, config.table_capacity);
    let func = compile_function(&mut ctx, &source).map_err(|e| format!("compiling {}: {e}", input.display()))?;
    println!("{} argument(s), {} return value(s)", func.n_args(), func.n_rets());
    print!("{}", disassemble(&func.code));
    Ok(())
}
