//! CLI tool to validate and inspect dotenv files.

use std::process::ExitCode;

use dotenv_rs::{EnvMap, EnvValue, Loader};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn usage() -> ExitCode {
    eprintln!("Usage: dotenv <command> [--optional] [files...]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  validate  Check if dotenv file(s) parse");
    eprintln!("  dump      Print each variable with its type");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --optional  Skip missing files instead of failing");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  dotenv validate .env");
    eprintln!("  dotenv dump --optional .env .env.local");
    ExitCode::from(2)
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        return usage();
    }

    let command = args[1].as_str();
    if command != "validate" && command != "dump" {
        eprintln!("Unknown command: {command}");
        return ExitCode::from(2);
    }

    let optional = args[2..].iter().any(|a| a == "--optional");
    let files: Vec<&String> = args[2..].iter().filter(|a| *a != "--optional").collect();

    if files.is_empty() {
        eprintln!("Error: no files specified");
        return ExitCode::from(2);
    }

    let loader = Loader::new();
    let mut had_error = false;

    for path in files {
        let loaded = if optional {
            loader.include(path)
        } else {
            loader.require(path).map(Some)
        };

        match loaded {
            Ok(None) => eprintln!("{path}: not found, skipped"),
            Ok(Some(env)) => {
                if command == "validate" {
                    eprintln!("{path}: valid ({} variable(s))", env.len());
                } else {
                    dump(&env);
                }
            }
            Err(e) => {
                eprintln!("{e}");
                had_error = true;
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn dump(env: &EnvMap) {
    for (name, value) in env {
        let shown = match value {
            EnvValue::Null => "null".to_string(),
            EnvValue::Bool(b) => b.to_string(),
            EnvValue::String(s) => format!("{s:?}"),
            other => other.to_string(),
        };
        println!("{name} = {shown} ({})", value.type_name());
    }
}
