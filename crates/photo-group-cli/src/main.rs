//! Photo Group CLI - Resumable photo grouping tool.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::scan::ScanArgs;
use commands::state::ShowArgs;
use commands::{Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load();

    let result = match cli.command {
        Some(Commands::Scan(args)) => commands::scan::run(&ScanArgs::with_config(args, &config)),
        Some(Commands::Status(args)) => commands::state::status(&args, &config),
        Some(Commands::Show(args)) => commands::state::show(&ShowArgs::with_config(args, &config)),
        Some(Commands::Clear(args)) => commands::state::clear(&args, &config),
        None => {
            // Default behavior: run scan with flattened args
            if cli.scan.paths.is_empty() {
                eprintln!("error: No paths specified. Use --help for usage information.");
                return ExitCode::Error.into();
            }
            commands::scan::run(&ScanArgs::with_config(cli.scan, &config))
        }
    };

    match result {
        Ok(code) => code.into(),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error.into()
        }
    }
}
