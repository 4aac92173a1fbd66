use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use dotrender_cli::{Args, error_adapter};

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    let args = Args::parse();

    // Initialize the logger with the specified log level
    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting Dotrender");
    debug!(args:?; "Parsed arguments");

    if let Some(kind) = args.list {
        match dotrender_cli::list_values(&args, kind) {
            Ok(values) => {
                for value in values {
                    println!("{value}");
                }
            }
            Err(err) => fail(&err),
        }
        return;
    }

    match dotrender_cli::run(&args) {
        Ok(rendered) => {
            println!("{rendered}");
            info!("Completed successfully");
        }
        Err(err) => fail(&err),
    }
}

fn fail(err: &dotrender::RenderError) -> ! {
    let report = error_adapter::render_report(err);
    error!("Failed\n{report}");
    process::exit(1);
}
