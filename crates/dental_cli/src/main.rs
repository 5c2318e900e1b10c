//! Command-line entry point for the clinic records core.

mod commands;
mod config;

use clap::Parser;
use config::CliConfig;
use dental_core::db::open_db;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = CliConfig::parse();

    if let Err(err) = config.init_logging() {
        eprintln!("logging disabled: {err}");
    }

    let conn = match open_db(config.resolved_db_path()) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open database: {err}");
            return ExitCode::FAILURE;
        }
    };

    match commands::run(&config.command, &conn) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("event=cli_command module=cli status=error error={err}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
