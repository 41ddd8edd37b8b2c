//! `provision` binary entry point.
use std::process::ExitCode;

use clap::Parser;
use provision_cli::{cli, commands, logging};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose, args.dry_run, "provision");
    let log = logging::Logger::new("provision");

    match commands::provision::run(&args, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
