use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use color_eyre::Result;
use env_logger::Target;
use pybundle::{
    cli::input::CliArgs, events::StdoutSink, utils::logger::config_logger, worker::run_pybundle,
};

/// The entry point for the binary generated
/// for the program
fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli_args = CliArgs::parse();
    config_logger(cli_args.verbose, Target::Stdout).expect("Error configuring the logger");
    log::info!("Launching a new pybundle run");

    let result = run_pybundle(&cli_args, Path::new("."), &StdoutSink)?;

    if result.success() {
        log::info!("Tasks succesfully finished");
        Ok(ExitCode::SUCCESS)
    } else {
        log::error!("The bundler reported a build failure");
        Ok(ExitCode::FAILURE)
    }
}
