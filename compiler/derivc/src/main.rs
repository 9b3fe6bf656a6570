//! deriv command-line driver.
//!
//! Exit codes: 0 when every call was derived, 1 when the run failed, 2 on
//! invalid arguments.

mod cli;
mod frontend;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use deriv_engine::{DeriveError, Driver, RunReport};
use deriv_ir::FrontendError;
use thiserror::Error;

use crate::cli::Cli;
use crate::frontend::FileFrontend;

#[derive(Error, Debug)]
enum Error {
    #[error(transparent)]
    Frontend(#[from] FrontendError),
    #[error(transparent)]
    Derive(#[from] DeriveError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[tracing::instrument(level = "debug", skip_all, fields(program = %cli.program.display()))]
fn run(cli: &Cli) -> Result<RunReport, Error> {
    let config = cli.config();
    let mut frontend = FileFrontend::open(&cli.program, &cli.out_dir(), &config.file_name)?;
    let report = Driver::new(config).run(&mut frontend)?;
    Ok(report)
}

fn print_report(report: &RunReport) {
    for package in &report.packages {
        let status = if package.artifact_changed {
            "written"
        } else {
            "unchanged"
        };
        println!(
            "{}: {} declarations ({} new), {} rewrites, {status}",
            package.path,
            package.declarations.len(),
            package.new_declarations.len(),
            package.rewrites,
        );
    }
    println!("{} pass(es)", report.passes);
}
