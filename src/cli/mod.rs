//! Command-line interface layer.
//!
//! Each command returns a [`commands::CommandResult`]; printing and the exit
//! status are derived from it here, so the commands themselves never write
//! to the terminal (except `init`).

use std::process::ExitCode;

use anyhow::Result;

mod args;
mod commands;
mod exit_status;
mod report;

pub use args::{Arguments, Command};
pub use exit_status::ExitStatus;

use commands::{
    CommandResult, check::check, init::init, resolve::resolve, update::update,
};

pub fn run_cli(args: Arguments) -> Result<ExitCode> {
    let verbose = args.verbose();

    let Some(Arguments {
        command: Some(command),
    }) = args.with_command_or_help()
    else {
        return Ok(ExitStatus::Success.into());
    };

    let result = match command {
        Command::Update(cmd) => update(cmd)?,
        Command::Check(cmd) => check(cmd)?,
        Command::Resolve(cmd) => resolve(cmd)?,
        Command::Init => return Ok(init()?.into()),
    };
    report::print(&result, verbose);

    Ok(exit_status_from_result(&result).into())
}

fn exit_status_from_result(result: &CommandResult) -> ExitStatus {
    if result.error_count > 0 {
        ExitStatus::Failure
    } else {
        ExitStatus::Success
    }
}
