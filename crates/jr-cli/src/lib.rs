use std::ffi::OsString;

use clap::Parser;
use jr_core::JuniorError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli_args;
mod commands;
mod error_map;
mod models;
mod program_loader;
mod program_store;

pub(crate) use cli_args::{CheckArgs, CheckNameArgs, Cli, FlattenArgs, Mode, NewArgs, RunArgs};
pub(crate) use error_map::{
    emit_error, json_string, map_cli_program_encode, map_cli_program_invalid,
    map_cli_program_read, map_cli_program_write, map_cli_programs_scan,
};
pub(crate) use models::{LoadedProgram, ProgramFileV1, PROGRAM_FILE_SCHEMA, PROGRAM_FILE_SUFFIX};
pub(crate) use program_loader::{load_programs_from_dir, resolve_programs_dir};
pub(crate) use program_store::{load_program_file, save_program_file};

/// Log to stderr so stdout stays machine readable. `RUST_LOG` overrides the
/// default filter.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jr_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, JuniorError> {
    match cli.command {
        Mode::Flatten(args) => commands::run_flatten(args),
        Mode::Run(args) => commands::run_run(args),
        Mode::CheckName(args) => commands::run_check_name(args),
        Mode::New(args) => commands::run_new(args),
        Mode::Check(args) => commands::run_check(args),
    }
}

#[cfg(test)]
mod tests;
