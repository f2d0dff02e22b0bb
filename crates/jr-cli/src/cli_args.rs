use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "jr-cli")]
#[command(about = "Flatten, run and check structured actor programs")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    /// Print the flattened text and its source map.
    Flatten(FlattenArgs),
    /// Run the flattened program and attribute any error to its handler.
    Run(RunArgs),
    /// Judge a candidate actor name.
    CheckName(CheckNameArgs),
    /// Write a new program holding only a stage.
    New(NewArgs),
    /// Load and verify every program file under a directory.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub(crate) struct FlattenArgs {
    #[arg(long = "program")]
    pub(crate) program: String,
}

#[derive(Debug, Args)]
pub(crate) struct RunArgs {
    #[arg(long = "program")]
    pub(crate) program: String,
    #[arg(long = "max-operations")]
    pub(crate) max_operations: Option<u64>,
}

#[derive(Debug, Args)]
pub(crate) struct CheckNameArgs {
    #[arg(long = "name")]
    pub(crate) name: String,
    #[arg(long = "existing")]
    pub(crate) existing: Vec<String>,
}

#[derive(Debug, Args)]
pub(crate) struct NewArgs {
    #[arg(long = "name")]
    pub(crate) name: Option<String>,
    #[arg(long = "out")]
    pub(crate) out: String,
}

#[derive(Debug, Args)]
pub(crate) struct CheckArgs {
    #[arg(long = "programs-dir")]
    pub(crate) programs_dir: String,
}
