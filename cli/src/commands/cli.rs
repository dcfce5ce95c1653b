use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "folio", version, about = "Inspect and export multi-document folio projects")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Read configuration from this file instead of ~/.folio/config.toml or ./config.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a project and print which document owns which entity.
    Inspect(InspectArgs),
    /// Load a project and write its association metadata as JSON.
    Export(ExportArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct InspectArgs {
    /// Project file (JSON).
    pub project: PathBuf,

    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ExportArgs {
    /// Project file (JSON).
    pub project: PathBuf,

    /// Write here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}
