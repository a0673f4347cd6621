// crates/dcf-rs-cli/src/cli.rs

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dcf",
    about = "Export and diff CANopen DCF (Device Configuration File) files",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log parser progress in addition to diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format of the written file
    #[arg(long, global = true, value_enum, default_value = "csv")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub keys: VendorKeys,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

/// Vendor-extension keys for units and scaling.
#[derive(Args, Debug)]
pub struct VendorKeys {
    /// Key holding an object's units
    #[arg(long, global = true, default_value = ";SEVCONFIELD UNITS")]
    pub units_key: String,

    /// Key holding an object's scaling factor
    #[arg(long, global = true, default_value = ";SEVCONFIELD SCALING")]
    pub scale_key: String,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write every object of one DCF file as a table
    Export(ExportArgs),
    /// Write the objects that differ between two DCF files
    Diff(DiffArgs),
}

#[derive(Args)]
pub struct ExportArgs {
    /// Input .dcf file
    pub input: PathBuf,
    /// Output file
    pub output: PathBuf,
}

#[derive(Args)]
pub struct DiffArgs {
    /// Left-hand .dcf file
    pub left: PathBuf,
    /// Right-hand .dcf file
    pub right: PathBuf,
    /// Output file
    pub output: PathBuf,
}
