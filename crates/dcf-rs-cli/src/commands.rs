// crates/dcf-rs-cli/src/commands.rs

use crate::cli::*;
use anyhow::Context;
use dcf_rs::{DcfFile, DiffRow, InterpreterOptions};
use log::{info, warn};
use serde::Serialize;
use std::fs;
use std::path::Path;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let options = InterpreterOptions {
        units_key: cli.keys.units_key,
        scale_key: cli.keys.scale_key,
    };
    match cli.command {
        Command::Export(args) => cmd_export(args, &options, cli.format),
        Command::Diff(args) => cmd_diff(args, &options, cli.format),
    }
}

fn cmd_export(
    args: ExportArgs,
    options: &InterpreterOptions,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let dcf = load(&args.input, options)?;
    let rendered = render_export(&dcf, format)?;
    write_output(&args.output, &rendered)?;
    info!(
        "exported {} objects from {} to {}",
        dcf.object_count(),
        args.input.display(),
        args.output.display()
    );
    Ok(())
}

fn cmd_diff(
    args: DiffArgs,
    options: &InterpreterOptions,
    format: OutputFormat,
) -> anyhow::Result<()> {
    // Both inputs must load before anything is written.
    let left = load(&args.left, options)?;
    let right = load(&args.right, options)?;

    let rows = dcf_rs::diff_dcf(&left, &right);
    let rendered = render_diff(&rows, format)?;
    write_output(&args.output, &rendered)?;
    info!(
        "{} differing rows between {} and {}",
        rows.len(),
        args.left.display(),
        args.right.display()
    );
    Ok(())
}

/// Loads one file and reports its diagnostics on the log stream.
fn load(path: &Path, options: &InterpreterOptions) -> anyhow::Result<DcfFile> {
    let (dcf, diagnostics) = dcf_rs::load_dcf_from_path(path, options)
        .with_context(|| format!("failed to read {}", path.display()))?;
    for diagnostic in &diagnostics {
        warn!("{}: {}", path.display(), diagnostic);
    }
    Ok(dcf)
}

#[derive(Serialize)]
struct DiffDocument<'a> {
    rows: &'a [DiffRow],
}

fn render_export(dcf: &DcfFile, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Csv => dcf_rs::export_csv_to_string(dcf)?,
        OutputFormat::Json => serde_json::to_string_pretty(dcf)?,
    })
}

fn render_diff(rows: &[DiffRow], format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Csv => dcf_rs::diff_csv_to_string(rows)?,
        OutputFormat::Json => serde_json::to_string_pretty(&DiffDocument { rows })?,
    })
}

fn write_output(path: &Path, content: &str) -> anyhow::Result<()> {
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}
