// crates/dcf-rs-cli/src/main.rs

use clap::Parser;

mod cli;
mod commands;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_logger(cli.verbose);
    commands::run_command(cli)
}

/// Diagnostics are logged at `warn`, so that is the default floor. `RUST_LOG` overrides it.
fn init_logger(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}
