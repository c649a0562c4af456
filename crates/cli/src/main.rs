use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dofus_cli::Options;

#[derive(Parser)]
#[command(name = "dofus-data")]
#[command(about = "Converts Dofus D2O/D2I game data files to JSON", long_about = None)]
struct Cli {
    /// Game data folder holding `common/` and `i18n/`
    data_dir: PathBuf,

    /// Output folder, replaced on every run
    output_dir: PathBuf,

    /// Log every class, object and field as it is decoded
    #[arg(long)]
    debug: bool,

    /// Skip generating Rust types
    #[arg(long)]
    no_codegen: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --debug
    let default_level = if cli.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Dofus data file parser started");

    let summary = dofus_cli::run(&Options {
        data_dir: cli.data_dir,
        output_dir: cli.output_dir,
        codegen: !cli.no_codegen,
    })?;

    info!(
        d2o = summary.d2o_parsed,
        d2i = summary.d2i_parsed,
        failed = summary.d2o_failed + summary.d2i_failed,
        "done"
    );
    Ok(())
}
