//! phispace CLI: item-to-item recommendations from a `user:item` file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use phispace::builder::PhiSpaceBuilder;
use phispace::errors::PhiError;
use phispace::format::{render_space, OutputStyle};
use phispace::io::read_lines;
use phispace::params::{MalformedPolicy, PipelineParams, RoundingMode};

#[derive(Parser, Debug)]
#[command(name = "phispace")]
#[command(about = "Customers-who-bought-this-also-bought recommendations via phi correlation")]
#[command(version)]
struct Cli {
    /// Input file, one `<user><delimiter><item>` record per line
    input: PathBuf,

    /// Path to a JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Field delimiter
    #[arg(short, long)]
    delimiter: Option<String>,

    /// Neighbors kept per item
    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    /// Abort on the first malformed line instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Rounding of phi: half-even or half-away-from-zero
    #[arg(long)]
    rounding: Option<RoundingMode>,

    /// Output style: list, sentence, scores or json
    #[arg(short, long, default_value = "list")]
    style: OutputStyle,

    /// Also print items without any recommendation
    #[arg(long)]
    all: bool,
}

fn run(cli: Cli) -> Result<(), PhiError> {
    let mut params = match &cli.config {
        Some(path) => PipelineParams::from_json_file(path)?,
        None => PipelineParams::default(),
    };
    if let Some(delimiter) = cli.delimiter {
        params.delimiter = delimiter;
    }
    if let Some(k) = cli.top_k {
        params.top_k = k;
    }
    if let Some(rounding) = cli.rounding {
        params.rounding = rounding;
    }
    if cli.strict {
        params.malformed = MalformedPolicy::Strict;
    }

    let lines = read_lines(&cli.input)?;
    let (space, _matrix) = PhiSpaceBuilder::new()
        .with_params(params)
        .build(lines)?;

    let stats = space.index_stats();
    info!(
        "{} records ({} distinct), {} users, {} items, {} malformed lines skipped",
        stats.records, stats.distinct_records, stats.n_users, stats.n_items, stats.malformed
    );
    info!(
        "{} pairs scored, {} excluded as undefined",
        space.pair_stats().defined,
        space.pair_stats().undefined
    );

    for line in render_space(&space, cli.style, cli.all)? {
        println!("{}", line);
    }
    Ok(())
}

fn main() -> ExitCode {
    phispace::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
