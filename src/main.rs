use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use warpscan_dtw::{DEFAULT_EPOCH, SearchConfig, SubsequenceSearch, Vector};
use warpscan_io::{ExperimentName, ResultWriter, RowReader, SearchArtifact, SeriesKind, stretch};

#[derive(Parser)]
#[command(name = "warpscan")]
#[command(about = "Exact DTW nearest-neighbour subsequence search")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,
}

/// Search tuning parameters.
#[derive(Args, Debug, Clone)]
struct TuningArgs {
    /// Values per point in both the data and the query file
    #[arg(long, default_value_t = 1)]
    dimensions: usize,

    /// Sakoe-Chiba warping window as a fraction of the query length, in (0, 1]
    #[arg(long, default_value_t = 0.05)]
    warping_window: f64,

    /// Points per streaming chunk
    #[arg(long, default_value_t = DEFAULT_EPOCH)]
    epoch: usize,

    /// Run full DTW on every window instead of pruning with lower bounds
    #[arg(long, default_value_t = false)]
    no_early_abandon: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Find the data subsequence closest to the query under DTW
    Search {
        /// Path to the data file (one whitespace-separated point per line)
        #[arg(long)]
        data: PathBuf,

        /// Path to the query file (same format as the data)
        #[arg(long)]
        query: PathBuf,

        /// Resample the query to this many points before searching
        #[arg(long)]
        query_length: Option<usize>,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long, requires = "output_dir")]
        experiment: Option<String>,

        /// Output directory for result files
        #[arg(long, requires = "experiment")]
        output_dir: Option<PathBuf>,

        /// Also write the query (source and stretched) as CSV to the output directory
        #[arg(long, default_value_t = false, requires = "experiment")]
        dump_query: bool,

        #[command(flatten)]
        tuning: TuningArgs,
    },
}

fn build_config(tuning: &TuningArgs) -> Result<SearchConfig> {
    let config = SearchConfig::new(tuning.dimensions, tuning.warping_window)
        .context("invalid search configuration")?
        .with_epoch(tuning.epoch)
        .with_early_abandoning(!tuning.no_early_abandon);
    Ok(config)
}

fn read_rows(path: &Path, dimensions: usize, what: &str) -> Result<Vec<Vector>> {
    RowReader::new(path, dimensions)
        .read()
        .with_context(|| format!("failed to read {what} file {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Search {
            data,
            query,
            query_length,
            experiment,
            output_dir,
            dump_query,
            tuning,
        } => {
            let config = build_config(&tuning)?;

            // Validate the experiment before doing any work
            let writer = match (experiment, output_dir) {
                (Some(name), Some(dir)) => {
                    let name = ExperimentName::new(name)?;
                    Some(ResultWriter::new(&dir, name)?)
                }
                _ => None,
            };

            // 1. Read data
            let mut search = SubsequenceSearch::new(config.clone());
            for point in read_rows(&data, tuning.dimensions, "data")? {
                search
                    .add_data_point(&point)
                    .context("failed to append data point")?;
            }
            info!(points = search.len(), "data loaded");

            // 2. Read and optionally resample the query
            let source = read_rows(&query, tuning.dimensions, "query")?;
            let points = match query_length {
                Some(n) => stretch(&source, n).context("failed to resample query")?,
                None => source.clone(),
            };
            info!(source = source.len(), points = points.len(), "query loaded");

            let mut prepared = search.new_query();
            for point in &points {
                prepared
                    .add_point(point)
                    .context("failed to append query point")?;
            }

            // 3. Search
            let result = search.search(&mut prepared).context("search failed")?;
            info!(%result, "search complete");

            // 4. Write artifacts
            let mut artifact = SearchArtifact::new(&result, &config, points.len());
            if let Some(writer) = &writer {
                writer.write_result(&result, &config, points.len())?;
                if dump_query {
                    writer.write_series_csv(SeriesKind::Source, &source)?;
                    writer.write_series_csv(SeriesKind::Stretched, &points)?;
                }
                artifact = artifact.with_experiment(writer.experiment());
            }

            // 5. Print summary
            println!("{}", serde_json::to_string_pretty(&artifact)?);
        }
    }

    Ok(())
}
