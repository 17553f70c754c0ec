//! JSON result writer and CSV series dumps.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};
use warpscan_dtw::{SearchConfig, SearchResult, SearchStats, Vector};

use crate::IoError;
use crate::domain::{ExperimentName, SeriesKind};

/// Serializable summary of one search.
///
/// Shared by the `{experiment}_search.json` artifact and the command-line summary.
/// Non-finite distances (no match) serialize as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchArtifact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experiment: Option<String>,
    pub dimensions: usize,
    pub query_length: usize,
    pub warping_window: f64,
    pub epoch: usize,
    pub early_abandoning: bool,
    pub distance: Option<f64>,
    pub location: Option<usize>,
    pub stats: StatsEntry,
}

/// Pruning counters as written to JSON.
#[derive(Debug, Clone, Serialize)]
pub struct StatsEntry {
    pub scanned: u64,
    pub kim_pruned: u64,
    pub keogh_query_pruned: u64,
    pub keogh_data_pruned: u64,
    pub dtw_computed: u64,
    pub pruning_rate: f64,
}

impl From<&SearchStats> for StatsEntry {
    fn from(stats: &SearchStats) -> Self {
        Self {
            scanned: stats.scanned,
            kim_pruned: stats.kim_pruned,
            keogh_query_pruned: stats.keogh_query_pruned,
            keogh_data_pruned: stats.keogh_data_pruned,
            dtw_computed: stats.dtw_computed,
            pruning_rate: stats.pruning_rate(),
        }
    }
}

impl SearchArtifact {
    /// Summarize `result` of a search run with `config` and a query of `query_length` points.
    #[must_use]
    pub fn new(result: &SearchResult, config: &SearchConfig, query_length: usize) -> Self {
        Self {
            experiment: None,
            dimensions: config.dimensions(),
            query_length,
            warping_window: config.warping_window(),
            epoch: config.epoch(),
            early_abandoning: config.early_abandoning(),
            distance: result.distance.is_finite().then_some(result.distance),
            location: result.location,
            stats: StatsEntry::from(&result.stats),
        }
    }

    #[must_use]
    pub fn with_experiment(mut self, experiment: &ExperimentName) -> Self {
        self.experiment = Some(experiment.as_str().to_string());
        self
    }
}

/// Writes search results and series dumps for one experiment.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_search.json` and
/// `{experiment}_{source|stretched}.csv`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    #[must_use]
    pub fn experiment(&self) -> &ExperimentName {
        &self.experiment
    }

    /// Write a search result to `{experiment}_search.json` and return its path.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all)]
    pub fn write_result(
        &self,
        result: &SearchResult,
        config: &SearchConfig,
        query_length: usize,
    ) -> Result<PathBuf, IoError> {
        let path = self.output_dir.join(self.experiment.file_name("search.json"));
        let artifact =
            SearchArtifact::new(result, config, query_length).with_experiment(&self.experiment);

        let json = serde_json::to_string_pretty(&artifact).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e.into(),
        })?;
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "search result written");
        Ok(path)
    }

    /// Dump `rows` to `{experiment}_{kind}.csv`, one point per row with a
    /// `d0,d1,...` header, and return the path.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Csv`] | The file cannot be created or a record cannot be written |
    /// | [`IoError::WriteFile`] | The final flush fails |
    #[instrument(skip(self, rows), fields(points = rows.len()))]
    pub fn write_series_csv(&self, kind: SeriesKind, rows: &[Vector]) -> Result<PathBuf, IoError> {
        let path = self
            .output_dir
            .join(self.experiment.file_name(&format!("{}.csv", kind.as_str())));
        let csv_err = |e: csv::Error| IoError::Csv {
            path: path.clone(),
            source: e,
        };

        let mut wtr = csv::Writer::from_path(&path).map_err(csv_err)?;
        let dims = rows.first().map_or(0, Vector::dimensions);
        wtr.write_record((0..dims).map(|d| format!("d{d}")))
            .map_err(csv_err)?;
        for row in rows {
            wtr.write_record(row.as_slice().iter().map(f64::to_string))
                .map_err(csv_err)?;
        }
        wtr.flush().map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "series written");
        Ok(path)
    }
}
