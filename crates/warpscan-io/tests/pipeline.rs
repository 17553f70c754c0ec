//! End-to-end integration tests: text rows -> stretch -> search -> JSON/CSV -> deserialize.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::{NamedTempFile, TempDir};
use warpscan_dtw::{SearchConfig, SubsequenceSearch, Vector};
use warpscan_io::{ExperimentName, IoError, ResultWriter, RowReader, SeriesKind, stretch};

fn write_rows(rows: &[&[f64]]) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    for row in rows {
        let line: Vec<String> = row.iter().map(f64::to_string).collect();
        writeln!(f, "{}", line.join(" ")).unwrap();
    }
    f.flush().unwrap();
    f
}

fn load_search(path: &Path, config: &SearchConfig) -> SubsequenceSearch {
    let rows = RowReader::new(path, config.dimensions())
        .read()
        .expect("data should parse");
    let mut search = SubsequenceSearch::new(config.clone());
    for row in &rows {
        search.add_data_point(row).unwrap();
    }
    search
}

#[test]
fn search_round_trip() {
    // 1. Read data and query
    let data = write_rows(&[
        &[0.0],
        &[0.0],
        &[1.0],
        &[2.0],
        &[1.0],
        &[0.0],
        &[0.0],
        &[5.0],
        &[6.0],
        &[5.0],
        &[0.0],
        &[0.0],
    ]);
    let query_file = write_rows(&[&[0.0], &[1.0], &[2.0], &[1.0], &[0.0]]);

    let config = SearchConfig::new(1, 1.0).unwrap();
    let search = load_search(data.path(), &config);
    let query_rows = RowReader::new(query_file.path(), 1).read().unwrap();

    // 2. Search
    let mut query = search.new_query();
    for row in &query_rows {
        query.add_point(row).unwrap();
    }
    let result = search.search(&mut query).unwrap();
    assert_eq!(result.location, Some(1));

    // 3. Write JSON artifact
    let dir = TempDir::new().unwrap();
    let experiment = ExperimentName::new("search_rt").unwrap();
    let writer = ResultWriter::new(dir.path(), experiment).unwrap();
    writer.write_result(&result, &config, query.len()).unwrap();

    // 4. Deserialize back and verify
    let json_path = dir.path().join("search_rt_search.json");
    let content: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();

    assert_eq!(content["experiment"], "search_rt");
    assert_eq!(content["query_length"].as_u64().unwrap(), 5);
    assert_eq!(content["location"].as_u64().unwrap(), 1);
    assert!(content["distance"].as_f64().unwrap() < 1e-6);
    assert_eq!(content["early_abandoning"], true);

    let stats = &content["stats"];
    let scanned = stats["scanned"].as_u64().unwrap();
    assert_eq!(scanned, 8);
    let pruned = stats["kim_pruned"].as_u64().unwrap()
        + stats["keogh_query_pruned"].as_u64().unwrap()
        + stats["keogh_data_pruned"].as_u64().unwrap();
    assert_eq!(pruned + stats["dtw_computed"].as_u64().unwrap(), scanned);
}

#[test]
fn stretched_query_finds_slowed_pattern() {
    // A bump played at half speed inside flat-ish noise-free data.
    let mut data: Vec<f64> = (0..40).map(|i| (i as f64 * 0.37).sin() * 0.1).collect();
    let bump = [0.0, 1.0, 3.0, 4.0, 3.0, 1.0, 0.0, -1.0, 0.0];
    let slowed: Vec<Vector> = stretch(
        &bump.iter().map(|&v| Vector::scalar(v)).collect::<Vec<_>>(),
        17,
    )
    .unwrap();
    for (offset, v) in slowed.iter().enumerate() {
        data[10 + offset] = v[0];
    }

    let data_rows: Vec<Vec<f64>> = data.iter().map(|&v| vec![v]).collect();
    let data_refs: Vec<&[f64]> = data_rows.iter().map(Vec::as_slice).collect();
    let data_file = write_rows(&data_refs);

    let query_rows: Vec<Vector> = bump.iter().map(|&v| Vector::scalar(v)).collect();
    let query_rows = stretch(&query_rows, slowed.len()).unwrap();

    let config = SearchConfig::new(1, 0.1).unwrap();
    let search = load_search(data_file.path(), &config);
    let mut query = search.new_query();
    for row in &query_rows {
        query.add_point(row).unwrap();
    }
    let result = search.search(&mut query).unwrap();
    assert_eq!(result.location, Some(10));
    assert!(result.distance < 1e-6, "distance {}", result.distance);

    // Dump the stretched query alongside the result
    let dir = TempDir::new().unwrap();
    let writer = ResultWriter::new(dir.path(), ExperimentName::new("stretch_rt").unwrap()).unwrap();
    let csv_path = writer
        .write_series_csv(SeriesKind::Stretched, &query_rows)
        .unwrap();
    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    assert_eq!(reader.headers().unwrap(), vec!["d0"]);
    assert_eq!(reader.records().count(), query_rows.len());
}

#[test]
fn multi_dimensional_rows_flow_through() {
    let rows: Vec<[f64; 2]> = (0..30)
        .map(|i| {
            let t = i as f64;
            [(t * 0.5).sin(), (t * 0.2).cos() + t * 0.01]
        })
        .collect();
    let refs: Vec<&[f64]> = rows.iter().map(|r| r.as_slice()).collect();
    let data = write_rows(&refs);
    let query_file = write_rows(&refs[12..20]);

    let config = SearchConfig::new(2, 0.25).unwrap();
    let search = load_search(data.path(), &config);
    let mut query = search.new_query();
    for row in RowReader::new(query_file.path(), 2).read().unwrap() {
        query.add_point(&row).unwrap();
    }
    let result = search.search(&mut query).unwrap();
    assert_eq!(result.location, Some(12));
}

#[test]
fn dimension_mismatch_is_reported_by_reader() {
    let data = write_rows(&[&[1.0, 2.0], &[3.0, 4.0]]);
    let result = RowReader::new(data.path(), 3).read();
    assert!(matches!(
        result,
        Err(IoError::InconsistentRowLength {
            line: 1,
            expected: 3,
            got: 2,
            ..
        })
    ));
}

#[test]
fn insufficient_data_writes_null_location() {
    let data = write_rows(&[&[1.0], &[2.0], &[3.0]]);
    let config = SearchConfig::new(1, 0.5).unwrap();
    let search = load_search(data.path(), &config);
    let mut query = search.new_query();
    for v in [1.0, 2.0, 3.0, 2.0, 1.0] {
        query.add_values(&[v]).unwrap();
    }
    let result = search.search(&mut query).unwrap();
    assert!(!result.is_match());

    let dir = TempDir::new().unwrap();
    let writer = ResultWriter::new(dir.path(), ExperimentName::new("short").unwrap()).unwrap();
    let path = writer.write_result(&result, &config, query.len()).unwrap();
    let content: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert!(content["location"].is_null());
    assert!(content["distance"].is_null());
}
