//! End-to-end tests for the continuous-batching analysis pipeline
//!
//! Builds a synthetic flex-dialect log with known timestamps, runs the full
//! pipeline including CSV emission, and checks the emitted rows against
//! hand-computed values.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use logforge::{analyze_flex, report, AnalyzerConfig, Dialect, LogForgeError};

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

fn request_line(ts: f64, id: u64, len: u64) -> String {
    format!("[flex] INFO sched {ts} -- [NewRequest] (id={id}, (input_len={len})\n")
}

fn done_line(ts: f64, id: u64, len: u64) -> String {
    format!("[flex] INFO sched {ts} -- [Done] (id={id}, (final_length={len})\n")
}

fn batch_line(ts: f64, num: u64) -> String {
    format!("[flex] INFO sched {ts} -- [NextBatch] (batch_num={num})\n")
}

/// Three requests with known arrival and completion instants; the latency
/// CSV must contain (completion - arrival) * 1000 per request, in arrival
/// order.
#[test]
fn test_three_request_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    let mut log = String::new();
    log.push_str(&request_line(1.0, 0, 100));
    log.push_str(&request_line(2.0, 1, 150));
    log.push_str(&request_line(3.0, 2, 200));
    log.push_str(&batch_line(1.0, 0));
    log.push_str(&batch_line(2.0, 1));
    log.push_str(&batch_line(3.5, 2));
    log.push_str(&done_line(5.0, 0, 180));
    log.push_str(&done_line(6.5, 1, 250));
    log.push_str(&done_line(8.0, 2, 320));
    log.push_str("ELAPSED wall clock 20.0s] -- run complete\n");
    log.push_str("unrelated diagnostic noise that must be skipped\n");

    let log_path = write_file(&dir, "flex_run.log", &log);
    // Arrival offsets in ms: converted to 0.1s, 0.25s, 0.5s at load time.
    let arrival_path = write_file(&dir, "arrival_times.txt", "100\n250\n500\n");

    let config = AnalyzerConfig::new(&log_path, 1).with_arrival_path(&arrival_path);
    let analysis = analyze_flex(&config).unwrap();

    assert_eq!(analysis.report.dialect, Dialect::Flex);
    assert_eq!(analysis.report.total_requests, 3);

    // Positive log timestamps keep the baseline at 0.0, so each arrival is
    // the side-file offset and each completion is the [Done] timestamp.
    let expected = vec![
        (0, (5.0 - 0.1) * 1000.0),
        (1, (6.5 - 0.25) * 1000.0),
        (2, (8.0 - 0.5) * 1000.0),
    ];
    assert_eq!(analysis.latency_rows, expected);

    // Net tokens: (180+250+320) - (100+150+200) = 300 over 20 s.
    assert_eq!(analysis.report.tokens_generated, 300);
    assert_eq!(analysis.report.throughput, 15.0);
    assert_eq!(analysis.report.total_time_seconds, 20.0);

    // One lane, three batches: deltas between consecutive batch records.
    assert_eq!(analysis.kernel_series, vec![1000.0, 1500.0]);

    // Emit and re-read the CSVs.
    let out_dir = config.output_dir();
    let paths = report::write_csvs(&out_dir, config.num_gpu, &analysis).unwrap();

    let latency_csv = fs::read_to_string(&paths.latency).unwrap();
    let mut lines = latency_csv.lines();
    assert_eq!(lines.next(), Some("Request Id,Latency"));
    for (row, (id, ms)) in lines.zip(&expected) {
        let (row_id, row_ms) = row.split_once(',').unwrap();
        assert_eq!(row_id.parse::<u64>().unwrap(), *id);
        assert!((row_ms.parse::<f64>().unwrap() - ms).abs() < 1e-9);
    }

    let kernel_csv = fs::read_to_string(&paths.kernel).unwrap();
    assert_eq!(kernel_csv, "Batch Id,Kernel Time\n0,1000\n1,1500\n");
}

#[test]
fn test_kernel_series_respects_lane_count() {
    let dir = tempfile::tempdir().unwrap();

    let mut log = String::new();
    log.push_str(&request_line(0.5, 0, 10));
    log.push_str(&done_line(9.0, 0, 20));
    for (num, ts) in [(0u64, 1.0), (1, 1.25), (2, 2.0), (3, 3.0), (4, 4.5)] {
        log.push_str(&batch_line(ts, num));
    }

    let log_path = write_file(&dir, "flex_lanes.log", &log);
    let arrival_path = write_file(&dir, "arrival_times.txt", "0\n");

    // Two lanes: batch i pairs with batch i-2, series length 5 - 2 = 3.
    let config = AnalyzerConfig::new(&log_path, 2).with_arrival_path(&arrival_path);
    let analysis = analyze_flex(&config).unwrap();
    assert_eq!(analysis.kernel_series.len(), 3);
    assert_eq!(analysis.kernel_series, vec![1000.0, 1750.0, 2500.0]);
}

#[test]
fn test_completion_without_arrival_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();

    let mut log = String::new();
    log.push_str(&request_line(1.0, 0, 10));
    log.push_str(&done_line(2.0, 0, 20));
    log.push_str(&done_line(3.0, 7, 20));
    log.push_str(&batch_line(1.0, 0));
    log.push_str(&batch_line(2.0, 1));

    let log_path = write_file(&dir, "flex_bad.log", &log);
    let arrival_path = write_file(&dir, "arrival_times.txt", "0\n0\n0\n0\n0\n0\n0\n0\n");

    let config = AnalyzerConfig::new(&log_path, 1).with_arrival_path(&arrival_path);
    let err = analyze_flex(&config).unwrap_err();
    assert!(matches!(err, LogForgeError::UnknownRequestId(7)));
}

#[test]
fn test_request_without_completion_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();

    let mut log = String::new();
    log.push_str(&request_line(1.0, 0, 10));
    log.push_str(&done_line(2.0, 0, 20));
    log.push_str(&request_line(1.5, 1, 10));
    log.push_str(&batch_line(1.0, 0));
    log.push_str(&batch_line(2.0, 1));

    let log_path = write_file(&dir, "flex_trunc.log", &log);
    let arrival_path = write_file(&dir, "arrival_times.txt", "0\n0\n");

    let config = AnalyzerConfig::new(&log_path, 1).with_arrival_path(&arrival_path);
    let err = analyze_flex(&config).unwrap_err();
    assert!(matches!(
        err,
        LogForgeError::IncompleteSession { id: 1, observed: 1 }
    ));
}
