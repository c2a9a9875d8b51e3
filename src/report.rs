//! Report emission
//!
//! Writes the per-record CSVs next to the input log and prints the aggregate
//! summary. Output-directory creation failures are warnings, not errors: the
//! directory already existing is the normal case on repeated runs, and the
//! CSV writes themselves surface any real filesystem problem.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::analyzer::{Analysis, AnalysisReport};
use crate::error::ForgeResult;

/// Paths of the two CSVs emitted for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvPaths {
    pub kernel: PathBuf,
    pub latency: PathBuf,
}

/// Write `kernel_<num_gpu>.csv` and `latency_<num_gpu>.csv` into `out_dir`.
pub fn write_csvs(out_dir: &Path, num_gpu: usize, analysis: &Analysis) -> ForgeResult<CsvPaths> {
    if let Err(err) = std::fs::create_dir_all(out_dir) {
        tracing::warn!(dir = %out_dir.display(), error = %err, "unable to create output directory");
    }

    let kernel = out_dir.join(format!("kernel_{}.csv", num_gpu));
    let latency = out_dir.join(format!("latency_{}.csv", num_gpu));

    let mut writer = BufWriter::new(File::create(&kernel)?);
    writeln!(writer, "Batch Id,Kernel Time")?;
    for (i, value) in analysis.kernel_series.iter().enumerate() {
        writeln!(writer, "{},{}", i, value)?;
    }
    writer.flush()?;

    let mut writer = BufWriter::new(File::create(&latency)?);
    writeln!(writer, "Request Id,Latency")?;
    for (id, value) in &analysis.latency_rows {
        writeln!(writer, "{},{}", id, value)?;
    }
    writer.flush()?;

    Ok(CsvPaths { kernel, latency })
}

/// Render the aggregate report as the human-readable stdout block.
pub fn format_summary(report: &AnalysisReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Total request: {}\n", report.total_requests));

    out.push_str("------------------------\n");
    out.push_str(&format!("total kernel time: {}\n", report.kernel_time.sum));
    out.push_str(&format!("avg kernel time: {}\n", report.kernel_time.mean));
    out.push_str(&format!("max kernel time: {}\n", report.kernel_time.max));
    out.push_str(&format!("min kernel time: {}\n", report.kernel_time.min));

    out.push_str("------------------------\n");
    out.push_str(&format!("Average Latency: {}\n", report.latency_ms.mean));
    out.push_str(&format!("Max Latency: {}\n", report.latency_ms.max));
    out.push_str(&format!("Min Latency: {}\n", report.latency_ms.min));
    out.push_str(&format!(
        "Standard Deviation: {}\n",
        report.latency_ms.std_dev
    ));

    out.push_str("------------------------\n");
    out.push_str(&format!("throughput: {}\n", report.throughput));
    out.push_str(&format!("total time: {}\n", report.total_time_seconds));
    out.push_str(&format!("token generated: {}\n", report.tokens_generated));

    if let Some(batch_sizes) = &report.batch_sizes {
        out.push_str("------------------------\n");
        out.push_str(&format!("batch size samples: {:?}\n", batch_sizes));
    }

    out
}

/// Print the aggregate report to stdout, human block or JSON.
pub fn print_summary(report: &AnalysisReport, json: bool) -> ForgeResult<()> {
    if json {
        let rendered =
            serde_json::to_string_pretty(report).expect("report serialization cannot fail");
        println!("{}", rendered);
    } else {
        print!("{}", format_summary(report));
    }
    Ok(())
}
