//! Output sink: writes each result set to its own file.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use querylens_analysis::report::FlatRow;
use querylens_core::errors::SinkError;

/// Result-set encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Jsonl,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jsonl => "jsonl",
            Self::Csv => "csv",
        }
    }
}

/// Writes result sets into one directory.
pub struct ReportSink {
    dir: PathBuf,
    format: OutputFormat,
}

impl ReportSink {
    /// Create the sink, creating `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>, format: OutputFormat) -> Result<Self, SinkError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;
        Ok(Self { dir, format })
    }

    /// Write `rows` to `<dir>/<stem>.<ext>` and return the path written.
    pub fn write<R: Serialize + FlatRow>(&self, stem: &str, rows: &[R]) -> Result<PathBuf, SinkError> {
        let path = self.dir.join(format!("{stem}.{}", self.format.extension()));
        match self.format {
            OutputFormat::Jsonl => write_jsonl(&path, rows)?,
            OutputFormat::Csv => write_csv(&path, rows)?,
        }
        tracing::debug!(path = %path.display(), rows = rows.len(), "result set written");
        Ok(path)
    }
}

fn write_jsonl<R: Serialize>(path: &Path, rows: &[R]) -> Result<(), SinkError> {
    let file = File::create(path).map_err(|e| io_error(path, e))?;
    let mut out = BufWriter::new(file);
    for row in rows {
        serde_json::to_writer(&mut out, row).map_err(|e| SinkError::Serialize(e.to_string()))?;
        out.write_all(b"\n").map_err(|e| io_error(path, e))?;
    }
    out.flush().map_err(|e| io_error(path, e))
}

fn write_csv<R: FlatRow>(path: &Path, rows: &[R]) -> Result<(), SinkError> {
    let csv_error = |e: csv::Error| SinkError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer.write_record(R::header()).map_err(csv_error)?;
    for row in rows {
        writer.write_record(row.fields()).map_err(csv_error)?;
    }
    writer.flush().map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, e: std::io::Error) -> SinkError {
    SinkError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use querylens_analysis::report::EnvironmentRow;
    use querylens_analysis::DataEnvironment;

    fn rows() -> Vec<EnvironmentRow> {
        vec![EnvironmentRow {
            data_environment: DataEnvironment::Gridiron,
            query_count: 5,
            percentage: 62.5,
        }]
    }

    #[test]
    fn test_csv_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let sink = ReportSink::new(dir.path().join("out"), OutputFormat::Csv).unwrap();
        let path = sink.write("environment_summary", &rows()).unwrap();
        assert!(path.ends_with("environment_summary.csv"));
        let content = fs::read_to_string(path).unwrap();
        assert_eq!(
            content,
            "data_environment,query_count,percentage\ngridiron,5,62.50\n"
        );
    }

    #[test]
    fn test_jsonl_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let sink = ReportSink::new(dir.path(), OutputFormat::Jsonl).unwrap();
        let path = sink.write("environment_summary", &rows()).unwrap();
        let content = fs::read_to_string(path).unwrap();
        let value: serde_json::Value = serde_json::from_str(content.trim_end()).unwrap();
        assert_eq!(value["data_environment"], "gridiron");
        assert_eq!(value["query_count"], 5);
    }
}
