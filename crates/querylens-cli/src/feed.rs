//! Input feed readers: the query-log CSV export and JSON Lines.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use querylens_analysis::QueryRecord;
use querylens_core::errors::FeedError;

/// Organization column of the CSV export.
pub const CSV_ORGANIZATION_COLUMN: &str = "Club";
/// Query text column of the CSV export.
pub const CSV_QUERY_COLUMN: &str = "Query";
/// Optional submission time column of the CSV export.
pub const CSV_TIMESTAMP_COLUMN: &str = "Timestamp (ET)";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Feed encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    Csv,
    Jsonl,
}

impl InputFormat {
    /// `.jsonl`, `.ndjson` and `.json` read as JSON Lines, everything else as CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ["jsonl", "ndjson", "json"].contains(&ext.to_ascii_lowercase().as_str()) => {
                Self::Jsonl
            }
            _ => Self::Csv,
        }
    }
}

/// Read every record of the feed at `path`.
pub fn read_feed(path: &Path, format: InputFormat) -> Result<Vec<QueryRecord>, FeedError> {
    let file = File::open(path).map_err(|e| FeedError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let records = match format {
        InputFormat::Csv => read_csv(file)?,
        InputFormat::Jsonl => read_jsonl(BufReader::new(file))?,
    };
    tracing::info!(path = %path.display(), records = records.len(), "feed loaded");
    Ok(records)
}

/// Read the CSV export. `Club` and `Query` columns are required; a row that
/// is too short to have a `Query` cell yields a record without query text.
///
/// Cells are decoded one by one, so a `Query` cell that is not valid UTF-8
/// only marks that record undecodable instead of failing the feed.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<QueryRecord>, FeedError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = reader
        .byte_headers()
        .map_err(malformed)?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().to_string())
        .collect();

    let column = |name: &str| headers.iter().position(|h| h == name);
    let org_idx = column(CSV_ORGANIZATION_COLUMN).ok_or_else(|| FeedError::MissingColumn {
        column: CSV_ORGANIZATION_COLUMN.to_string(),
    })?;
    let query_idx = column(CSV_QUERY_COLUMN).ok_or_else(|| FeedError::MissingColumn {
        column: CSV_QUERY_COLUMN.to_string(),
    })?;
    let ts_idx = column(CSV_TIMESTAMP_COLUMN);

    let mut records = Vec::new();
    for row in reader.byte_records() {
        let row = row.map_err(malformed)?;
        let line = row.position().map_or(0, |p| p.line());
        let organization_id = String::from_utf8_lossy(row.get(org_idx).unwrap_or_default())
            .trim()
            .to_string();
        let (query_text, decode_error) = match row.get(query_idx).map(std::str::from_utf8) {
            None => (None, None),
            Some(Ok(text)) => (Some(text.to_string()), None),
            Some(Err(e)) => {
                tracing::warn!(line, organization_id = %organization_id, "query cell is not valid UTF-8");
                (None, Some(format!("line {line}: {e}")))
            }
        };
        let submitted_at = ts_idx
            .and_then(|i| row.get(i))
            .and_then(|raw| std::str::from_utf8(raw).ok())
            .and_then(parse_timestamp);
        records.push(QueryRecord {
            organization_id,
            query_text,
            submitted_at,
            decode_error,
        });
    }
    Ok(records)
}

#[derive(Deserialize)]
struct JsonFeedRecord {
    #[serde(default)]
    organization_id: String,
    #[serde(default)]
    query_text: Option<String>,
    #[serde(default)]
    submitted_at: Option<String>,
}

/// Read JSON Lines, one `{organization_id, query_text, submitted_at}`
/// object per line. Blank lines are skipped.
///
/// A line that is not valid UTF-8 or not a JSON object becomes an
/// undecodable record; only I/O failures fail the feed.
pub fn read_jsonl<R: BufRead>(mut reader: R) -> Result<Vec<QueryRecord>, FeedError> {
    let mut records = Vec::new();
    let mut buf = Vec::new();
    let mut line_no: u64 = 0;
    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).map_err(|e| FeedError::Malformed {
            line: line_no + 1,
            message: e.to_string(),
        })?;
        if read == 0 {
            break;
        }
        line_no += 1;
        if buf.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        records.push(decode_json_line(line_no, &buf));
    }
    Ok(records)
}

fn decode_json_line(line_no: u64, bytes: &[u8]) -> QueryRecord {
    let parsed = std::str::from_utf8(bytes)
        .map_err(|e| e.to_string())
        .and_then(|line| serde_json::from_str::<JsonFeedRecord>(line).map_err(|e| e.to_string()));
    match parsed {
        Ok(raw) => QueryRecord {
            organization_id: raw.organization_id,
            query_text: raw.query_text,
            submitted_at: raw.submitted_at.as_deref().and_then(parse_timestamp),
            decode_error: None,
        },
        Err(message) => {
            // best effort: the organization is often still readable
            let organization_id = serde_json::from_str::<JsonFeedRecord>(&String::from_utf8_lossy(bytes))
                .map(|raw| raw.organization_id)
                .unwrap_or_default();
            tracing::warn!(line = line_no, organization_id = %organization_id, "undecodable feed line");
            QueryRecord {
                organization_id,
                decode_error: Some(format!("line {line_no}: {message}")),
                ..QueryRecord::default()
            }
        }
    }
}

/// Parse a timestamp in any of the formats seen in query-log exports.
/// Returns `None` for blank or unrecognized values.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn malformed(e: csv::Error) -> FeedError {
    FeedError::Malformed {
        line: e.position().map_or(0, |p| p.line()),
        message: e.to_string(),
    }
}
