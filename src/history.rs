use std::fs::{self, OpenOptions};
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{AppError, Context, Result};
use crate::fetch::PriceSnapshot;

/// One timestamped reading; `values` aligns with `HistoryTable::columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub timestamp: DateTime<Utc>,
    pub values: Vec<f64>,
}

/// The full history log in memory, rows sorted ascending by timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryTable {
    pub columns: Vec<String>,
    pub rows: Vec<HistoryRow>,
}

impl HistoryTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw price series for one column, in row order.
    pub fn column_values(&self, col: usize) -> Vec<f64> {
        self.rows
            .iter()
            .map(|row| row.values.get(col).copied().unwrap_or(0.0))
            .collect()
    }
}

/// Append one reading to the log, writing the header first when the file is
/// new. The header fixes the column schema for the file's lifetime; later
/// runs append values only.
pub fn append_snapshot(
    path: &Path,
    timestamp: DateTime<Utc>,
    snapshot: &PriceSnapshot,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create history directory {}", parent.display())
            })?;
        }
    }

    let file_exists = path.exists();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open history log at {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);

    if !file_exists {
        let mut header = vec!["timestamp".to_string()];
        header.extend(snapshot.iter().map(|(name, _)| name.to_string()));
        writer.write_record(&header)?;
    }

    let mut record = vec![timestamp.to_rfc3339()];
    record.extend(snapshot.iter().map(|(_, price)| price.to_string()));
    writer.write_record(&record)?;
    writer.flush()?;

    Ok(())
}

/// Load the entire log. `None` means the file does not exist yet, a normal
/// first-run condition. Parse failures and ragged rows propagate as fatal.
pub fn load_history(path: &Path) -> Result<Option<HistoryTable>> {
    if !path.exists() {
        return Ok(None);
    }

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open history log at {}", path.display()))?;

    let headers = reader.headers()?.clone();
    if headers.get(0) != Some("timestamp") {
        return Err(AppError::message(format!(
            "history log {} is missing the timestamp column",
            path.display()
        )));
    }
    let columns: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let raw_timestamp = record
            .get(0)
            .ok_or_else(|| AppError::message("history row missing timestamp cell"))?;
        let timestamp = DateTime::parse_from_rfc3339(raw_timestamp)?.with_timezone(&Utc);

        let values = record
            .iter()
            .skip(1)
            .map(|cell| cell.parse::<f64>())
            .collect::<std::result::Result<Vec<f64>, _>>()?;

        rows.push(HistoryRow { timestamp, values });
    }

    rows.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    Ok(Some(HistoryTable { columns, rows }))
}
