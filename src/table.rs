//! Tabular reader: turns the navigation spreadsheet into [`Row`]s.
//!
//! Input is read by an ordered list of [`ParseStrategy`]s. The first strategy that
//! produces a table wins; a strategy that cannot produce one (file missing, wrong
//! format, no worksheet) hands over to the next. A workbook that opens but is
//! malformed is indistinguishable from "use the CSV instead" at this level, so every
//! fallback is logged with its reason.
//!
//! Once a table exists, the required columns are checked and a missing column is
//! fatal. All absent cells become empty strings.

use crate::error::SyncError;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Column headers expected in the input, in the order the fields appear on [`Row`].
pub const COLUMNS: [&str; 5] = ["name", "link", "target", "description", "parent_name"];

/// One line of the navigation spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub name: String,
    pub link: String,
    pub target: String,
    pub description: String,
    pub parent_name: String,
}

/// Ways of reading the input, tried in order by [`load_rows`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    /// First worksheet of a spreadsheet (xlsx, xlsm, xls, ods).
    Workbook,
    /// Comma-separated file next to the input, with the extension swapped for `csv`.
    DelimitedText,
}

impl ParseStrategy {
    pub const DEFAULT_ORDER: [ParseStrategy; 2] =
        [ParseStrategy::Workbook, ParseStrategy::DelimitedText];

    /// The file this strategy reads for a given input path.
    pub fn source_path(&self, input: &Path) -> PathBuf {
        match self {
            ParseStrategy::Workbook => input.to_path_buf(),
            ParseStrategy::DelimitedText => input.with_extension("csv"),
        }
    }

    fn read(&self, path: &Path) -> Result<RawTable, String> {
        match self {
            ParseStrategy::Workbook => read_workbook(path),
            ParseStrategy::DelimitedText => read_delimited(path),
        }
    }
}

/// Header row plus string cells, before column mapping.
#[derive(Debug, Default)]
struct RawTable {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
}

/// Loads rows from `path` using [`ParseStrategy::DEFAULT_ORDER`].
pub fn load_rows(path: &Path) -> Result<Vec<Row>, SyncError> {
    load_rows_with(path, &ParseStrategy::DEFAULT_ORDER)
}

/// Loads rows from `path`, trying each strategy in turn.
pub fn load_rows_with(path: &Path, strategies: &[ParseStrategy]) -> Result<Vec<Row>, SyncError> {
    let mut failures: Vec<String> = Vec::new();

    for strategy in strategies {
        let source = strategy.source_path(path);
        debug!(?strategy, path = %source.display(), "Attempting to read navigation rows");
        match strategy.read(&source) {
            Ok(table) => {
                let rows = table.into_rows().map_err(|reason| {
                    error!(path = %source.display(), reason = %reason, "Input table is malformed");
                    SyncError::DataLoad {
                        path: source.clone(),
                        reason,
                    }
                })?;
                info!(?strategy, path = %source.display(), rows = rows.len(), "Loaded navigation rows");
                return Ok(rows);
            }
            Err(reason) => {
                warn!(?strategy, path = %source.display(), reason = %reason, "Parse strategy failed, trying next");
                failures.push(format!("{:?} ({}): {}", strategy, source.display(), reason));
            }
        }
    }

    error!(path = %path.display(), "No parse strategy could read the input");
    Err(SyncError::DataLoad {
        path: path.to_path_buf(),
        reason: if failures.is_empty() {
            "no parse strategies configured".to_string()
        } else {
            failures.join("; ")
        },
    })
}

impl RawTable {
    fn into_rows(self) -> Result<Vec<Row>, String> {
        let mut index = [0usize; COLUMNS.len()];
        for (slot, column) in index.iter_mut().zip(COLUMNS) {
            *slot = self
                .headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| format!("missing required column '{column}'"))?;
        }

        let cell = |record: &[String], i: usize| record.get(index[i]).cloned().unwrap_or_default();

        Ok(self
            .records
            .iter()
            .filter(|record| record.iter().any(|c| !c.trim().is_empty()))
            .map(|record| {
                let record = record.as_slice();
                Row {
                    name: cell(record, 0),
                    link: cell(record, 1),
                    target: cell(record, 2),
                    description: cell(record, 3),
                    parent_name: cell(record, 4),
                }
            })
            .collect())
    }
}

fn read_workbook(path: &Path) -> Result<RawTable, String> {
    let mut workbook = open_workbook_auto(path).map_err(|e| e.to_string())?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| "workbook has no worksheets".to_string())?
        .map_err(|e| e.to_string())?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header) => header.iter().map(cell_text).collect(),
        None => return Err("first worksheet is empty".to_string()),
    };
    let records = rows.map(|r| r.iter().map(cell_text).collect()).collect();

    Ok(RawTable { headers, records })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn read_delimited(path: &Path) -> Result<RawTable, String> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| e.to_string())?;

    let headers = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| e.to_string())?;
        records.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, records })
}
