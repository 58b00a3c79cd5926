//! Delimited-text well log import
//!
//! Reads a comma-separated log with a header row into a [`CurveStore`].
//! Header mnemonics are mapped onto the canonical channels through an alias
//! table; unrecognized numeric columns are carried as extra channels.
//!
//! Cleaning order: drop rows with a null in any required channel, sort by
//! depth, then resolve duplicate depths.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::defaults::LAS_NULL;
use crate::types::{channel, CleaningReport, CurveStore, DataError, DuplicateDepthPolicy, Sample};

#[derive(Debug, Error)]
pub enum LogImportError {
    #[error("Failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),

    #[error("Log file has no header row")]
    MissingHeader,

    #[error("Log file has no depth column (expected one of: {0})")]
    MissingDepthColumn(String),

    #[error("Line {line}: column '{column}' value '{value}' is not a number")]
    Parse {
        line: usize,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Data(#[from] DataError),
}

// ============================================================================
// CSV Quote-Aware Parsing
// ============================================================================

/// Split a CSV line respecting quoted fields (handles commas inside quotes).
fn csv_split(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

// ============================================================================
// Column Mapping
// ============================================================================

/// Header aliases per canonical channel, matched case-insensitively.
const ALIASES: &[(&str, &[&str])] = &[
    (channel::DEPTH, &["depth", "dept", "md", "depth_m", "depth_ft"]),
    (channel::GR, &["gr", "gamma", "gr_api", "sgr"]),
    (channel::RHOB, &["rhob", "den", "zden", "rhoz"]),
    (channel::NPHI, &["nphi", "neu", "tnph", "npor"]),
    (channel::RT, &["rt", "rd", "ild", "lld", "rdep", "at90"]),
    (channel::PE, &["pe", "pef", "pefz"]),
];

/// Canonical channel for a header cell; unknown headers keep their trimmed name.
fn canonical_name(header: &str) -> (String, bool) {
    let key = header.trim().to_ascii_lowercase();
    for (canonical, aliases) in ALIASES {
        if aliases.contains(&key.as_str()) {
            return ((*canonical).to_string(), true);
        }
    }
    (header.trim().to_string(), false)
}

#[derive(Debug, Clone)]
struct Column {
    name: String,
    /// One of the canonical channels; parse failures are errors
    known: bool,
}

#[derive(Debug, Clone)]
struct ColumnMap {
    depth: usize,
    columns: Vec<Column>,
}

impl ColumnMap {
    fn from_header(header: &str) -> Result<Self, LogImportError> {
        let mut columns: Vec<Column> = Vec::new();
        for cell in csv_split(header) {
            let (name, known) = canonical_name(&cell);
            // A second column mapping to the same channel is ignored
            let name = if columns.iter().any(|c| c.name == name) {
                warn!(column = %cell.trim(), channel = %name, "Duplicate channel column ignored");
                String::new()
            } else {
                name
            };
            columns.push(Column { name, known });
        }

        let depth = columns
            .iter()
            .position(|c| c.name == channel::DEPTH)
            .ok_or_else(|| {
                let expected = ALIASES
                    .iter()
                    .find(|(c, _)| *c == channel::DEPTH)
                    .map(|(_, a)| a.join(", "))
                    .unwrap_or_default();
                LogImportError::MissingDepthColumn(expected)
            })?;

        Ok(Self { depth, columns })
    }

    fn has(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    fn channel_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| !c.name.is_empty())
            .map(|c| c.name.clone())
            .collect()
    }
}

/// Parse one cell. Empty, `NaN`, `null` and the LAS null are missing values.
fn parse_cell(raw: &str) -> Result<Option<f64>, ()> {
    let s = raw.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("null") || s == "-" {
        return Ok(None);
    }
    let v: f64 = s.parse().map_err(|_| ())?;
    if !v.is_finite() || (v - LAS_NULL).abs() < 1e-9 {
        Ok(None)
    } else {
        Ok(Some(v))
    }
}

fn parse_row(line: &str, line_num: usize, map: &ColumnMap) -> Result<Sample, LogImportError> {
    let fields = csv_split(line);
    let mut sample = Sample::new(f64::NAN);

    for (idx, column) in map.columns.iter().enumerate() {
        if column.name.is_empty() {
            continue;
        }
        let raw = fields.get(idx).map_or("", String::as_str);
        let value = match parse_cell(raw) {
            Ok(v) => v,
            // Free-text side columns (lithology codes, comments) are skipped
            Err(()) if !column.known => None,
            Err(()) => {
                return Err(LogImportError::Parse {
                    line: line_num,
                    column: column.name.clone(),
                    value: raw.trim().to_string(),
                })
            }
        };
        match (idx == map.depth, value) {
            (true, Some(d)) => sample.depth = d,
            (true, None) => {}
            (false, Some(v)) => {
                sample.curves.insert(column.name.clone(), v);
            }
            (false, None) => {}
        }
    }
    Ok(sample)
}

// ============================================================================
// Entry Points
// ============================================================================

/// Outcome of a log import.
#[derive(Debug, Clone)]
pub struct LogImportReport {
    pub source: String,
    /// Channels found in the header, canonical names first-seen order
    pub columns: Vec<String>,
    pub cleaning: CleaningReport,
}

/// Read a log file from disk.
pub fn read_log_csv(
    path: impl AsRef<Path>,
    required: &[&str],
    duplicates: DuplicateDepthPolicy,
) -> Result<(CurveStore, LogImportReport), LogImportError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| LogImportError::Io(path.to_path_buf(), e))?;
    let (store, mut report) = parse_log_csv(BufReader::new(file), required, duplicates)
        .map_err(|e| match e {
            LogImportError::Io(_, io) => LogImportError::Io(path.to_path_buf(), io),
            other => other,
        })?;
    report.source = path.display().to_string();

    info!(
        file = %report.source,
        samples = store.len(),
        dropped_null = report.cleaning.null_rows_dropped,
        dropped_duplicate = report.cleaning.duplicate_rows_dropped,
        depth_range = ?store.depth_range(),
        "Well log loaded"
    );
    Ok((store, report))
}

/// Parse a log from any buffered reader.
///
/// `required` lists the channels the selected models need; a required
/// channel absent from the header fails with [`DataError::MissingChannel`].
pub fn parse_log_csv<R: BufRead>(
    reader: R,
    required: &[&str],
    duplicates: DuplicateDepthPolicy,
) -> Result<(CurveStore, LogImportReport), LogImportError> {
    let mut lines = reader.lines();

    let header = loop {
        match lines.next() {
            Some(Ok(l)) if l.trim().is_empty() => continue,
            Some(Ok(l)) => break l,
            Some(Err(e)) => return Err(LogImportError::Io(PathBuf::new(), e)),
            None => return Err(LogImportError::MissingHeader),
        }
    };
    let map = ColumnMap::from_header(header.trim_start_matches('\u{feff}'))?;

    if let Some(&missing) = required.iter().find(|&&c| !map.has(c)) {
        return Err(DataError::MissingChannel {
            channel: missing.to_string(),
        }
        .into());
    }

    let mut raw = Vec::new();
    for (i, line) in lines.enumerate() {
        let line = line.map_err(|e| LogImportError::Io(PathBuf::new(), e))?;
        if line.trim().is_empty() {
            continue;
        }
        // Header is line 1
        raw.push(parse_row(&line, i + 2, &map)?);
    }

    let (store, cleaning) = CurveStore::from_samples(raw, required, duplicates)?;
    if cleaning.null_rows_dropped > 0 {
        warn!(rows = cleaning.null_rows_dropped, "Dropped rows with missing required channels");
    }
    if cleaning.duplicate_rows_dropped > 0 {
        warn!(rows = cleaning.duplicate_rows_dropped, "Dropped duplicate depths (kept first)");
    }

    Ok((
        store,
        LogImportReport {
            source: String::new(),
            columns: map.channel_names(),
            cleaning,
        },
    ))
}
