//! CSV loading for match records.

use super::{MatchDocument, MatchRecord};
use crate::error::{AnalystError, Result};
use csv::StringRecord;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Columns the dataset must provide.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "MatchID",
    "Year",
    "Home Team Name",
    "Away Team Name",
    "Home Team Goals",
    "Away Team Goals",
];

/// Cell values treated as missing.
const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A", "<NA>",
];

/// Header positions of the required columns.
struct Columns {
    match_id: usize,
    year: usize,
    home_team: usize,
    away_team: usize,
    home_goals: usize,
    away_goals: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| find(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(AnalystError::Dataset(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )));
        }

        let index = |name: &str| find(name).unwrap_or_default();
        Ok(Self {
            match_id: index("MatchID"),
            year: index("Year"),
            home_team: index("Home Team Name"),
            away_team: index("Away Team Name"),
            home_goals: index("Home Team Goals"),
            away_goals: index("Away Team Goals"),
        })
    }
}

/// Load the dataset and convert every valid row into a document.
pub fn load_documents(path: &Path) -> Result<Vec<MatchDocument>> {
    Ok(load_records(path)?
        .into_iter()
        .map(MatchRecord::into_document)
        .collect())
}

/// Load the dataset, dropping rows without team names and duplicate match IDs.
///
/// Row order is preserved and the first row seen for a `MatchID` wins.
/// Goal counts must be numeric on every surviving row.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_records(path: &Path) -> Result<Vec<MatchRecord>> {
    if !path.is_file() {
        return Err(AnalystError::DatasetNotFound(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let columns = Columns::locate(reader.headers()?)?;

    let mut seen_ids: HashSet<Option<String>> = HashSet::new();
    let mut records = Vec::new();
    let mut missing_teams = 0usize;
    let mut duplicates = 0usize;

    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let line = row
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 2);

        let (Some(home_team), Some(away_team)) =
            (cell(&row, columns.home_team), cell(&row, columns.away_team))
        else {
            missing_teams += 1;
            continue;
        };

        let match_id = cell(&row, columns.match_id).map(normalize_id);
        if !seen_ids.insert(match_id.clone()) {
            duplicates += 1;
            continue;
        }

        let year = match cell(&row, columns.year) {
            Some(raw) => Some(parse_whole(raw, "Year", line)?.to_string()),
            None => None,
        };

        records.push(MatchRecord {
            match_id,
            year,
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            home_goals: required_whole(&row, columns.home_goals, "Home Team Goals", line)?,
            away_goals: required_whole(&row, columns.away_goals, "Away Team Goals", line)?,
        });
    }

    debug!(
        "Dropped {} rows without team names and {} duplicate match IDs",
        missing_teams, duplicates
    );
    info!("Loaded {} match records", records.len());

    Ok(records)
}

/// Trimmed cell value, or None when the cell is absent or a missing marker.
fn cell(row: &StringRecord, index: usize) -> Option<&str> {
    row.get(index)
        .map(str::trim)
        .filter(|value| !MISSING_MARKERS.contains(value))
}

fn required_whole(row: &StringRecord, index: usize, column: &str, line: u64) -> Result<i64> {
    let raw = cell(row, index).ok_or_else(|| {
        AnalystError::Dataset(format!("line {}: missing value for '{}'", line, column))
    })?;
    parse_whole(raw, column, line)
}

/// Parse a numeric cell and truncate it toward zero ("1930.0" -> 1930).
fn parse_whole(raw: &str, column: &str, line: u64) -> Result<i64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.trunc() as i64)
        .ok_or_else(|| {
            AnalystError::Dataset(format!(
                "line {}: '{}' is not a number in column '{}'",
                line, raw, column
            ))
        })
}

/// Numeric IDs compare equal regardless of a trailing ".0".
fn normalize_id(raw: &str) -> String {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 => format!("{}", v as i64),
        _ => raw.to_string(),
    }
}
