//! Match records and the documents derived from them.
//!
//! A [`MatchRecord`] is one cleaned row of the World Cup matches CSV; a
//! [`MatchDocument`] is the text-plus-metadata form that gets embedded.

mod loader;

pub use loader::{load_documents, load_records, REQUIRED_COLUMNS};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder used when a match has no recorded year.
pub const UNKNOWN_YEAR: &str = "N/A";

/// One valid match row from the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Normalized `MatchID`, if the row has one.
    pub match_id: Option<String>,
    /// Tournament year as whole-number text.
    pub year: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: i64,
    pub away_goals: i64,
}

impl MatchRecord {
    /// Year text used in content and metadata.
    pub fn year_label(&self) -> &str {
        self.year.as_deref().unwrap_or(UNKNOWN_YEAR)
    }

    /// Convert the record into an indexable document.
    pub fn into_document(self) -> MatchDocument {
        let content = format_content(&self);

        let mut metadata = BTreeMap::new();
        metadata.insert("year".to_string(), self.year_label().to_string());
        if let Some(id) = self.match_id {
            metadata.insert("match_id".to_string(), id);
        }

        MatchDocument { content, metadata }
    }
}

/// Text content plus metadata, ready to be embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDocument {
    pub content: String,
    pub metadata: BTreeMap<String, String>,
}

/// Render the one-line description of a match.
pub fn format_content(record: &MatchRecord) -> String {
    format!(
        "Year: {} | {} vs {} | Result: {}-{}",
        record.year_label(),
        record.home_team,
        record.away_team,
        record.home_goals,
        record.away_goals
    )
}
