//! Index command implementation.

use crate::analyst::Analyst;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;
use crate::indexing::IndexReport;
use crate::records::load_documents;
use std::path::{Path, PathBuf};
use tracing::info;

/// How to treat a collection that already holds documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IngestMode {
    /// Only index into an empty collection.
    Fresh,
    /// Add every match again, duplicating what is stored.
    Append,
    /// Empty the collection, then index.
    Rebuild,
}

impl IngestMode {
    pub(crate) fn from_flags(append: bool, rebuild: bool) -> Self {
        match (append, rebuild) {
            (_, true) => IngestMode::Rebuild,
            (true, false) => IngestMode::Append,
            (false, false) => IngestMode::Fresh,
        }
    }
}

/// Outcome of an ingestion request.
#[derive(Debug)]
pub(crate) enum Ingestion {
    /// The collection was not empty and the mode was `Fresh`.
    Refused { existing: usize },
    Indexed(IndexReport),
}

/// Run the index command.
///
/// Failures print a single error line and exit with status 1.
pub async fn run_index(
    csv: Option<String>,
    append: bool,
    rebuild: bool,
    settings: Settings,
) -> anyhow::Result<()> {
    let csv_path = csv
        .map(|p| Settings::expand_path(&p))
        .unwrap_or_else(|| settings.csv_path());
    let analyst = Analyst::new(settings);

    if let Err(e) = preflight::check(&analyst, Operation::Index).await {
        Output::error(&format!("{}", e));
        Output::info("Run 'cup-analyst status' for details.");
        std::process::exit(1);
    }

    match ingest(&analyst, &csv_path, IngestMode::from_flags(append, rebuild)).await {
        Ok(Ingestion::Refused { existing }) => {
            Output::warning(&format!(
                "Collection '{}' already holds {} documents.",
                analyst.settings().vector_store.collection,
                existing
            ));
            Output::info("Use --rebuild to start over, or --append to add them again (creates duplicates).");
            Ok(())
        }
        Ok(Ingestion::Indexed(report)) => {
            Output::success(&format!("Database built: {} matches indexed.", report.indexed));
            Output::kv("Collection", &analyst.settings().vector_store.collection);
            Output::kv("Batches", &report.batches.to_string());
            Output::kv("Path", &analyst.settings().sqlite_path().display().to_string());
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Error: {}", e));
            std::process::exit(1);
        }
    }
}

/// Index the CSV unless the collection is already populated and `mode`
/// does not allow touching it.
pub(crate) async fn ingest(analyst: &Analyst, csv_path: &Path, mode: IngestMode) -> Result<Ingestion> {
    let existing = analyst.stored_documents().await?;

    if existing > 0 && mode == IngestMode::Fresh {
        info!("Refusing to index into a collection with {} documents", existing);
        return Ok(Ingestion::Refused { existing });
    }

    build_database(analyst, csv_path, mode == IngestMode::Rebuild)
        .await
        .map(Ingestion::Indexed)
}

/// Load the CSV and index it with a progress bar.
///
/// With `rebuild`, the collection is emptied first. Batches written before
/// a failure are kept.
pub(crate) async fn build_database(analyst: &Analyst, csv_path: &Path, rebuild: bool) -> Result<IndexReport> {
    let docs = load_documents(csv_path)?;
    Output::info(&format!("Loaded {} matches from {}", docs.len(), display(csv_path)));

    let indexer = analyst.indexer().await?;

    if rebuild {
        let removed = analyst.store().await?.clear().await?;
        info!("Cleared {} existing documents", removed);
    }

    let progress = Output::progress_bar(docs.len() as u64, "Starting...");
    let result = indexer.index(&docs, &progress).await;

    match &result {
        Ok(_) => progress.finish_and_clear(),
        Err(_) => progress.abandon(),
    }

    result
}

fn display(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| PathBuf::from(path))
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeEmbedder;
    use crate::vector_store::{SqliteVectorStore, VectorStore};
    use std::io::Write;
    use std::sync::Arc;

    const HEADER: &str =
        "Year,Stage,Home Team Name,Home Team Goals,Away Team Goals,Away Team Name,MatchID";

    const ROWS: [&str; 3] = [
        "1930,Group 1,France,4,1,Mexico,1096",
        "1930,Group 4,USA,3,0,Belgium,1099",
        "1950,Final,Uruguay,2,1,Brazil,1190",
    ];

    struct Fixture {
        _dir: tempfile::TempDir,
        csv_path: PathBuf,
        store: Arc<SqliteVectorStore>,
        analyst: Analyst,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("WorldCupMatches.csv");
        let mut file = std::fs::File::create(&csv_path).unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for row in ROWS {
            writeln!(file, "{}", row).unwrap();
        }

        let store = Arc::new(
            SqliteVectorStore::open(&dir.path().join("vectors.db"), "fifa_matches").unwrap(),
        );
        let analyst = Analyst::with_components(
            Settings::default(),
            Arc::new(FakeEmbedder::default()),
            store.clone(),
        );

        Fixture {
            _dir: dir,
            csv_path,
            store,
            analyst,
        }
    }

    #[test]
    fn test_mode_from_flags() {
        assert_eq!(IngestMode::from_flags(false, false), IngestMode::Fresh);
        assert_eq!(IngestMode::from_flags(true, false), IngestMode::Append);
        assert_eq!(IngestMode::from_flags(false, true), IngestMode::Rebuild);
    }

    #[tokio::test]
    async fn test_fresh_indexes_empty_collection() {
        let fx = fixture();

        let outcome = ingest(&fx.analyst, &fx.csv_path, IngestMode::Fresh).await.unwrap();

        assert!(matches!(outcome, Ingestion::Indexed(IndexReport { indexed: 3, .. })));
        assert_eq!(fx.store.document_count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_populated_collection_is_left_alone() {
        let fx = fixture();
        ingest(&fx.analyst, &fx.csv_path, IngestMode::Fresh).await.unwrap();

        let outcome = ingest(&fx.analyst, &fx.csv_path, IngestMode::Fresh).await.unwrap();

        assert!(matches!(outcome, Ingestion::Refused { existing: 3 }));
        assert_eq!(fx.store.document_count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_rebuild_replaces_collection() {
        let fx = fixture();
        ingest(&fx.analyst, &fx.csv_path, IngestMode::Fresh).await.unwrap();

        ingest(&fx.analyst, &fx.csv_path, IngestMode::Rebuild).await.unwrap();

        assert_eq!(fx.store.document_count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_append_duplicates_matches() {
        let fx = fixture();
        ingest(&fx.analyst, &fx.csv_path, IngestMode::Fresh).await.unwrap();

        ingest(&fx.analyst, &fx.csv_path, IngestMode::Append).await.unwrap();

        assert_eq!(fx.store.document_count().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_missing_csv_leaves_collection_untouched() {
        let fx = fixture();
        ingest(&fx.analyst, &fx.csv_path, IngestMode::Fresh).await.unwrap();

        let missing = fx.csv_path.with_file_name("missing.csv");
        let err = ingest(&fx.analyst, &missing, IngestMode::Rebuild).await.unwrap_err();

        assert!(matches!(err, crate::error::AnalystError::DatasetNotFound(_)));
        assert_eq!(fx.store.document_count().await.unwrap(), 3);
    }
}
