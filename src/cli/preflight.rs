//! Pre-flight checks before expensive operations.
//!
//! Validates that Ollama, its models and the match database are available
//! before starting operations that would otherwise fail midway.

use crate::analyst::Analyst;
use crate::error::{AnalystError, Result};
use crate::health::ServiceStatus;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Indexing needs the server and the embedding model.
    Index,
    /// Answering also needs the generation model and an indexed database.
    Ask,
}

/// Run pre-flight checks for the given operation.
///
/// Returns the probed service status if all checks pass, or an error
/// describing what's missing.
pub async fn check(analyst: &Analyst, operation: Operation) -> Result<ServiceStatus> {
    let settings = analyst.settings();
    let status = analyst.service_status().await;

    if let ServiceStatus::Offline { reason } = &status {
        return Err(AnalystError::Unavailable(format!(
            "Ollama is not reachable at {} ({}). Run 'ollama serve' in your terminal.",
            settings.ollama.base_url, reason
        )));
    }

    check_model(&status, &settings.embedding.model)?;

    if let Operation::Ask = operation {
        check_model(&status, &settings.llm.model)?;

        if !analyst.store_present().await? {
            return Err(AnalystError::Unavailable(
                "Match database not found. Build it with 'cup-analyst index'.".to_string(),
            ));
        }
    }

    Ok(status)
}

fn check_model(status: &ServiceStatus, model: &str) -> Result<()> {
    if status.has_model(model) {
        Ok(())
    } else {
        Err(AnalystError::Unavailable(format!(
            "Model '{}' is not available. Pull it with: ollama pull {}",
            model, model
        )))
    }
}
