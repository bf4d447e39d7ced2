//! Status command - service and database indicators.

use crate::analyst::Analyst;
use crate::cli::{format_size, Output};
use crate::config::Settings;
use crate::health::ServiceStatus;
use console::style;

/// Run the status command.
pub async fn run_status(settings: Settings) -> anyhow::Result<()> {
    let analyst = Analyst::new(settings);

    Output::header("FIFA World Cup Analyst");
    println!();

    let status = analyst.service_status().await;
    let documents = analyst.stored_documents().await?;
    print_indicators(analyst.settings(), &status, documents);

    println!();
    if !status.is_online() {
        Output::info("Start the server with 'ollama serve' in your terminal.");
    } else if documents == 0 {
        Output::info("Build the match database with 'cup-analyst index'.");
    } else {
        Output::success("Ready. Ask with 'cup-analyst ask \"...\"' or 'cup-analyst chat'.");
    }

    Ok(())
}

/// Print the server and database indicators.
pub(crate) fn print_indicators(settings: &Settings, status: &ServiceStatus, documents: usize) {
    println!("{}", style("Ollama Server").bold());
    match status {
        ServiceStatus::Online { .. } => {
            Output::indicator(true, "Ollama", &format!("online ({})", settings.ollama.base_url));
            for model in [&settings.embedding.model, &settings.llm.model] {
                if status.has_model(model) {
                    Output::indicator(true, model, "pulled");
                } else {
                    Output::indicator(false, model, &format!("missing (ollama pull {})", model));
                }
            }
        }
        ServiceStatus::Offline { reason } => {
            Output::indicator(false, "Ollama", &format!("offline ({})", reason));
        }
    }

    println!();
    println!("{}", style("Database").bold());
    let db_path = settings.sqlite_path();
    if documents > 0 {
        let size = std::fs::metadata(&db_path)
            .map(|m| format_size(m.len()))
            .unwrap_or_else(|_| "unknown size".to_string());
        Output::indicator(
            true,
            &settings.vector_store.collection,
            &format!("ready, {} matches ({}, {})", documents, db_path.display(), size),
        );
    } else {
        Output::indicator(
            false,
            &settings.vector_store.collection,
            &format!("not found ({})", db_path.display()),
        );
    }
}
