//! Ask command implementation.

use crate::analyst::Analyst;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the ask command.
///
/// Failures print a single error line and exit with status 1.
pub async fn run_ask(question: &str, settings: Settings) -> Result<()> {
    let analyst = Analyst::new(settings);

    // Pre-flight checks
    if let Err(e) = preflight::check(&analyst, Operation::Ask).await {
        Output::error(&format!("{}", e));
        Output::info("Run 'cup-analyst status' for details.");
        std::process::exit(1);
    }

    let engine = analyst.engine().await?;
    let spinner = Output::spinner("Analyzing...");

    match engine.answer(question).await {
        Ok(answer) => {
            spinner.finish_and_clear();

            println!("\n{}\n", answer.text);

            if !answer.sources.is_empty() {
                Output::header("Matches used");
                for source in &answer.sources {
                    Output::source(&source.document.content, source.score);
                }
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            std::process::exit(1);
        }
    }

    Ok(())
}
