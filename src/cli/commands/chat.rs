//! Interactive chat command.

use super::index::build_database;
use super::status::print_indicators;
use crate::analyst::Analyst;
use crate::cli::Output;
use crate::config::Settings;
use crate::session::ChatSession;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
pub async fn run_chat(settings: Settings) -> anyhow::Result<()> {
    let analyst = Analyst::new(settings);

    Output::header("FIFA World Cup Analyst");
    println!();

    let status = analyst.service_status().await;
    let documents = analyst.stored_documents().await?;
    print_indicators(analyst.settings(), &status, documents);
    println!();

    if documents == 0 {
        Output::info("The match database needs to be built from the CSV file. This takes a few minutes.");

        if !status.is_online() {
            Output::error("Ollama is offline. Run 'ollama serve' in your terminal, then try again.");
            return Ok(());
        }

        if !Output::confirm("Start building the database?")? {
            return Ok(());
        }

        let csv_path = analyst.settings().csv_path();
        match build_database(&analyst, &csv_path, false).await {
            Ok(report) => {
                Output::success(&format!("Database built successfully ({} matches).", report.indexed));
            }
            Err(e) => {
                Output::error(&format!("Error: {}", e));
                return Ok(());
            }
        }
    }

    if !status.is_online() {
        Output::error("Ollama is offline. Run 'ollama serve' in your terminal, then try again.");
        return Ok(());
    }

    let engine = analyst.engine().await?;
    let mut session = ChatSession::new();

    println!("\n{}", style("Ask about a World Cup match").bold().cyan());
    println!(
        "{}\n",
        style("Type 'exit' to quit, 'history' to show the conversation, 'clear' to reset it.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            session.clear();
            Output::info("Conversation history cleared.");
            continue;
        }

        if input.eq_ignore_ascii_case("history") {
            if session.is_empty() {
                Output::info("No messages yet.");
            }
            println!();
            for turn in session.turns() {
                Output::chat_turn(turn);
            }
            continue;
        }

        let spinner = Output::spinner("Analyzing...");
        let result = engine.respond(&mut session, input).await;
        spinner.finish_and_clear();

        match result {
            Ok(answer) => {
                println!("\n{} {}\n", style("Analyst:").cyan().bold(), answer.text);
            }
            Err(e) => {
                Output::error(&format!("Error: {}", e));
            }
        }
    }

    Ok(())
}
