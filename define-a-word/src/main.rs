use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use cli::Cli;
use controller::{Controller, Resolution};
use dictionary::{Dictionary, Lookup};
use logging::LogTarget;
use runtime::App;
use view::{LineKind, ResultsView, View, NOT_FOUND_MESSAGE};

mod cli;
mod controller;
mod logging;
mod runtime;
mod ui;
mod utilities;
mod view;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let dict = Dictionary::with_base_url(cli.base_url.clone());

    if let Some(word) = &cli.word {
        logging::init(LogTarget::Stderr)?;
        let mut stdout = io::stdout();
        return Ok(define_word(&dict, word, &mut stdout).await?);
    }

    let log_file = cli.log_file.clone().unwrap_or_else(logging::default_log_file);
    logging::init(LogTarget::File(log_file))?;
    tracing::info!(base_url = %dict.base_url(), "starting interactive session");

    App::new(Arc::new(dict), cli.show_errors, cli.tick_rate()).run().await?;
    Ok(ExitCode::SUCCESS)
}

async fn define_word(lookup: &dyn Lookup, word: &str, out: &mut impl Write) -> io::Result<ExitCode> {
    let mut controller = Controller::new();
    controller.on_text_change(word);
    match controller.submit_with(lookup).await {
        None => {
            eprintln!("Nothing to define in {:?}.", controller.query());
            Ok(ExitCode::from(2))
        }
        Some(Resolution::Failed) => {
            // the cause has already been logged
            eprintln!("Encountered an error while searching for the word definition.");
            Ok(ExitCode::FAILURE)
        }
        Some(resolution) => {
            if let Resolution::Found(count) = resolution {
                tracing::debug!(count, "entries found");
            }
            print_view(&View::from_controller(&controller, false), out)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_view(view: &View, out: &mut impl Write) -> io::Result<()> {
    match &view.results {
        ResultsView::Idle => {}
        ResultsView::NotFound => writeln!(out, "{NOT_FOUND_MESSAGE}")?,
        ResultsView::Cards(_) => {
            for (index, card) in view.cards().iter().enumerate() {
                if index != 0 {
                    writeln!(out, "----------------------------------------")?;
                }
                for line in card.lines() {
                    match line.kind {
                        LineKind::Title | LineKind::Subtitle => writeln!(out, "{}", line.text)?,
                        LineKind::Divider => writeln!(out)?,
                        LineKind::PartOfSpeech => writeln!(out, "    {}:", line.text)?,
                        LineKind::Definition => writeln!(out, "        {}", line.text)?,
                        LineKind::SynonymsLabel => write!(out, "      {}: ", line.text)?,
                        LineKind::Synonyms => writeln!(out, "{}", line.text)?,
                    }
                }
            }
        }
    }
    out.flush()
}
