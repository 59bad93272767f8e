//! Show command - list the terms of a glossary.

use crate::app::App;
use crate::OutputFormat;

/// Run the show command.
pub fn run(app: &App, output: OutputFormat) -> anyhow::Result<()> {
    let (glossary, store) = app.store()?;
    let records = store.records()?;

    match output {
        OutputFormat::Text => {
            println!("{} ({})", glossary.name(), glossary.languages);
            println!("{}", store.path().display());
            println!();

            if records.is_empty() {
                println!("Glossary is empty.");
                return Ok(());
            }

            for record in &records {
                if record.note().is_empty() {
                    println!("  {}", record);
                } else {
                    println!("  {} # {}", record, record.note());
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }

    Ok(())
}
