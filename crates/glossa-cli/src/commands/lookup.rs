//! Lookup command - search the term index.

use crate::app::{App, OptionError};
use crate::OutputFormat;
use glossa_core::{GlossaryRef, LookupHit, TermFilter, TermQuery};
use std::time::Instant;

/// Run the lookup command.
pub fn run(
    app: &App,
    source_term: &str,
    only: bool,
    limit: Option<usize>,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let languages = app.languages()?;
    let mut query = TermQuery::new(source_term).with_filter(TermFilter::LanguagePair(languages));

    let glossary = match app.glossary_name() {
        Some(name) => Some(GlossaryRef::parse(name)?.display_name()),
        None if only => return Err(OptionError::MissingGlossary.into()),
        None => None,
    };

    if let Some(glossary) = glossary {
        query = if only {
            query.with_filter(TermFilter::Glossary(glossary))
        } else {
            query.prefer_glossary(glossary)
        };
    }

    if let Some(limit) = limit {
        query = query.with_limit(limit);
    }

    let start = Instant::now();
    let hits = app.gateway().search(&query)?;
    let elapsed = start.elapsed();

    match output {
        OutputFormat::Text => {
            for hit in &hits {
                println!("{}", format_hit(hit));
            }

            eprintln!();
            eprintln!(
                "Found {} results in {:.3}ms",
                hits.len(),
                elapsed.as_secs_f64() * 1000.0
            );
        }
        OutputFormat::Json => {
            let json_results: Vec<serde_json::Value> = hits
                .iter()
                .map(|hit| {
                    serde_json::json!({
                        "source_term": hit.record.source_term(),
                        "target_term": hit.record.target_term(),
                        "note": hit.record.note(),
                        "glossary": hit.glossary,
                    })
                })
                .collect();

            println!("{}", serde_json::to_string_pretty(&json_results)?);
        }
    }

    Ok(())
}

fn format_hit(hit: &LookupHit) -> String {
    let mut line = format!("{} ({})", hit.record, hit.glossary);
    if !hit.record.note().is_empty() {
        line.push_str(" # ");
        line.push_str(hit.record.note());
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use glossa_core::TermRecord;

    fn hit(note: &str) -> LookupHit {
        LookupHit {
            record: TermRecord::new("spec", "テスト", note).unwrap(),
            glossary: "project".to_string(),
            score: 0,
        }
    }

    #[test]
    fn test_format_hit() {
        assert_eq!(format_hit(&hit("")), "[spec] [テスト] (project)");
        assert_eq!(format_hit(&hit("備考")), "[spec] [テスト] (project) # 備考");
    }
}
