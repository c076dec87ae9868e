//! `scriptorium export` / `scriptorium export-json` — Write a saved essay out.

use chrono::Local;
use scriptorium_config::AppConfig;
use scriptorium_core::{Document, DocumentStore};
use scriptorium_store::DocumentRecord;
use std::path::PathBuf;

pub async fn pdf(key: &str, output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let document = super::open_store(&config).load(key)?;
    write_document_pdf(&document, &config, output)?;
    Ok(())
}

/// Render and write a PDF, warning when only the error page could be made.
pub(crate) fn write_document_pdf(
    document: &Document,
    config: &AppConfig,
    output: Option<PathBuf>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = output.unwrap_or_else(|| {
        config
            .history_dir
            .join(scriptorium_export::export_filename(document, Local::now().naive_local()))
    });

    let result = scriptorium_export::render(document, &config.export);
    let path = scriptorium_export::write_pdf(&path, &result)?;

    match result.reason() {
        Some(reason) => {
            println!("⚠️  PDF could not be laid out: {reason}");
            println!("   An error page was written to {}", path.display());
        }
        None => println!("📄 PDF written to {}", path.display()),
    }
    Ok(path)
}

pub async fn json(key: &str, output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let document = super::open_store(&config).load(key)?;
    let json = to_json(&document)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json)?;
            println!("📤 Exported record to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn to_json(document: &Document) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&DocumentRecord::from_saved(document))
}
