//! `scriptorium show` — Print a saved essay.

use scriptorium_core::{DocumentStore, Section};

pub async fn run(key: &str, section: Option<Section>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let document = super::open_store(&config).load(key)?;

    match section {
        Some(section) => {
            println!("📄 {}", document.title);
            super::print_section(&document, section);
        }
        None => super::print_document(&document),
    }

    if let Some(path) = &document.source_path {
        println!("\n(record: {})", path.display());
    }
    Ok(())
}
