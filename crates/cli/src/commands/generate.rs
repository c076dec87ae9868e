//! `scriptorium generate` — Draft a new essay.

use scriptorium_core::{AcademicLevel, CitationStyle, DocumentStore};
use scriptorium_pipeline::Assembler;

pub async fn run(
    topic: &str,
    level: AcademicLevel,
    style: CitationStyle,
    save: bool,
    pdf: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let client = super::model_client(&config);

    println!("✍️  Drafting \"{}\" ({level}, {style}) with {} / {}…\n", topic.trim(), client.provider_name(), client.model());

    let assembler = Assembler::new(client);
    let mut document = assembler
        .assemble(topic, level, style)
        .await
        .map_err(super::generation_failed)?;

    super::print_document(&document);

    if !save {
        println!("\n(not saved)");
        return Ok(());
    }

    let store = super::open_store(&config);
    let path = store.save(&mut document)?;
    println!("\n💾 Saved to {}", path.display());

    if pdf {
        super::export::write_document_pdf(&document, &config, None)?;
    }

    Ok(())
}
