//! `scriptorium expand` / `scriptorium rewrite` — Rework one section.

use scriptorium_core::{DocumentStore, Section};
use scriptorium_pipeline::SectionEditor;

#[derive(Debug, Clone, Copy)]
pub enum EditMode {
    Expand,
    Rewrite,
}

pub async fn run(key: &str, section: Section, mode: EditMode) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let store = super::open_store(&config);
    let mut document = store.load(key)?;

    let editor = SectionEditor::new(super::model_client(&config));
    let verb = match mode {
        EditMode::Expand => "Expanding",
        EditMode::Rewrite => "Rewriting",
    };
    println!("✍️  {verb} the {section} of \"{}\"…", document.title);

    let text = match mode {
        EditMode::Expand => editor.expand(section, &document).await,
        EditMode::Rewrite => editor.rewrite(section, &document).await,
    }
    .map_err(super::generation_failed)?;

    let before = document.section(section).chars().count();
    document.set_section(section, text);
    super::print_section(&document, section);

    let path = store.save(&mut document)?;
    println!(
        "\n💾 Saved as a new record: {} ({before} → {} characters)",
        path.display(),
        document.section(section).chars().count()
    );
    Ok(())
}
