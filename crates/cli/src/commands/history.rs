//! `scriptorium history` — List saved essays.

use scriptorium_core::{DocumentStore, HistoryEntry};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let entries = super::open_store(&config).list_history()?;

    println!("📚 Saved essays ({})", config.history_dir.display());
    println!("=============\n");

    if entries.is_empty() {
        println!("   No essays yet. Run `scriptorium generate --topic \"...\"` to create one.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", format_entry(entry));
    }
    println!("\n  {} record(s). Pass a file name or id to `show`, `expand`, `rewrite` or `export`.", entries.len());
    Ok(())
}

fn format_entry(entry: &HistoryEntry) -> String {
    let date = entry
        .created_at
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "(undated)       ".into());
    let file = entry
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    format!(
        "  {date}  {title}\n                    {topic} · {level} · {style}\n                    {file}",
        title = entry.title,
        topic = entry.topic,
        level = entry.level,
        style = entry.style,
    )
}
