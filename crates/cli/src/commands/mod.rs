pub mod doctor;
pub mod edit;
pub mod export;
pub mod generate;
pub mod history;
pub mod onboard;
pub mod show;

use scriptorium_config::AppConfig;
use scriptorium_core::{Document, Section};
use scriptorium_pipeline::ModelClient;
use scriptorium_store::FileStore;

pub(crate) fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

pub(crate) fn open_store(config: &AppConfig) -> FileStore {
    FileStore::new(config.history_dir.clone())
}

pub(crate) fn model_client(config: &AppConfig) -> ModelClient {
    let provider = scriptorium_providers::build_from_config(config);
    ModelClient::from_config(provider, config)
}

/// Turn a pipeline error into the command's error, printing setup help when
/// the failure is a missing key.
pub(crate) fn generation_failed(e: scriptorium_core::Error) -> Box<dyn std::error::Error> {
    if e.is_configuration() {
        eprintln!("🔑 No usable API key is configured.");
        eprintln!("   Set GEMINI_API_KEY (or SCRIPTORIUM_API_KEY) in the environment or a .env file,");
        eprintln!("   or add api_key to {}", AppConfig::config_path().display());
        eprintln!("   Run `scriptorium doctor` to check your setup.");
    }
    Box::new(e)
}

pub(crate) fn print_document(document: &Document) {
    println!("📄 {}", document.title);
    println!("{}", "=".repeat(document.title.chars().count().clamp(10, 80)));
    print_metadata(document);

    for section in Section::ALL {
        print_section(document, section);
    }
}

pub(crate) fn print_metadata(document: &Document) {
    println!("  Topic:  {}", document.topic);
    println!("  Level:  {}", document.level);
    println!("  Style:  {}", document.style);
    println!("  Id:     {}", document.display_id());
    if let Some(created) = document.created_at {
        println!("  Date:   {}", created.format("%Y-%m-%d %H:%M:%S"));
    }
}

pub(crate) fn print_section(document: &Document, section: Section) {
    println!();
    println!("── {} ──", section.heading().to_uppercase());
    println!();
    println!("{}", document.section(section));
}
