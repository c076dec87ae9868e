//! `scriptorium onboard` — First-time setup.

use scriptorium_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = AppConfig::config_path();

    println!("📜 Scriptorium — First-Time Setup");
    println!("=================================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
    }

    let config = super::load_config()?;
    if !config.history_dir.exists() {
        std::fs::create_dir_all(&config.history_dir)?;
        println!("✅ Created history directory: {}", config.history_dir.display());
    }

    if !config.has_api_key() {
        println!("\n📝 Next steps:");
        println!("   1. Add your API key to {} or export GEMINI_API_KEY", config_path.display());
        println!("   2. Run: scriptorium generate --topic \"Your topic\"");
    }

    println!("\n🎉 Setup complete!\n");
    Ok(())
}
