//! `scriptorium doctor` — Diagnose configuration and provider access.

use scriptorium_config::AppConfig;
use scriptorium_core::DocumentStore;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Scriptorium Doctor — System Diagnostics");
    println!("==========================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_path();
    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!("  ⚠️  No config file — using defaults (run `scriptorium onboard`)");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid (provider: {}, model: {})", config.provider, config.model);
            config
        }
        Err(e) => {
            println!("  ❌ Config file invalid: {e}");
            println!("\n  ⚠️  1 issue(s) found. Fix the config and re-run.");
            return Ok(());
        }
    };

    let provider = scriptorium_providers::build_from_config(&config);
    if provider.has_credentials() {
        println!("  ✅ API key configured");
        match provider.health_check().await {
            Ok(true) => {
                println!("  ✅ Provider '{}' reachable", provider.name());
                match provider.list_models().await {
                    Ok(models) if models.is_empty() => {
                        println!("  ⚠️  Provider returned no model list; cannot confirm '{}'", config.model);
                    }
                    Ok(models) if offers_model(&models, &config.model) => {
                        println!("  ✅ Model '{}' available", config.model);
                    }
                    Ok(models) => {
                        println!(
                            "  ❌ Model '{}' not offered ({} model(s) listed)",
                            config.model,
                            models.len()
                        );
                        issues += 1;
                    }
                    Err(e) => println!("  ⚠️  Could not list models: {e}"),
                }
            }
            Ok(false) => {
                println!("  ❌ Provider '{}' rejected the request (check key and endpoint)", provider.name());
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Provider '{}' unreachable: {e}", provider.name());
                issues += 1;
            }
        }
    } else {
        println!("  ❌ No API key — set GEMINI_API_KEY or add api_key to config.toml");
        issues += 1;
    }

    if config.history_dir.exists() {
        let store = super::open_store(&config);
        match store.list_history() {
            Ok(entries) => println!(
                "  ✅ History directory {} ({} record(s))",
                config.history_dir.display(),
                entries.len()
            ),
            Err(e) => {
                println!("  ❌ History directory unreadable: {e}");
                issues += 1;
            }
        }
    } else {
        println!(
            "  ⚠️  History directory {} does not exist yet (created on first save)",
            config.history_dir.display()
        );
    }

    match &config.export.font_path {
        Some(path) if path.is_file() => println!("  ✅ PDF font: {}", path.display()),
        Some(path) => {
            println!("  ⚠️  PDF font {} not found — Helvetica will be used", path.display());
            issues += 1;
        }
        None => println!("  ✅ PDF font: built-in Helvetica (Latin-1 text only)"),
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

/// Whether `model` appears in a provider's model list, ignoring a `models/` prefix.
fn offers_model(models: &[String], model: &str) -> bool {
    let wanted = model.trim_start_matches("models/");
    models.iter().any(|m| m.trim_start_matches("models/") == wanted)
}
