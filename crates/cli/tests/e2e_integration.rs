//! End-to-end integration tests for Scriptorium.
//!
//! These tests exercise the full path from a topic to a saved, edited and
//! exported essay, with a scripted provider standing in for the model.

use std::sync::{Arc, Mutex};

use scriptorium_config::ExportConfig;
use scriptorium_core::error::ProviderError;
use scriptorium_core::provider::{Provider, ProviderRequest, ProviderResponse};
use scriptorium_core::{AcademicLevel, CitationStyle, DocumentStore, Error, Section, StoreError};
use scriptorium_pipeline::{Assembler, ModelClient, SectionEditor};
use scriptorium_store::FileStore;
use tempfile::TempDir;

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted replies in sequence.
struct ScriptedProvider {
    replies: Vec<Result<String, ProviderError>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn new(replies: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            replies,
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn text(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut prompts = self.prompts.lock().unwrap();
        let index = prompts.len();
        prompts.push(request.prompt);
        let reply = self
            .replies
            .get(index)
            .unwrap_or_else(|| panic!("ScriptedProvider exhausted: call #{index}, have {}", self.replies.len()));
        reply.clone().map(|text| ProviderResponse {
            text,
            usage: None,
            model: request.model,
        })
    }
}

const TITLE: &str = "\"Carbon Pricing and the Politics of Climate Policy\"";
const INTRODUCTION: &str = "Climate policy has moved to the centre of economic debate.\n\nThis paper examines carbon pricing as its main instrument.";
const BODY: &str = "Theoretical Foundations\n\nPigou (1920) proposed taxing activities whose social cost exceeds their private cost.\n\nMarket-Based Instruments\n\nEmissions trading schemes cap total emissions and let firms trade allowances (Stavins, 2008).\n\nDistributional Concerns\n\nRevenue recycling can offset regressive effects on households (Klenert et al., 2018).";
const CONCLUSION: &str = "Carbon pricing is effective when paired with attention to distributional effects.";
const REFERENCES: &str = "Aldy, J. E., & Stavins, R. N. (2012). The promise and problems of pricing carbon. Journal of Environment & Development, 21(2), 152-180.
Baranzini, A., et al. (2017). Carbon pricing in climate policy: Seven reasons, complementary instruments, and political economy considerations. WIREs Climate Change, 8(4).
Boyce, J. K. (2018). Carbon pricing: Effectiveness and equity. Ecological Economics, 150, 52-61.

Goulder, L. H., & Schein, A. R. (2013). Carbon taxes versus cap and trade: A critical review. Climate Change Economics, 4(3).
Klenert, D., et al. (2018). Making carbon pricing work for citizens. Nature Climate Change, 8, 669-677.
Metcalf, G. E. (2019). Paying for pollution: Why a carbon tax is good for America. Oxford University Press.
Nordhaus, W. (2013). The climate casino. Yale University Press.
Pigou, A. C. (1920). The economics of welfare. Macmillan.
Stavins, R. N. (2008). Addressing climate change with a comprehensive US cap-and-trade system. Oxford Review of Economic Policy, 24(2), 298-321.
Stern, N. (2007). The economics of climate change: The Stern review. Cambridge University Press.
Weitzman, M. L. (2014). Can negotiating a uniform carbon price help to internalize the global warming externality? Journal of the AERE, 1(1/2), 29-49.";

fn full_script() -> Vec<&'static str> {
    vec![TITLE, INTRODUCTION, BODY, CONCLUSION, REFERENCES]
}

// ── Scenarios ────────────────────────────────────────────────────────────

#[tokio::test]
async fn generate_save_edit_export() {
    let dir = TempDir::new().unwrap();
    let expanded_intro = format!("{INTRODUCTION} It also reviews the evidence on market instruments.");
    let mut script: Vec<&str> = full_script();
    script.push(expanded_intro.as_str());

    let provider = Arc::new(ScriptedProvider::text(&script));
    let client = ModelClient::new(provider.clone(), "mock-model");

    // Generate
    let mut document = Assembler::new(client.clone())
        .assemble("Climate policy", AcademicLevel::Undergraduate, CitationStyle::Apa)
        .await
        .unwrap();
    assert_eq!(document.title, "Carbon Pricing and the Politics of Climate Policy");
    let entries = document.references.lines().count();
    assert!((10..=12).contains(&entries), "got {entries} references");

    // Save and reload
    let store = FileStore::new(dir.path());
    let first_path = store.save(&mut document).unwrap();
    let loaded = store.load(first_path.to_str().unwrap()).unwrap();
    assert_eq!(loaded.body, document.body);
    assert_eq!(loaded.id, document.id);

    // Expand and re-save as a new record
    let mut edited = loaded.clone();
    let text = SectionEditor::new(client)
        .expand(Section::Introduction, &edited)
        .await
        .unwrap();
    edited.set_section(Section::Introduction, text);
    let second_path = store.save(&mut edited).unwrap();

    assert_ne!(first_path, second_path);
    assert_eq!(edited.id, document.id);
    assert_eq!(provider.calls(), 6);

    let history = store.list_history().unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|h| h.id == document.id));

    // The original record is untouched
    assert_eq!(
        store.load(first_path.to_str().unwrap()).unwrap().introduction,
        INTRODUCTION
    );

    // Export
    let result = scriptorium_export::render(&edited, &ExportConfig::default());
    assert!(!result.is_degraded(), "{:?}", result.reason());
    let pdf_path = dir
        .path()
        .join(scriptorium_export::export_filename(&edited, chrono::Local::now().naive_local()));
    scriptorium_export::write_pdf(&pdf_path, &result).unwrap();
    assert!(std::fs::read(&pdf_path).unwrap().starts_with(b"%PDF"));
    assert!(pdf_path
        .to_str()
        .unwrap()
        .ends_with(&format!("_{}.pdf", edited.id.as_deref().unwrap())));
}

#[tokio::test]
async fn failing_model_produces_nothing_to_save() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        Ok("A Title".into()),
        Ok("An introduction.".into()),
        Err(ProviderError::Network("connection reset".into())),
    ]));
    let client = ModelClient::new(provider.clone(), "mock-model");

    let err = Assembler::new(client)
        .assemble("Climate policy", AcademicLevel::Graduate, CitationStyle::Abnt)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Provider(ProviderError::Network(_))));
    assert!(!err.is_configuration());
    assert_eq!(provider.calls(), 3);
}

#[tokio::test]
async fn history_survives_a_corrupt_record() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(ScriptedProvider::text(&full_script()));
    let client = ModelClient::new(provider, "mock-model");

    let mut document = Assembler::new(client)
        .assemble("Climate policy", AcademicLevel::Secondary, CitationStyle::Apa)
        .await
        .unwrap();
    let store = FileStore::new(dir.path());
    store.save(&mut document).unwrap();
    std::fs::write(dir.path().join("20200101_000000_broken.json"), "{\"tema\": ").unwrap();

    let history = store.list_history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].title, document.title);

    assert!(matches!(
        store.load("20200101_000000_broken.json"),
        Err(StoreError::CorruptRecord { .. })
    ));
    assert!(matches!(store.load("missing-key"), Err(StoreError::NotFound { .. })));
}
