//! Section editor: expand or rewrite one section of an existing document.
//!
//! The editor is stateless. It returns whole-section replacement text; the
//! caller writes it back with `Document::set_section` and saves a new record.

use scriptorium_core::{Document, Error, Result, Section};
use tracing::{info, warn};

use crate::client::ModelClient;
use crate::prompts;

/// Expected ratio between new and original length, in characters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthBand {
    pub min_ratio: f64,
    pub max_ratio: f64,
}

impl LengthBand {
    /// Roughly 50% longer.
    pub const EXPAND: LengthBand = LengthBand {
        min_ratio: 1.3,
        max_ratio: 1.8,
    };

    /// Same length, give or take 20%.
    pub const REWRITE: LengthBand = LengthBand {
        min_ratio: 0.8,
        max_ratio: 1.2,
    };

    pub fn contains(&self, original_chars: usize, new_chars: usize) -> bool {
        if original_chars == 0 {
            return true;
        }
        let ratio = new_chars as f64 / original_chars as f64;
        (self.min_ratio..=self.max_ratio).contains(&ratio)
    }
}

#[derive(Debug, Clone, Copy)]
enum EditKind {
    Expand,
    Rewrite,
}

impl EditKind {
    fn band(self) -> LengthBand {
        match self {
            Self::Expand => LengthBand::EXPAND,
            Self::Rewrite => LengthBand::REWRITE,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Expand => "expand",
            Self::Rewrite => "rewrite",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SectionEditor {
    client: ModelClient,
}

impl SectionEditor {
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }

    /// Ask for roughly 50% more text, preserving the section's claims.
    pub async fn expand(&self, section: Section, document: &Document) -> Result<String> {
        self.edit(EditKind::Expand, section, document).await
    }

    /// Ask for a same-length restructuring that preserves meaning.
    pub async fn rewrite(&self, section: Section, document: &Document) -> Result<String> {
        self.edit(EditKind::Rewrite, section, document).await
    }

    async fn edit(&self, kind: EditKind, section: Section, document: &Document) -> Result<String> {
        if !section.is_editable() {
            return Err(Error::InvalidInput(format!(
                "the {section} section cannot be edited"
            )));
        }

        let original = document.section(section);
        if original.trim().is_empty() {
            return Err(Error::InvalidInput(format!("the {section} section is empty")));
        }

        let language = self.client.language();
        let reply = match kind {
            EditKind::Expand => {
                let prompt = prompts::expand(section, original, document.level, language);
                self.client.generate(&prompt).await?
            }
            EditKind::Rewrite => {
                let prompt = prompts::rewrite(section, original, document.level, language);
                self.client.generate_creative(&prompt).await?
            }
        };
        let text = reply.trim().to_string();

        let before = original.chars().count();
        let after = text.chars().count();
        if !kind.band().contains(before, after) {
            warn!(
                edit = kind.name(),
                section = %section,
                before,
                after,
                "Edited section length outside the expected band"
            );
        }

        info!(edit = kind.name(), section = %section, before, after, "Section edited");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedProvider;
    use scriptorium_core::{AcademicLevel, CitationStyle};
    use std::sync::Arc;

    fn document() -> Document {
        let mut doc = Document::new("Climate policy", AcademicLevel::Graduate, CitationStyle::Apa);
        doc.title = "Pricing Carbon".into();
        doc.introduction = "Carbon pricing is a policy tool.".into();
        doc.body = "Body text.".into();
        doc.conclusion = "It works.".into();
        doc.references = "Stern, N. (2007).".into();
        doc
    }

    #[test]
    fn length_bands() {
        assert!(LengthBand::EXPAND.contains(100, 150));
        assert!(!LengthBand::EXPAND.contains(100, 110));
        assert!(!LengthBand::EXPAND.contains(100, 200));
        assert!(LengthBand::REWRITE.contains(100, 85));
        assert!(!LengthBand::REWRITE.contains(100, 130));
        assert!(LengthBand::REWRITE.contains(0, 10));
    }

    #[tokio::test]
    async fn expand_returns_trimmed_replacement() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            "  Carbon pricing is a policy tool with broad reach.  \n",
        ]));
        let editor = SectionEditor::new(ModelClient::new(provider.clone(), "m"));
        let doc = document();

        let text = editor.expand(Section::Introduction, &doc).await.unwrap();
        assert_eq!(text, "Carbon pricing is a policy tool with broad reach.");

        let prompt = &provider.prompts()[0];
        assert!(prompt.contains("Carbon pricing is a policy tool."));
        assert!(prompt.contains("Graduate"));
        assert!(prompt.contains("50%"));
    }

    #[tokio::test]
    async fn rewrite_uses_creative_temperature() {
        let provider = Arc::new(ScriptedProvider::new(vec!["It is effective."]));
        let client = ModelClient::new(provider.clone(), "m").with_temperatures(0.7, 0.9);
        let editor = SectionEditor::new(client);

        editor.rewrite(Section::Conclusion, &document()).await.unwrap();
        assert_eq!(provider.requests()[0].temperature, 0.9);
    }

    #[tokio::test]
    async fn references_not_editable() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let editor = SectionEditor::new(ModelClient::new(provider.clone(), "m"));

        let err = editor.expand(Section::References, &document()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_section_rejected() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let editor = SectionEditor::new(ModelClient::new(provider, "m"));
        let mut doc = document();
        doc.body.clear();

        assert!(editor.rewrite(Section::Body, &doc).await.is_err());
    }

    #[tokio::test]
    async fn out_of_band_reply_still_returned() {
        let provider = Arc::new(ScriptedProvider::new(vec!["Short."]));
        let editor = SectionEditor::new(ModelClient::new(provider, "m"));
        let text = editor.expand(Section::Body, &document()).await.unwrap();
        assert_eq!(text, "Short.");
    }
}
