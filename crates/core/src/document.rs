//! Document domain types.
//!
//! A [`Document`] is one academic work: a title plus four text sections and
//! the metadata that shaped them. The pipeline fills it in order, the store
//! assigns its identity, the exporter renders it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::Error;

/// Target rigor of the work. Controls length and depth instructions.
///
/// Persisted with the labels of the original record format; the English
/// names are accepted when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AcademicLevel {
    #[serde(rename = "Ensino Médio", alias = "Secondary")]
    Secondary,
    #[serde(rename = "Graduação", alias = "Undergraduate")]
    Undergraduate,
    #[serde(rename = "Pós-Graduação", alias = "Graduate")]
    Graduate,
}

impl AcademicLevel {
    pub const ALL: [AcademicLevel; 3] = [Self::Secondary, Self::Undergraduate, Self::Graduate];

    /// Human-readable name used in prompts and exports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Secondary => "Secondary",
            Self::Undergraduate => "Undergraduate",
            Self::Graduate => "Graduate",
        }
    }

    /// Inclusive bounds on bibliography size.
    pub fn reference_count(&self) -> (u8, u8) {
        match self {
            Self::Secondary => (8, 10),
            Self::Undergraduate => (10, 12),
            Self::Graduate => (12, 15),
        }
    }

    /// Inclusive bounds on the number of body sections.
    pub fn body_sections(&self) -> (u8, u8) {
        match self {
            Self::Secondary => (3, 4),
            Self::Undergraduate => (4, 5),
            Self::Graduate => (5, 6),
        }
    }

    pub fn introduction_paragraphs(&self) -> u8 {
        match self {
            Self::Secondary => 3,
            Self::Undergraduate => 4,
            Self::Graduate => 5,
        }
    }

    pub fn conclusion_paragraphs(&self) -> u8 {
        match self {
            Self::Secondary => 2,
            Self::Undergraduate => 3,
            Self::Graduate => 4,
        }
    }
}

impl std::fmt::Display for AcademicLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AcademicLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "secondary" | "high-school" | "high school" | "ensino médio" | "ensino medio" => {
                Ok(Self::Secondary)
            }
            "undergraduate" | "graduação" | "graduacao" => Ok(Self::Undergraduate),
            "graduate" | "postgraduate" | "pós-graduação" | "pos-graduacao" => Ok(Self::Graduate),
            other => Err(Error::InvalidInput(format!(
                "unknown academic level '{other}' (expected secondary, undergraduate or graduate)"
            ))),
        }
    }
}

/// Bibliographic format requested in prompts. Conformance is requested,
/// never validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CitationStyle {
    #[serde(rename = "APA")]
    Apa,
    #[serde(rename = "ABNT")]
    Abnt,
}

impl CitationStyle {
    pub const ALL: [CitationStyle; 2] = [Self::Apa, Self::Abnt];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Apa => "APA",
            Self::Abnt => "ABNT",
        }
    }
}

impl std::fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CitationStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "apa" => Ok(Self::Apa),
            "abnt" => Ok(Self::Abnt),
            other => Err(Error::InvalidInput(format!(
                "unknown citation style '{other}' (expected apa or abnt)"
            ))),
        }
    }
}

/// One of the four text sections that follow the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Introduction,
    Body,
    Conclusion,
    References,
}

impl Section {
    /// Rendering order.
    pub const ALL: [Section; 4] = [
        Self::Introduction,
        Self::Body,
        Self::Conclusion,
        Self::References,
    ];

    pub fn heading(&self) -> &'static str {
        match self {
            Self::Introduction => "Introduction",
            Self::Body => "Body",
            Self::Conclusion => "Conclusion",
            Self::References => "References",
        }
    }

    /// Only the free-text sections can be expanded or rewritten.
    pub fn is_editable(&self) -> bool {
        !matches!(self, Self::References)
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.heading())
    }
}

impl FromStr for Section {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "introduction" | "intro" | "introducao" | "introdução" => Ok(Self::Introduction),
            "body" | "development" | "desenvolvimento" => Ok(Self::Body),
            "conclusion" | "conclusao" | "conclusão" => Ok(Self::Conclusion),
            "references" | "referencias" | "referências" => Ok(Self::References),
            other => Err(Error::InvalidInput(format!("unknown section '{other}'"))),
        }
    }
}

/// An academic work, generated section by section.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Assigned by the store on first save; `None` while only in memory.
    pub id: Option<String>,

    pub topic: String,
    pub level: AcademicLevel,
    pub style: CitationStyle,

    pub title: String,
    pub introduction: String,
    pub body: String,
    pub conclusion: String,
    pub references: String,

    /// Fixed at first save.
    pub created_at: Option<NaiveDateTime>,

    /// Location of the record this document was last saved to or loaded from.
    pub source_path: Option<PathBuf>,
}

impl Document {
    /// An empty, unsaved document. Level and style are fixed from here on.
    pub fn new(topic: impl Into<String>, level: AcademicLevel, style: CitationStyle) -> Self {
        Self {
            id: None,
            topic: topic.into(),
            level,
            style,
            title: String::new(),
            introduction: String::new(),
            body: String::new(),
            conclusion: String::new(),
            references: String::new(),
            created_at: None,
            source_path: None,
        }
    }

    pub fn section(&self, section: Section) -> &str {
        match section {
            Section::Introduction => &self.introduction,
            Section::Body => &self.body,
            Section::Conclusion => &self.conclusion,
            Section::References => &self.references,
        }
    }

    /// Replace a section's text wholesale.
    pub fn set_section(&mut self, section: Section, text: impl Into<String>) {
        let text = text.into();
        match section {
            Section::Introduction => self.introduction = text,
            Section::Body => self.body = text,
            Section::Conclusion => self.conclusion = text,
            Section::References => self.references = text,
        }
    }

    /// All five generated fields are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && Section::ALL.iter().all(|s| !self.section(*s).trim().is_empty())
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// The id, or `"novo"` for a document that was never saved.
    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or("novo")
    }
}
