//! On-disk record format.
//!
//! Field names follow the established history files so records written by
//! earlier tools keep loading.

use chrono::NaiveDateTime;
use scriptorium_core::{AcademicLevel, CitationStyle, Document};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File-name timestamp, also stored in the `timestamp` field.
pub const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Human-readable creation date stored in `date_created`.
pub const DATE_CREATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Stamp of the save that wrote this file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,

    #[serde(rename = "tema")]
    pub topic: String,

    #[serde(rename = "nivel_academico")]
    pub level: AcademicLevel,

    #[serde(rename = "estilo_referencia")]
    pub style: CitationStyle,

    #[serde(rename = "titulo")]
    pub title: String,

    #[serde(rename = "introducao")]
    pub introduction: String,

    #[serde(rename = "desenvolvimento")]
    pub body: String,

    #[serde(rename = "conclusao")]
    pub conclusion: String,

    #[serde(rename = "referencias")]
    pub references: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_filename: Option<String>,
}

impl DocumentRecord {
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: document.id.clone(),
            timestamp: None,
            date_created: document
                .created_at
                .map(|t| t.format(DATE_CREATED_FORMAT).to_string()),
            topic: document.topic.clone(),
            level: document.level,
            style: document.style,
            title: document.title.clone(),
            introduction: document.introduction.clone(),
            body: document.body.clone(),
            conclusion: document.conclusion.clone(),
            references: document.references.clone(),
            json_filename: None,
        }
    }

    /// Like [`from_document`](Self::from_document), but also restores the
    /// save stamp and file name from the record the document was loaded from.
    pub fn from_saved(document: &Document) -> Self {
        let mut record = Self::from_document(document);
        if let Some(name) = document
            .source_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
        {
            record.timestamp = crate::file_store::parse_file_name(&name).map(|(stamp, _, _)| stamp.to_string());
            record.json_filename = Some(name);
        }
        record
    }

    /// Creation time, from `date_created` or failing that `timestamp`.
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.date_created
            .as_deref()
            .and_then(|s| NaiveDateTime::parse_from_str(s.trim(), DATE_CREATED_FORMAT).ok())
            .or_else(|| {
                self.timestamp
                    .as_deref()
                    .and_then(|s| NaiveDateTime::parse_from_str(s.trim(), FILE_STAMP_FORMAT).ok())
            })
    }

    pub fn into_document(self, source_path: PathBuf) -> Document {
        let created_at = self.created_at();
        Document {
            id: self.id.filter(|id| !id.trim().is_empty()),
            topic: self.topic,
            level: self.level,
            style: self.style,
            title: self.title,
            introduction: self.introduction,
            body: self.body,
            conclusion: self.conclusion,
            references: self.references,
            created_at,
            source_path: Some(source_path),
        }
    }
}
