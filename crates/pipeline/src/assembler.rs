//! Document assembly: the five generators in fixed order.

use scriptorium_core::{AcademicLevel, CitationStyle, Document, Error, Result};
use tracing::{debug, info};

use crate::client::ModelClient;
use crate::generators;

/// Runs title → introduction → body → conclusion → references, threading
/// each output into the next prompt.
#[derive(Debug, Clone)]
pub struct Assembler {
    client: ModelClient,
}

impl Assembler {
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }

    /// Build a complete, unsaved document.
    ///
    /// Stops at the first failing stage; nothing partial is returned.
    pub async fn assemble(
        &self,
        topic: &str,
        level: AcademicLevel,
        style: CitationStyle,
    ) -> Result<Document> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(Error::InvalidInput("topic must not be empty".into()));
        }

        info!(topic, level = %level, style = %style, "Generating document");
        let client = &self.client;
        let mut document = Document::new(topic, level, style);

        document.title = generators::generate_title(client, topic, level).await?;
        debug!(title = %document.title, "Title ready");

        document.introduction =
            generators::generate_introduction(client, topic, level, &document.title).await?;
        debug!(chars = document.introduction.len(), "Introduction ready");

        document.body = generators::generate_body(
            client,
            topic,
            level,
            &document.title,
            &document.introduction,
            style,
        )
        .await?;
        debug!(chars = document.body.len(), "Body ready");

        document.conclusion =
            generators::generate_conclusion(client, topic, level, &document.title, &document.body)
                .await?;
        debug!(chars = document.conclusion.len(), "Conclusion ready");

        document.references =
            generators::generate_references(client, topic, level, &document.body, style).await?;
        debug!(entries = document.references.lines().count(), "References ready");

        info!(title = %document.title, "Document generated");
        Ok(document)
    }
}
