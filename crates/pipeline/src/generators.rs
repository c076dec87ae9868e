//! The five section generators.
//!
//! Each builds its prompt, calls the model once and trims the reply. Model
//! failures propagate unchanged; there is no fallback text.

use scriptorium_core::{AcademicLevel, CitationStyle, Result};

use crate::client::ModelClient;
use crate::prompts;

/// Never part of a title at either end.
const WRAPPER_CHARS: &[char] = &['"', '“', '”', '«', '»', '*'];

/// Single-quote pairs; these double as apostrophes so only a matched pair is removed.
const SINGLE_QUOTE_PAIRS: &[(char, char)] = &[('\'', '\''), ('‘', '’')];

pub async fn generate_title(client: &ModelClient, topic: &str, level: AcademicLevel) -> Result<String> {
    let prompt = prompts::title(topic, level, client.language());
    let reply = client.generate(&prompt).await?;
    Ok(clean_title(&reply))
}

pub async fn generate_introduction(
    client: &ModelClient,
    topic: &str,
    level: AcademicLevel,
    title: &str,
) -> Result<String> {
    let prompt = prompts::introduction(topic, level, title, client.language());
    Ok(client.generate(&prompt).await?.trim().to_string())
}

pub async fn generate_body(
    client: &ModelClient,
    topic: &str,
    level: AcademicLevel,
    title: &str,
    introduction: &str,
    style: CitationStyle,
) -> Result<String> {
    let prompt = prompts::body(topic, level, title, introduction, style, client.language());
    Ok(client.generate(&prompt).await?.trim().to_string())
}

pub async fn generate_conclusion(
    client: &ModelClient,
    topic: &str,
    level: AcademicLevel,
    title: &str,
    body: &str,
) -> Result<String> {
    let prompt = prompts::conclusion(topic, level, title, body, client.language());
    Ok(client.generate(&prompt).await?.trim().to_string())
}

pub async fn generate_references(
    client: &ModelClient,
    topic: &str,
    level: AcademicLevel,
    body: &str,
    style: CitationStyle,
) -> Result<String> {
    let prompt = prompts::references(topic, level, body, style, client.language());
    let reply = client.generate(&prompt).await?;
    Ok(normalize_references(&reply))
}

/// First real line of the reply, without wrapping quotes or emphasis markers.
///
/// A leading label line such as `Title:` is skipped.
fn clean_title(reply: &str) -> String {
    let mut lines = reply.lines().map(str::trim).filter(|l| !l.is_empty());
    let mut line = lines.next().unwrap_or_default();
    if line.ends_with(':') {
        if let Some(next) = lines.next() {
            line = next;
        }
    }

    let mut title = line.trim_matches(WRAPPER_CHARS).trim();
    for &(open, close) in SINGLE_QUOTE_PAIRS {
        if let Some(inner) = title
            .strip_prefix(open)
            .and_then(|t| t.strip_suffix(close))
        {
            title = inner.trim_matches(WRAPPER_CHARS).trim();
            break;
        }
    }
    title.to_string()
}

/// One entry per line, blank lines removed.
fn normalize_references(reply: &str) -> String {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
