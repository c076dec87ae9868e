//! Prompt templates for each generation and editing step.
//!
//! Every builder is a pure function of its inputs, so identical inputs
//! always produce identical prompts.

use scriptorium_core::{AcademicLevel, CitationStyle, Section};

/// Body characters forwarded to the conclusion prompt.
pub const CONCLUSION_BODY_CHARS: usize = 1000;

/// Body characters forwarded to the references prompt.
pub const REFERENCES_BODY_CHARS: usize = 2000;

/// Keep the first `max` characters, appending `...` when anything was cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

fn level_guidance(level: AcademicLevel) -> String {
    let (min, max) = level.body_sections();
    format!("{} level ({min}-{max} sections in the body)", level.label())
}

pub fn title(topic: &str, level: AcademicLevel, language: &str) -> String {
    format!(
        "Create an engaging, professional academic title for a {level} level paper on the topic: \"{topic}\".
The title must be clear, concise and reflect the expected academic content.
Write it in {language}.
Return only the title, without quotes or any additional formatting.",
        level = level.label(),
    )
}

pub fn introduction(topic: &str, level: AcademicLevel, title: &str, language: &str) -> String {
    format!(
        "Write an academic introduction for a {level_label} level paper titled \"{title}\" on the topic \"{topic}\".

The introduction must:
1. Set the context of the topic and its academic relevance
2. Briefly present the problem or question addressed
3. State the objective of the paper
4. Briefly mention the methodology or approach used
5. Outline the structure of the paper

Write {paragraphs} paragraphs; more advanced levels call for a more elaborate introduction.
Use formal academic language appropriate for the {level_label} level.
Write in {language}.",
        level_label = level.label(),
        paragraphs = level.introduction_paragraphs(),
    )
}

pub fn body(
    topic: &str,
    level: AcademicLevel,
    title: &str,
    introduction: &str,
    style: CitationStyle,
    language: &str,
) -> String {
    let (min_sections, max_sections) = level.body_sections();
    format!(
        "Write the complete body of a {level_label} level academic paper titled \"{title}\" on the topic \"{topic}\".

Keep it coherent with the following introduction:

{introduction}

The body must:
1. Be divided into sections with clear, relevant subtitles
2. Present a theoretical review of the topic
3. Discuss different perspectives and approaches to the subject
4. Include at least 5 citations of relevant authors in {style} format
5. Have a depth suited to the academic level ({level_label})
6. Present well-founded arguments and critical analysis

Write {min_sections} to {max_sections} sections, each subtitle on its own line followed by a blank line.
Use formal academic language appropriate for the specified level.
Include citations in {style} format throughout the text.
Write in {language}.",
        level_label = level.label(),
        style = style.label(),
    )
}

pub fn conclusion(
    topic: &str,
    level: AcademicLevel,
    title: &str,
    body: &str,
    language: &str,
) -> String {
    format!(
        "Write an academic conclusion for a {level_label} level paper titled \"{title}\" on the topic \"{topic}\".

Keep it coherent with the following opening of the body:

{excerpt}

The conclusion must:
1. Briefly revisit the main points discussed in the paper
2. Present the conclusions drawn from the analysis
3. Highlight the relevance and implications of the results
4. Suggest possible further developments or future research

Write {paragraphs} paragraphs; more advanced levels call for a more elaborate conclusion.
Use formal academic language appropriate for the specified level.
Do not introduce new information or citations in the conclusion.
Write in {language}.",
        level_label = level.label(),
        excerpt = truncate_chars(body, CONCLUSION_BODY_CHARS),
        paragraphs = level.conclusion_paragraphs(),
    )
}

pub fn references(
    topic: &str,
    level: AcademicLevel,
    body: &str,
    style: CitationStyle,
    language: &str,
) -> String {
    let (min, max) = level.reference_count();
    format!(
        "Create a list of real, relevant bibliographic references for a {level_label} level academic paper on the topic \"{topic}\".

Use the following body of the paper to identify the authors and works cited:

{excerpt}

The references must:
1. Strictly follow the {style} format
2. Include every work cited in the body
3. Add other relevant references to complement them ({min} to {max} references in total)
4. Be sorted in alphabetical order
5. Include only real, verifiable works (books, articles, academic websites)
6. Cover a diversity of source types (books, articles, websites, etc.)

Put each reference on its own line, with no numbering, bullets or commentary.
Format the references strictly according to the {style} standard.
Keep titles in their original language; write any descriptive text in {language}.",
        level_label = level.label(),
        excerpt = truncate_chars(body, REFERENCES_BODY_CHARS),
        style = style.label(),
    )
}

pub fn expand(section: Section, text: &str, level: AcademicLevel, language: &str) -> String {
    format!(
        "Expand and enrich the following {section} section of a {level_label} level academic paper:

{text}

The expansion must:
1. Stay coherent with the original content
2. Add more details, examples and explanations
3. Deepen the analysis and argumentation
4. Keep the academic style and tone appropriate for the {level_label} level
5. Increase the length of the original text by approximately 50%

Return the complete expanded section, not only the added passages.
Write in {language}.",
        section = section.heading(),
        level_label = level.label(),
    )
}

pub fn rewrite(section: Section, text: &str, level: AcademicLevel, language: &str) -> String {
    format!(
        "Rewrite the following {section} section of a {level_label} level academic paper, keeping the same main ideas but with a different approach and structure:

{text}

The rewrite must:
1. Keep the same main ideas and arguments
2. Use a different paragraph structure
3. Use synonyms and alternative sentence constructions
4. Keep the level of formality appropriate for the {level_label} level
5. Have approximately the same length as the original text

Return the complete rewritten section.
Write in {language}.",
        section = section.heading(),
        level_label = level.label(),
    )
}
