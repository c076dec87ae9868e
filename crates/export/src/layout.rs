//! Layout planning: a document becomes positioned lines on A4 pages.
//!
//! Planning is independent of the PDF backend so the heading heuristics and
//! pagination can be checked without decoding any PDF.

use scriptorium_config::ExportConfig;
use scriptorium_core::{Document, Section};

use crate::error::ExportError;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// Body paragraphs shorter than this (in characters) may be sub-headings.
pub const SUBHEADING_MAX_CHARS: usize = 100;

const PT_TO_MM: f32 = 0.3528;

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em (Adobe AFM).
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 222, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Helvetica-Bold advance widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 278, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

/// Line height as a multiple of the font size in millimetres.
const LINE_SPACING: f32 = 1.45;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Title,
    Meta,
    Heading,
    Subheading,
    Paragraph,
    ListItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// A logical unit of text before wrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub role: Role,
    pub text: String,
}

impl Block {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self { role, text: text.into() }
    }
}

/// One drawn line, positioned from the bottom-left corner in millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub role: Role,
    pub size: f32,
    pub x: f32,
    pub y: f32,
}

impl Role {
    pub fn is_bold(self) -> bool {
        matches!(self, Role::Title | Role::Heading | Role::Subheading)
    }
}

impl Line {
    pub fn is_bold(&self) -> bool {
        self.role.is_bold()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<Line>,
}

/// Break a document into blocks in reading order.
pub fn plan(document: &Document) -> Vec<Block> {
    let mut blocks = vec![Block::new(Role::Title, document.title.trim())];

    blocks.push(Block::new(Role::Meta, format!("Topic: {}", document.topic)));
    blocks.push(Block::new(Role::Meta, format!("Academic level: {}", document.level)));
    blocks.push(Block::new(Role::Meta, format!("Citation style: {}", document.style)));
    if let Some(created) = document.created_at {
        blocks.push(Block::new(
            Role::Meta,
            format!("Created: {}", created.format("%Y-%m-%d %H:%M:%S")),
        ));
    }

    for section in Section::ALL {
        blocks.push(Block::new(Role::Heading, section.heading().to_uppercase()));
        let text = document.section(section);

        match section {
            Section::Body => {
                for paragraph in paragraphs(text) {
                    if is_subheading(paragraph) {
                        blocks.push(Block::new(Role::Subheading, strip_markup(paragraph)));
                    } else {
                        blocks.push(Block::new(Role::Paragraph, paragraph));
                    }
                }
            }
            Section::References => {
                for entry in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
                    blocks.push(Block::new(Role::ListItem, entry));
                }
            }
            Section::Introduction | Section::Conclusion => {
                for paragraph in paragraphs(text) {
                    blocks.push(Block::new(Role::Paragraph, paragraph));
                }
            }
        }
    }

    blocks
}

/// Short, unpunctuated body paragraphs read as section titles.
pub fn is_subheading(paragraph: &str) -> bool {
    let p = paragraph.trim();
    !p.is_empty() && p.chars().count() < SUBHEADING_MAX_CHARS && !p.ends_with('.')
}

fn paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split("\n\n").map(str::trim).filter(|p| !p.is_empty())
}

/// Drop Markdown heading and emphasis markers models like to add.
fn strip_markup(heading: &str) -> String {
    heading
        .trim()
        .trim_start_matches('#')
        .trim()
        .trim_matches('*')
        .trim()
        .to_string()
}

pub fn font_size(role: Role, style: &ExportConfig) -> f32 {
    match role {
        Role::Title => style.title_size,
        Role::Heading => style.heading_size,
        Role::Subheading => style.subheading_size,
        Role::Meta | Role::Paragraph | Role::ListItem => style.text_size,
    }
}

fn align(role: Role) -> Align {
    match role {
        Role::Title => Align::Center,
        _ => Align::Left,
    }
}

fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * LINE_SPACING
}

/// Vertical gap before a block, in millimetres.
fn space_before(role: Role, size: f32) -> f32 {
    match role {
        Role::Title | Role::Meta | Role::ListItem => 0.0,
        Role::Heading => line_height(size),
        Role::Subheading | Role::Paragraph => line_height(size) * 0.4,
    }
}

/// Advance width of one glyph in 1/1000 em.
///
/// Non-ASCII letters get a wide estimate; an embedded TTF is measured with
/// the same tables.
fn glyph_units(c: char, bold: bool) -> u32 {
    let table = if bold { &HELVETICA_BOLD_WIDTHS } else { &HELVETICA_WIDTHS };
    match c {
        ' '..='~' => u32::from(table[c as usize - 32]),
        'Æ' | 'Œ' => 1000,
        'æ' | 'œ' => 944,
        c if c.is_uppercase() => 778,
        _ => 611,
    }
}

fn units(text: &str, bold: bool) -> u32 {
    text.chars().map(|c| glyph_units(c, bold)).sum()
}

/// Width budget in 1/1000 em for `width` millimetres at `size` points.
fn unit_budget(size: f32, width: f32) -> u32 {
    (width / (size * PT_TO_MM) * 1000.0).floor() as u32
}

/// Rendered width of `text` in millimetres.
pub fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    units(text, bold) as f32 / 1000.0 * size * PT_TO_MM
}

/// Greedy word wrap to `width` millimetres. Words longer than a line are
/// split; explicit line breaks are kept.
pub fn wrap(text: &str, size: f32, bold: bool, width: f32) -> Vec<String> {
    let budget = unit_budget(size, width);
    let space = glyph_units(' ', bold);
    let mut lines = Vec::new();

    for raw_line in text.lines() {
        let mut current = String::new();
        let mut current_units = 0;

        for mut word in raw_line.split_whitespace() {
            let mut word_units = units(word, bold);

            while word_units > budget {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_units = 0;
                }
                let cut = fitting_prefix(word, bold, budget);
                lines.push(word[..cut].to_string());
                word = &word[cut..];
                word_units = units(word, bold);
            }
            if word.is_empty() {
                continue;
            }

            if !current.is_empty() && current_units + space + word_units > budget {
                lines.push(std::mem::take(&mut current));
                current_units = 0;
            }
            if !current.is_empty() {
                current.push(' ');
                current_units += space;
            }
            current.push_str(word);
            current_units += word_units;
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Byte length of the longest prefix of `word` within `budget`, at least one char.
fn fitting_prefix(word: &str, bold: bool, budget: u32) -> usize {
    let mut used = 0;
    let mut end = 0;
    for (i, c) in word.char_indices() {
        let w = glyph_units(c, bold);
        if end > 0 && used + w > budget {
            break;
        }
        used += w;
        end = i + c.len_utf8();
    }
    end
}

/// Wrap and paginate blocks.
///
/// `prepare` is applied to every block's text before measuring, so the
/// measured text is exactly what gets drawn.
pub fn lay_out(
    blocks: &[Block],
    style: &ExportConfig,
    prepare: impl Fn(&str) -> String,
) -> Result<Vec<Page>, ExportError> {
    let left = style.margin_left;
    let width = PAGE_WIDTH_MM - style.margin_left - style.margin_right;
    let top = PAGE_HEIGHT_MM - style.margin_top;
    let bottom = style.margin_bottom;

    if width <= 0.0 || top <= bottom {
        return Err(ExportError::Layout(format!(
            "margins leave no printable area ({width:.1} mm wide, {:.1} mm tall)",
            top - bottom
        )));
    }

    let mut pages = vec![Page::default()];
    let mut y = top;

    for block in blocks {
        let size = font_size(block.role, style);
        let height = line_height(size);
        if height > top - bottom {
            return Err(ExportError::Layout(format!(
                "font size {size} pt does not fit between the margins"
            )));
        }

        let text = prepare(&block.text);
        let text = match block.role {
            Role::ListItem => format!("- {text}"),
            _ => text,
        };

        let gap = space_before(block.role, size);
        if y < top {
            y -= gap;
        }

        let bold = block.role.is_bold();
        for wrapped in wrap(&text, size, bold, width) {
            if y - height < bottom {
                pages.push(Page::default());
                y = top;
            }
            y -= height;

            let x = match align(block.role) {
                Align::Left => left,
                Align::Center => left + ((width - text_width(&wrapped, size, bold)) / 2.0).max(0.0),
            };

            if let Some(page) = pages.last_mut() {
                page.lines.push(Line {
                    text: wrapped,
                    role: block.role,
                    size,
                    x,
                    y,
                });
            }
        }

        // Gap between the title and the metadata.
        if block.role == Role::Title {
            y -= height * 0.5;
        }
    }

    Ok(pages)
}
