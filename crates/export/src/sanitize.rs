//! Latin-1 folding for the built-in PDF fonts.
//!
//! The standard Type 1 fonts only cover a single-byte encoding. Common
//! typographic characters are mapped to ASCII look-alikes; anything else
//! outside Latin-1 is dropped.

/// Fold `text` into characters the built-in fonts can draw.
pub fn fold_latin1(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2010}'..='\u{2015}' | '\u{2212}' => out.push('-'),
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2026}' => out.push_str("..."),
            '\u{2022}' => out.push('-'),
            '\u{00A0}' | '\u{2002}'..='\u{2009}' | '\u{202F}' => out.push(' '),
            '\u{200B}'..='\u{200D}' | '\u{FEFF}' => {}
            '\t' => out.push(' '),
            c if (c as u32) <= 0xFF && !c.is_control() => out.push(c),
            _ => {}
        }
    }
    out
}
