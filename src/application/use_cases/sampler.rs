//! Page sampling for AI analysis.
//!
//! Builds a bounded excerpt from the first pages of a document: pages 1 and 2
//! are always included, plus the single densest page among the remaining ones.

use crate::domain::document::{Excerpt, PageText};

/// Upper bound on the excerpt forwarded to the model, in characters.
pub const MAX_EXCERPT_CHARS: usize = 4000;

/// Below this many characters the document is treated as having no text layer.
pub const MIN_READABLE_CHARS: usize = 50;

pub fn sample(pages: &[PageText]) -> Excerpt {
    let mut raw = String::new();

    if let Some(first) = pages.first() {
        push_block(&mut raw, "--- Page 1 ---", &first.text);
    }

    if let Some(second) = pages.get(1) {
        push_block(&mut raw, "--- Page 2 ---", &second.text);
    }

    if let Some(heavy) = content_heavy_page(pages) {
        let label = format!("--- Page {} (Content Heavy) ---", heavy.page_number);
        push_block(&mut raw, &label, &heavy.text);
    }

    let collapsed = collapse_whitespace(&raw);
    if collapsed.chars().count() < MIN_READABLE_CHARS {
        return Excerpt::no_readable_text();
    }

    Excerpt::new(truncate_chars(&collapsed, MAX_EXCERPT_CHARS))
}

/// Longest page outside the first two. Ties keep the earliest page.
fn content_heavy_page(pages: &[PageText]) -> Option<&PageText> {
    let mut best: Option<&PageText> = None;
    for page in pages.iter().skip(2) {
        match best {
            Some(current) if page.length <= current.length => {}
            _ => best = Some(page),
        }
    }
    best
}

fn push_block(out: &mut String, label: &str, text: &str) {
    out.push_str(label);
    out.push('\n');
    out.push_str(text);
    out.push_str("\n\n");
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
