use serde::{Deserialize, Serialize};

/// Text extracted from a single PDF page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// 1-based page number in the source document.
    pub page_number: u32,
    /// Raw extracted text, not normalized.
    pub text: String,
    /// Character count of `text`.
    pub length: usize,
}

impl PageText {
    pub fn new(page_number: u32, text: impl Into<String>) -> Self {
        let text = text.into();
        let length = text.chars().count();
        Self {
            page_number,
            text,
            length,
        }
    }
}

/// Bounded, whitespace-normalized text forwarded to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Excerpt(String);

impl Excerpt {
    pub const NO_READABLE_TEXT: &'static str =
        "No readable text content found (possibly parsed as image).";

    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    pub fn no_readable_text() -> Self {
        Self(Self::NO_READABLE_TEXT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len_chars(&self) -> usize {
        self.0.chars().count()
    }

    /// False when the sampler fell back to the sentinel text.
    pub fn is_readable(&self) -> bool {
        self.0 != Self::NO_READABLE_TEXT
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Excerpt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
