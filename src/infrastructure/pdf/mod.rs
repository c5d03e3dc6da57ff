use crate::domain::document::PageText;
use crate::domain::error::{AppError, Result};
use lopdf::Document;
use tracing::debug;

/// Only the leading pages of a document are considered for analysis.
pub const MAX_ANALYZED_PAGES: usize = 5;

pub struct PdfLoader {
    max_pages: usize,
}

impl Default for PdfLoader {
    fn default() -> Self {
        Self {
            max_pages: MAX_ANALYZED_PAGES,
        }
    }
}

impl PdfLoader {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Extracts text from the first pages of an in-memory PDF.
    ///
    /// A page whose text cannot be decoded still yields an (empty) entry so
    /// page positions stay aligned with the source document.
    pub fn load_pages(&self, bytes: &[u8]) -> Result<Vec<PageText>> {
        let document = Self::open(bytes)?;
        debug!(total_pages = document.get_pages().len(), max_pages = self.max_pages, "Loaded PDF");

        let pages = document
            .get_pages()
            .into_iter()
            .take(self.max_pages)
            .map(|(page_num, page_id)| {
                let text = match document.extract_text(&[page_num]) {
                    Ok(text) => join_fragments(&text),
                    Err(e) => {
                        debug!(page = page_num, object = ?page_id, error = %e, "No text extracted");
                        String::new()
                    }
                };
                PageText::new(page_num, text)
            })
            .collect();

        Ok(pages)
    }

    fn open(bytes: &[u8]) -> Result<Document> {
        if bytes.is_empty() {
            return Err(AppError::DocumentError("Empty PDF file".to_string()));
        }
        Document::load_mem(bytes)
            .map_err(|e| AppError::DocumentError(format!("Failed to parse PDF content: {}", e)))
    }
}

/// lopdf emits one line per text operation; join them into running text.
fn join_fragments(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
pub(crate) mod test_support {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Builds a PDF with one page per entry, each showing the given text.
    pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }
}
