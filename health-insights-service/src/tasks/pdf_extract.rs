use lopdf::Document;
use tracing::{info, warn};

use crate::error::{ApiError, DocumentError};
use crate::llm::{GenerationParams, LlmError, LlmGateway};

/// Concatenate the text of every page in page order.
///
/// A page whose text cannot be extracted contributes an empty string; only a
/// buffer that cannot be opened as a PDF at all is an error.
pub fn extract_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let document =
        Document::load_mem(bytes).map_err(|e| DocumentError::Unreadable(e.to_string()))?;

    // get_pages is keyed by page number, so iteration is in document order
    let pages = document.get_pages();
    let mut text = String::new();
    for page_number in pages.keys() {
        match document.extract_text(&[*page_number]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => {
                warn!(page = page_number, error = %e, "Failed to extract text from page");
            }
        }
    }

    info!(
        pages = pages.len(),
        characters = text.len(),
        "Extracted text from PDF"
    );
    Ok(text)
}

/// Run [`extract_text`] off the async runtime; PDF parsing is CPU bound.
pub async fn extract_text_blocking(bytes: Vec<u8>) -> Result<String, ApiError> {
    let text = tokio::task::spawn_blocking(move || extract_text(&bytes))
        .await
        .map_err(|e| ApiError::Unhandled(format!("PDF extraction task failed: {}", e)))??;
    Ok(text)
}

fn translation_instruction(language: Option<&str>) -> String {
    let target = match language {
        Some(language) if !language.trim().is_empty() => language.trim(),
        _ => "the document's original language",
    };

    format!(
        "You are a medical document assistant. The text below was extracted from a PDF medical report \
        and may contain broken lines, repeated headers and stray characters. \
        Rewrite it as a clean, well-structured report in {}, preserving every value, unit, date and \
        medical term exactly. Use clear section headers and bullet points where the original has lists. \
        Return only the formatted report without any commentary.",
        target
    )
}

/// Format and translate extracted PDF text into `language`.
pub async fn translate_document(
    gateway: &dyn LlmGateway,
    params: &GenerationParams,
    text: &str,
    language: Option<&str>,
) -> Result<String, LlmError> {
    let instruction = translation_instruction(language);
    gateway.prompt(&instruction, text, params).await
}

#[cfg(test)]
pub(crate) mod test_support {
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    /// Build an in-memory PDF with one page per entry; `None` is a page with no content stream.
    pub fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
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

        let mut kids = Vec::new();
        for page in pages {
            let mut page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            };
            if let Some(text) = page {
                let content = Content {
                    operations: vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 24.into()]),
                        Operation::new("Td", vec![100.into(), 600.into()]),
                        Operation::new("Tj", vec![Object::string_literal(*text)]),
                        Operation::new("ET", vec![]),
                    ],
                };
                let content_id =
                    doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
                page_dict.set("Contents", content_id);
            }
            kids.push(Object::from(doc.add_object(page_dict)));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
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

#[cfg(test)]
mod tests {
    use super::test_support::build_pdf;
    use super::*;
    use crate::llm::testing::FakeGateway;
    use lopdf::Object;

    #[test]
    fn pages_are_concatenated_in_order() {
        let bytes = build_pdf(&[Some("Hemoglobin"), Some("Cholesterol"), Some("Glucose")]);
        let text = extract_text(&bytes).unwrap();

        let first = text.find("Hemoglobin").unwrap();
        let second = text.find("Cholesterol").unwrap();
        let third = text.find("Glucose").unwrap();
        assert!(first < second && second < third, "unexpected order: {:?}", text);
    }

    #[test]
    fn blank_page_contributes_nothing() {
        let with_blank = extract_text(&build_pdf(&[Some("Alpha"), None, Some("Omega")])).unwrap();
        let without_blank = extract_text(&build_pdf(&[Some("Alpha"), Some("Omega")])).unwrap();
        assert_eq!(with_blank, without_blank);
    }

    #[test]
    fn document_without_text_extracts_to_empty_string() {
        let text = extract_text(&build_pdf(&[None, None])).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn page_with_dangling_contents_is_skipped() {
        let bytes = build_pdf(&[Some("Good"), None]);
        let mut doc = Document::load_mem(&bytes).unwrap();
        let broken_page = *doc.get_pages().get(&2).unwrap();
        doc.get_object_mut(broken_page)
            .and_then(Object::as_dict_mut)
            .unwrap()
            .set("Contents", Object::Reference((999, 0)));
        let mut broken = Vec::new();
        doc.save_to(&mut broken).unwrap();

        let text = extract_text(&broken).unwrap();
        assert!(text.contains("Good"), "good page lost: {:?}", text);
        assert_eq!(text.trim(), "Good");
    }

    #[test]
    fn non_pdf_bytes_are_unreadable() {
        let err = extract_text(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, DocumentError::Unreadable(_)));
    }

    #[tokio::test]
    async fn blocking_extraction_maps_parse_failures_to_document_errors() {
        let err = extract_text_blocking(Vec::new()).await.unwrap_err();
        assert!(matches!(err, ApiError::Document(DocumentError::Unreadable(_))));
    }

    #[tokio::test]
    async fn translation_names_target_language_and_carries_text() {
        let gateway = FakeGateway::replying("formatted");
        let output = translate_document(
            &gateway,
            &GenerationParams::default(),
            "raw report",
            Some("French"),
        )
        .await
        .unwrap();
        assert_eq!(output, "formatted");

        let calls = gateway.calls();
        let prompt = &calls[0][0].content;
        assert!(prompt.contains("in French"));
        assert!(prompt.ends_with("\n\nraw report"));
    }

    #[test]
    fn missing_language_keeps_original_language() {
        assert!(translation_instruction(None).contains("the document's original language"));
        assert!(translation_instruction(Some("  ")).contains("the document's original language"));
    }
}
