//! Text extraction for uploaded documents.
//!
//! PDFs are parsed with `lopdf` and read page by page in document order;
//! plain-text uploads are decoded strictly as UTF-8.

use lopdf::Document;
use tracing::{debug, warn};

use crate::domain::{ExtractedText, MediaType, UploadedDocument};

/// Errors that can occur while turning an upload into text.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Unsupported document format: {0}. Upload a .txt or .pdf file.")]
    UnsupportedFormat(String),

    #[error("Could not parse the document: {0}")]
    Parse(String),
}

/// Resolves the declared type of an upload.
///
/// An explicit `text/plain` or `application/pdf` content type wins. A missing or
/// generic `application/octet-stream` type falls back to the file extension.
pub fn detect_media_type(
    content_type: Option<&str>,
    file_name: Option<&str>,
) -> Result<MediaType, ExtractError> {
    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .filter(|ct| !ct.is_empty());

    match essence.as_deref() {
        Some("application/pdf") => return Ok(MediaType::Pdf),
        Some("text/plain") => return Ok(MediaType::Text),
        None | Some("application/octet-stream") => {}
        Some(other) => return Err(ExtractError::UnsupportedFormat(other.to_string())),
    }

    let extension = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => Ok(MediaType::Pdf),
        Some("txt") => Ok(MediaType::Text),
        _ => Err(ExtractError::UnsupportedFormat(
            file_name.unwrap_or("unnamed upload").to_string(),
        )),
    }
}

/// Extracts the text of an uploaded document.
pub fn extract(document: &UploadedDocument) -> Result<ExtractedText, ExtractError> {
    extract_bytes(&document.bytes, document.media_type)
}

/// Extracts text from raw bytes of the given format.
pub fn extract_bytes(bytes: &[u8], media_type: MediaType) -> Result<ExtractedText, ExtractError> {
    let text = match media_type {
        MediaType::Text => decode_text(bytes)?,
        MediaType::Pdf => extract_pdf_text(bytes)?,
    };
    debug!(
        "Extracted {} characters from {} document ({} bytes)",
        text.chars().count(),
        media_type,
        bytes.len()
    );
    Ok(ExtractedText::new(text))
}

fn decode_text(bytes: &[u8]) -> Result<String, ExtractError> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| ExtractError::Parse(format!("text is not valid UTF-8: {}", e)))
}

fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut doc = Document::load_mem(bytes)
        .map_err(|e| ExtractError::Parse(format!("invalid PDF: {}", e)))?;

    // Owner-password-only PDFs open with an empty user password.
    if doc.trailer.get(b"Encrypt").is_ok() {
        doc.decrypt("").map_err(|e| {
            warn!("PDF needs a user password: {}", e);
            ExtractError::Parse("PDF is encrypted".to_string())
        })?;
        debug!("Decrypted PDF with an empty user password");
    }

    // `get_pages` is keyed by page number, so iteration follows document order.
    let pages = doc.get_pages();
    debug!("PDF has {} pages", pages.len());

    let mut text = String::new();
    let mut unreadable = 0;
    for page_number in pages.keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => {
                warn!("Skipping unreadable PDF page {}: {}", page_number, e);
                unreadable += 1;
            }
        }
    }

    if !pages.is_empty() && unreadable == pages.len() {
        return Err(ExtractError::Parse(
            "none of the PDF pages could be read".to_string(),
        ));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::encryption::{decrypt_object, get_encryption_key};
    use lopdf::{dictionary, Object, Stream};

    /// Builds a document with one Courier text page per entry in `page_texts`.
    fn build_document(page_texts: &[&str]) -> Document {
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
        for text in page_texts {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
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
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    fn save(mut doc: Document) -> Vec<u8> {
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn build_pdf(page_texts: &[&str]) -> Vec<u8> {
        save(build_document(page_texts))
    }

    /// Gives `page_number` resources that also list a CID font lopdf cannot decode.
    fn add_undecodable_font(doc: &mut Document, page_number: u32) {
        let courier = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let cid_font = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => "NotoSansCJK",
            "Encoding" => "Identity-H",
        });
        let resources = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => courier,
                "F2" => cid_font,
            },
        });
        let page_id = doc.get_pages()[&page_number];
        doc.get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .unwrap()
            .set("Resources", resources);
    }

    /// RC4-encrypts every stream under the standard security handler (R2, 40-bit)
    /// so the document opens with an empty user password. `user_hash` overrides /U.
    fn encrypt(mut doc: Document, user_hash: Option<Vec<u8>>) -> Vec<u8> {
        let file_id = Object::string_literal(b"0123456789abcdef".to_vec());
        doc.trailer.set("ID", vec![file_id.clone(), file_id]);

        let mut handler = dictionary! {
            "Filter" => "Standard",
            "V" => 1,
            "R" => 2,
            "O" => Object::string_literal(vec![0x11u8; 32]),
            "P" => -4,
        };
        if let Some(hash) = user_hash {
            handler.set("U", Object::string_literal(hash));
        }
        let handler_id = doc.add_object(handler);
        doc.trailer.set("Encrypt", handler_id);

        let key = get_encryption_key(&doc, "", false).unwrap();
        for (&id, object) in doc.objects.iter_mut() {
            if let Object::Stream(stream) = object {
                // RC4 is symmetric, so "decrypting" plaintext encrypts it.
                let cipher = decrypt_object(&key, id, &Object::Stream(stream.clone())).unwrap();
                stream.set_content(cipher);
            }
        }
        save(doc)
    }

    #[test]
    fn test_text_round_trip() {
        let original = "First line\nSecond line with ünïcode ✓\n\nFourth";
        let text = extract_bytes(original.as_bytes(), MediaType::Text).unwrap();
        assert_eq!(text.as_str(), original);
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let bytes = [b'o', b'k', 0xff, 0xfe, b'!'];
        let result = extract_bytes(&bytes, MediaType::Text);
        assert!(matches!(result, Err(ExtractError::Parse(_))));
    }

    #[test]
    fn test_pdf_pages_are_extracted_in_order() {
        let bytes = build_pdf(&["MarkerOne", "MarkerTwo", "MarkerThree"]);
        let text = extract_bytes(&bytes, MediaType::Pdf).unwrap();
        let text = text.as_str();

        let first = text.find("MarkerOne").expect("page 1 text missing");
        let second = text.find("MarkerTwo").expect("page 2 text missing");
        let third = text.find("MarkerThree").expect("page 3 text missing");
        assert!(first < second);
        assert!(second < third);
    }

    #[test]
    fn test_unreadable_page_is_skipped() {
        let mut doc = build_document(&["MarkerOne", "MarkerTwo", "MarkerThree"]);
        add_undecodable_font(&mut doc, 2);

        let text = extract_bytes(&save(doc), MediaType::Pdf).unwrap();
        let text = text.as_str();

        let first = text.find("MarkerOne").expect("page 1 text missing");
        let third = text.find("MarkerThree").expect("page 3 text missing");
        assert!(first < third);
        assert!(!text.contains("MarkerTwo"));
    }

    #[test]
    fn test_pdf_with_no_readable_page_is_a_parse_error() {
        let mut doc = build_document(&["MarkerOne", "MarkerTwo"]);
        add_undecodable_font(&mut doc, 1);
        add_undecodable_font(&mut doc, 2);

        let result = extract_bytes(&save(doc), MediaType::Pdf);
        assert!(matches!(result, Err(ExtractError::Parse(_))));
    }

    #[test]
    fn test_pdf_with_empty_user_password_is_decrypted() {
        let bytes = encrypt(build_document(&["SecretOne", "SecretTwo"]), None);
        assert!(!bytes.windows(9).any(|window| window == b"SecretOne"));

        let text = extract_bytes(&bytes, MediaType::Pdf).unwrap();
        let text = text.as_str();
        let first = text.find("SecretOne").expect("page 1 text missing");
        let second = text.find("SecretTwo").expect("page 2 text missing");
        assert!(first < second);
    }

    #[test]
    fn test_pdf_needing_a_user_password_is_a_parse_error() {
        let bytes = encrypt(build_document(&["SecretOne"]), Some(vec![0u8; 32]));
        let result = extract_bytes(&bytes, MediaType::Pdf);
        assert!(matches!(result, Err(ExtractError::Parse(msg)) if msg.contains("encrypted")));
    }

    #[test]
    fn test_corrupted_pdf_is_a_parse_error() {
        let result = extract_bytes(b"this is definitely not a pdf", MediaType::Pdf);
        assert!(matches!(result, Err(ExtractError::Parse(_))));
    }

    #[test]
    fn test_extract_uses_declared_media_type() {
        let upload = UploadedDocument::new(MediaType::Text, "plain body".as_bytes().to_vec())
            .with_file_name("notes.txt");
        assert_eq!(extract(&upload).unwrap().as_str(), "plain body");
    }

    #[test]
    fn test_detect_media_type_from_content_type() {
        assert_eq!(
            detect_media_type(Some("application/pdf"), Some("x.bin")).unwrap(),
            MediaType::Pdf
        );
        assert_eq!(
            detect_media_type(Some("text/plain; charset=utf-8"), None).unwrap(),
            MediaType::Text
        );
    }

    #[test]
    fn test_detect_media_type_falls_back_to_extension() {
        assert_eq!(
            detect_media_type(None, Some("Report.PDF")).unwrap(),
            MediaType::Pdf
        );
        assert_eq!(
            detect_media_type(Some("application/octet-stream"), Some("notes.txt")).unwrap(),
            MediaType::Text
        );
    }

    #[test]
    fn test_detect_media_type_rejects_other_formats() {
        assert!(matches!(
            detect_media_type(Some("image/png"), Some("photo.png")),
            Err(ExtractError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            detect_media_type(None, Some("slides.docx")),
            Err(ExtractError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            detect_media_type(None, None),
            Err(ExtractError::UnsupportedFormat(_))
        ));
    }
}
