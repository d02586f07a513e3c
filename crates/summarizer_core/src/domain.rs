//! crates/summarizer_core/src/domain.rs
//!
//! Defines the pure, core data structures for the summarizer.
//! These structs are independent of any transport or serialization format.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::prompt::PromptError;

/// Smallest sentence count a summary may be asked for.
pub const MIN_SENTENCES: u32 = 1;
/// Largest sentence count a summary may be asked for.
pub const MAX_SENTENCES: u32 = 30;
/// Sentence count offered when the user has not chosen one yet.
pub const DEFAULT_SENTENCES: u32 = 10;
/// Number of leading lines shown in the document preview.
pub const PREVIEW_LINES: usize = 5;

//=========================================================================================
// Uploaded Documents
//=========================================================================================

/// The declared format of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Text,
    Pdf,
}

impl MediaType {
    /// The canonical MIME type for this format.
    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::Text => "text/plain",
            MediaType::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Text => f.write_str("text"),
            MediaType::Pdf => f.write_str("pdf"),
        }
    }
}

/// A file as received from the user. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: Option<String>,
    pub media_type: MediaType,
    pub bytes: Bytes,
}

impl UploadedDocument {
    pub fn new(media_type: MediaType, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: None,
            media_type,
            bytes: bytes.into(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

//=========================================================================================
// Extracted Text
//=========================================================================================

/// The plain-text content of a document. Produced once per upload and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    pub fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The first `PREVIEW_LINES` lines of the text, joined with `\n`.
    ///
    /// A line is whatever `str::lines` yields, so a single very long line still
    /// counts as one line.
    pub fn preview(&self) -> String {
        self.0
            .lines()
            .take(PREVIEW_LINES)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn line_count(&self) -> usize {
        self.0.lines().count()
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

//=========================================================================================
// Summary Parameters
//=========================================================================================

/// The qualitative style a summary should be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryStyle {
    #[default]
    Concise,
    Detailed,
    Formal,
    Informal,
    BulletPoints,
}

impl SummaryStyle {
    pub const ALL: [SummaryStyle; 5] = [
        SummaryStyle::Concise,
        SummaryStyle::Detailed,
        SummaryStyle::Formal,
        SummaryStyle::Informal,
        SummaryStyle::BulletPoints,
    ];

    /// The label shown to users and interpolated into prompts.
    pub fn label(&self) -> &'static str {
        match self {
            SummaryStyle::Concise => "concise",
            SummaryStyle::Detailed => "detailed",
            SummaryStyle::Formal => "formal",
            SummaryStyle::Informal => "informal",
            SummaryStyle::BulletPoints => "bullet points",
        }
    }

    /// A one-line hint telling the model what the style means.
    pub fn guidance(&self) -> &'static str {
        match self {
            SummaryStyle::Concise => "Keep every sentence short and to the point.",
            SummaryStyle::Detailed => "Cover the key supporting details, not just the headline.",
            SummaryStyle::Formal => "Use a formal, professional register.",
            SummaryStyle::Informal => "Use a relaxed, conversational register.",
            SummaryStyle::BulletPoints => "Present each sentence as its own bullet point.",
        }
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SummaryStyle {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        SummaryStyle::ALL
            .into_iter()
            .find(|style| style.label() == normalized)
            .ok_or_else(|| {
                PromptError::InvalidParameter(format!(
                    "unknown summary style '{}'; expected one of: {}",
                    s,
                    SummaryStyle::ALL.map(|style| style.label()).join(", ")
                ))
            })
    }
}

/// The user's choices for one summarize action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryParameters {
    pub sentence_count: u32,
    pub style: SummaryStyle,
    pub instructions: String,
}

impl Default for SummaryParameters {
    fn default() -> Self {
        Self {
            sentence_count: DEFAULT_SENTENCES,
            style: SummaryStyle::default(),
            instructions: String::new(),
        }
    }
}

/// Everything needed to render one summarization prompt.
#[derive(Debug, Clone, Copy)]
pub struct SummaryRequest<'a> {
    pub text: &'a ExtractedText,
    pub parameters: &'a SummaryParameters,
}

impl<'a> SummaryRequest<'a> {
    pub fn new(text: &'a ExtractedText, parameters: &'a SummaryParameters) -> Self {
        Self { text, parameters }
    }

    /// Renders the prompt for this request.
    pub fn prompt(&self) -> Result<String, PromptError> {
        crate::prompt::build_prompt(
            self.text.as_str(),
            self.parameters.sentence_count,
            self.parameters.style,
            &self.parameters.instructions,
        )
    }
}

/// The text a model produced for a given set of parameters.
#[derive(Debug, Clone)]
pub struct SummaryResult {
    pub text: String,
    pub parameters: SummaryParameters,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_takes_first_five_lines() {
        let text = ExtractedText::new("one\ntwo\nthree\nfour\nfive\nsix\nseven".to_string());

        assert_eq!(text.preview(), "one\ntwo\nthree\nfour\nfive");
        assert_eq!(text.line_count(), 7);
        assert_eq!(text.as_str().lines().count(), 7);
    }

    #[test]
    fn test_preview_of_short_document_is_whole_document() {
        let text = ExtractedText::new("just\ntwo lines".to_string());
        assert_eq!(text.preview(), "just\ntwo lines");
    }

    #[test]
    fn test_preview_counts_a_long_line_once() {
        let long_line = "word ".repeat(5_000);
        let text = ExtractedText::new(format!("{}\nsecond", long_line));

        assert_eq!(text.preview(), format!("{}\nsecond", long_line));
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!("concise".parse::<SummaryStyle>().unwrap(), SummaryStyle::Concise);
        assert_eq!("Formal".parse::<SummaryStyle>().unwrap(), SummaryStyle::Formal);
        assert_eq!(
            "bullet points".parse::<SummaryStyle>().unwrap(),
            SummaryStyle::BulletPoints
        );
        assert_eq!(
            "bullet_points".parse::<SummaryStyle>().unwrap(),
            SummaryStyle::BulletPoints
        );
        assert!(matches!(
            "haiku".parse::<SummaryStyle>(),
            Err(PromptError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_style_labels_round_trip() {
        for style in SummaryStyle::ALL {
            assert_eq!(style.to_string().parse::<SummaryStyle>().unwrap(), style);
        }
    }

    #[test]
    fn test_default_parameters() {
        let params = SummaryParameters::default();
        assert_eq!(params.sentence_count, 10);
        assert_eq!(params.style, SummaryStyle::Concise);
        assert!(params.instructions.is_empty());
    }
}
