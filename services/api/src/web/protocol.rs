//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the browser shell and the API server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use summarizer_core::{
    domain::{SummaryParameters, SummaryResult, SummaryStyle},
    session::{LoadedDocument, SummarySession},
};
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Payloads Sent FROM the Client TO the Server
//=========================================================================================

/// The user's choices when pressing "Summarize".
#[derive(Deserialize, Debug, ToSchema)]
pub struct SummarizeRequest {
    /// Desired number of sentences, 1 to 30.
    pub sentence_count: u32,
    /// One of `concise`, `detailed`, `formal`, `informal`, `bullet points`.
    pub style: String,
    /// Optional free-text instructions.
    #[serde(default)]
    pub instructions: String,
}

//=========================================================================================
// Payloads Sent FROM the Server TO the Client
//=========================================================================================

/// Summary of the loaded document, including the bounded preview.
#[derive(Serialize, Debug, ToSchema)]
pub struct DocumentView {
    pub file_name: Option<String>,
    pub media_type: String,
    /// The first lines of the document.
    pub preview: String,
    pub line_count: usize,
    pub char_count: usize,
    pub loaded_at: DateTime<Utc>,
}

impl From<&LoadedDocument> for DocumentView {
    fn from(document: &LoadedDocument) -> Self {
        Self {
            file_name: document.file_name.clone(),
            media_type: document.media_type.to_string(),
            preview: document.text.preview(),
            line_count: document.text.line_count(),
            char_count: document.text.char_count(),
            loaded_at: document.loaded_at,
        }
    }
}

/// The full extracted text, served on demand.
#[derive(Serialize, Debug, ToSchema)]
pub struct DocumentText {
    pub file_name: Option<String>,
    pub text: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ParametersView {
    pub sentence_count: u32,
    pub style: String,
    pub instructions: String,
}

impl From<&SummaryParameters> for ParametersView {
    fn from(parameters: &SummaryParameters) -> Self {
        Self {
            sentence_count: parameters.sentence_count,
            style: parameters.style.to_string(),
            instructions: parameters.instructions.clone(),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct SummaryView {
    pub text: String,
    pub parameters: ParametersView,
    pub generated_at: DateTime<Utc>,
}

impl From<&SummaryResult> for SummaryView {
    fn from(summary: &SummaryResult) -> Self {
        Self {
            text: summary.text.clone(),
            parameters: ParametersView::from(&summary.parameters),
            generated_at: summary.generated_at,
        }
    }
}

/// Everything the shell needs to redraw itself.
#[derive(Serialize, Debug, ToSchema)]
pub struct SessionView {
    pub session_id: Uuid,
    /// `idle`, `document_loaded` or `summary_displayed`.
    pub status: String,
    pub document: Option<DocumentView>,
    /// The parameters of the last summarize attempt.
    pub parameters: Option<ParametersView>,
    pub summary: Option<SummaryView>,
}

impl SessionView {
    pub fn new(session_id: Uuid, session: &SummarySession) -> Self {
        Self {
            session_id,
            status: session.status().as_str().to_string(),
            document: session.document().map(DocumentView::from),
            parameters: session.parameters().map(ParametersView::from),
            summary: session.summary().map(SummaryView::from),
        }
    }
}

/// The choices the shell should offer.
#[derive(Serialize, Debug, ToSchema)]
pub struct SummaryOptions {
    pub styles: Vec<String>,
    pub min_sentences: u32,
    pub max_sentences: u32,
    pub default_sentences: u32,
    pub preview_lines: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        use summarizer_core::domain::{
            DEFAULT_SENTENCES, MAX_SENTENCES, MIN_SENTENCES, PREVIEW_LINES,
        };

        Self {
            styles: SummaryStyle::ALL.iter().map(|s| s.to_string()).collect(),
            min_sentences: MIN_SENTENCES,
            max_sentences: MAX_SENTENCES,
            default_sentences: DEFAULT_SENTENCES,
            preview_lines: PREVIEW_LINES,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
}
