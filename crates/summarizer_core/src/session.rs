//! crates/summarizer_core/src/session.rs
//!
//! The per-user summarization session: the document currently loaded, the last
//! parameters the user entered and the summary on display.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::{
    ExtractedText, MediaType, SummaryParameters, SummaryRequest, SummaryResult, UploadedDocument,
};
use crate::extract::{extract, ExtractError};
use crate::ports::{PortError, SummarizationService};
use crate::prompt::PromptError;

/// Any failure of a session action. None of them change what the session holds.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Port(#[from] PortError),

    #[error("No document has been loaded yet. Upload a .txt or .pdf file first.")]
    NoDocument,
}

/// Where the session is in the upload → summarize flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    DocumentLoaded,
    SummaryDisplayed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::DocumentLoaded => "document_loaded",
            SessionStatus::SummaryDisplayed => "summary_displayed",
        }
    }
}

/// A document whose text has been extracted successfully.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub file_name: Option<String>,
    pub media_type: MediaType,
    pub text: ExtractedText,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct SummarySession {
    document: Option<LoadedDocument>,
    parameters: Option<SummaryParameters>,
    summary: Option<SummaryResult>,
    created_at: DateTime<Utc>,
}

impl Default for SummarySession {
    fn default() -> Self {
        Self::new()
    }
}

impl SummarySession {
    pub fn new() -> Self {
        Self {
            document: None,
            parameters: None,
            summary: None,
            created_at: Utc::now(),
        }
    }

    pub fn status(&self) -> SessionStatus {
        match (&self.document, &self.summary) {
            (None, _) => SessionStatus::Idle,
            (Some(_), None) => SessionStatus::DocumentLoaded,
            (Some(_), Some(_)) => SessionStatus::SummaryDisplayed,
        }
    }

    pub fn document(&self) -> Option<&LoadedDocument> {
        self.document.as_ref()
    }

    /// The parameters of the most recent valid summarize attempt, successful or not.
    pub fn parameters(&self) -> Option<&SummaryParameters> {
        self.parameters.as_ref()
    }

    pub fn summary(&self) -> Option<&SummaryResult> {
        self.summary.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Extracts and installs a new document, discarding any previous summary.
    ///
    /// On failure the session keeps whatever it held before.
    pub fn load_document(
        &mut self,
        upload: UploadedDocument,
    ) -> Result<&LoadedDocument, SessionError> {
        let text = extract(&upload).map_err(|e| {
            warn!("Rejected upload {:?}: {}", upload.file_name, e);
            e
        })?;

        info!(
            "Loaded {} document {:?} ({} lines)",
            upload.media_type,
            upload.file_name,
            text.line_count()
        );

        self.summary = None;
        Ok(self.document.insert(LoadedDocument {
            file_name: upload.file_name,
            media_type: upload.media_type,
            text,
            loaded_at: Utc::now(),
        }))
    }

    /// Summarizes the loaded document with `parameters` through `service`.
    ///
    /// Valid parameters are remembered even when the call fails so the user can retry;
    /// rejected ones are not. The displayed summary only changes on success.
    pub async fn summarize(
        &mut self,
        service: &dyn SummarizationService,
        parameters: SummaryParameters,
    ) -> Result<&SummaryResult, SessionError> {
        let document = self.document.as_ref().ok_or(SessionError::NoDocument)?;
        let prompt = SummaryRequest::new(&document.text, &parameters).prompt()?;
        let parameters = self.parameters.insert(parameters).clone();

        info!(
            "Requesting {}-sentence {} summary of {:?}",
            parameters.sentence_count, parameters.style, document.file_name
        );
        let text = service.summarize(&prompt).await?;
        if text.trim().is_empty() {
            return Err(PortError::EmptyResponse.into());
        }

        Ok(self.summary.insert(SummaryResult {
            text,
            parameters,
            generated_at: Utc::now(),
        }))
    }
}
