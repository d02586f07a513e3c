pub mod domain;
pub mod extract;
pub mod ports;
pub mod prompt;
pub mod session;

pub use domain::{
    ExtractedText, MediaType, SummaryParameters, SummaryRequest, SummaryResult, SummaryStyle,
    UploadedDocument,
};
pub use extract::{detect_media_type, extract, extract_bytes, ExtractError};
pub use ports::{PortError, PortResult, SummarizationService};
pub use prompt::{build_prompt, PromptError};
pub use session::{LoadedDocument, SessionError, SessionStatus, SummarySession};
