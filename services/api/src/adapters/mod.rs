pub mod summary_llm;

pub use summary_llm::{single_attempt_client, OpenAiSummaryAdapter};
