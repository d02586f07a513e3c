//! Prompt rendering for summarization requests.

use crate::domain::{SummaryStyle, MAX_SENTENCES, MIN_SENTENCES};

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("Invalid summary parameter: {0}")]
    InvalidParameter(String),
}

/// Renders the instruction sent to the model.
///
/// The output depends only on the arguments. Every argument appears verbatim;
/// blank `instructions` add nothing to the prompt.
pub fn build_prompt(
    text: &str,
    sentence_count: u32,
    style: SummaryStyle,
    instructions: &str,
) -> Result<String, PromptError> {
    if !(MIN_SENTENCES..=MAX_SENTENCES).contains(&sentence_count) {
        return Err(PromptError::InvalidParameter(format!(
            "sentence count must be between {} and {}, got {}",
            MIN_SENTENCES, MAX_SENTENCES, sentence_count
        )));
    }

    let noun = if sentence_count == 1 { "sentence" } else { "sentences" };

    let mut prompt = format!(
        "Please read the following document carefully and summarize it in exactly {} {}.\n\
         The summary should be written in a \"{}\" style. {}\n",
        sentence_count,
        noun,
        style.label(),
        style.guidance()
    );

    if !instructions.trim().is_empty() {
        prompt.push_str("Follow these additional instructions from the user:\n");
        prompt.push_str(instructions);
        prompt.push('\n');
    }

    prompt.push_str("\nHere is the document:\n<<<DOCUMENT\n");
    prompt.push_str(text);
    prompt.push_str("\nDOCUMENT>>>\n");

    Ok(prompt)
}
