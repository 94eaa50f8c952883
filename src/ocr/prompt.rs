//! Prompt templates for each OCR mode

use super::types::OcrMode;

pub const MARKDOWN_PROMPT: &str = "<image>\n<|grounding|>Convert the document to markdown.";
pub const FREE_PROMPT: &str = "<image>\nFree OCR.";
pub const DETAILED_PROMPT: &str = "<image>\nDescribe this image in detail.";
pub const GROUNDING_PROMPT: &str = "<image>\n<|grounding|>OCR this image.";

impl OcrMode {
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Markdown => MARKDOWN_PROMPT,
            Self::Free => FREE_PROMPT,
            Self::Detailed => DETAILED_PROMPT,
            Self::Grounding => GROUNDING_PROMPT,
        }
    }
}

/// Map a mode string to its prompt. Unknown modes get the grounding OCR prompt.
pub fn select_prompt(mode: &str) -> &'static str {
    OcrMode::parse(mode).prompt()
}
