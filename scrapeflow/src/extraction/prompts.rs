//! Prompt rendering for the extraction model.

use serde_json::Value;

/// Renders the prompts sent to the model.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    /// Prompt for extracting from a chunk with no prior result.
    #[must_use]
    pub fn initial(content: &str, description: &str) -> String {
        format!(
            "Extract information from the following text content and return it as a CLEAN JSON object.\n\
             \n\
             Text content: {content}\n\
             \n\
             Instructions:\n\
             1. Extract information matching this description: {description}\n\
             2. Return ONLY a valid JSON object, no other text or markdown\n\
             3. If no information is found, return an empty JSON object {{}}\n\
             4. Ensure the JSON is properly formatted and valid\n\
             5. DO NOT include any explanatory text, code blocks, or markdown - ONLY the JSON object\n"
        )
    }

    /// Prompt for folding a chunk into the result accumulated so far.
    #[must_use]
    pub fn merge(current: &Value, content: &str, description: &str) -> String {
        let current = serde_json::to_string_pretty(current).unwrap_or_else(|_| current.to_string());
        format!(
            "You are building a JSON object from a web page that is read in several parts.\n\
             \n\
             Current JSON object:\n\
             {current}\n\
             \n\
             Next part of the text content: {content}\n\
             \n\
             Instructions:\n\
             1. Extract information matching this description: {description}\n\
             2. Merge what you find into the current JSON object and return the COMPLETE merged object\n\
             3. Keep every existing value unless the new text gives a more complete one\n\
             4. Never replace a filled-in value with an empty one\n\
             5. Return ONLY a valid JSON object, no other text or markdown\n\
             6. If the new text adds nothing, return the current JSON object unchanged\n"
        )
    }
}
