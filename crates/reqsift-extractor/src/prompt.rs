//! LLM prompt engineering for requirement extraction

use crate::config::DEFAULT_MAX_CHARS;
use reqsift_domain::ModalVerb;

/// Builds the extraction prompt for one document
///
/// Functional requirements are requested verbatim. Non-functional
/// descriptions are requested reworded with a modal verb that signals their
/// importance. Nothing here checks that the model complies.
pub struct PromptBuilder<'a> {
    text: &'a str,
    max_chars: usize,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder with the default character budget
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    /// Set the maximum number of document characters to embed
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Document text that will be embedded
    pub fn source_text(&self) -> &'a str {
        truncate_chars(self.text, self.max_chars)
    }

    /// Whether the document exceeds the character budget
    pub fn is_truncated(&self) -> bool {
        self.source_text().len() < self.text.len()
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Role and output schema
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. Rules, with the modal-verb vocabulary
        prompt.push_str(&rules());
        prompt.push('\n');

        // 3. The text to analyze
        prompt.push_str("SRS Text:\n");
        prompt.push_str(self.source_text());
        prompt.push('\n');

        prompt
    }
}

/// Longest prefix of `text` holding at most `max_chars` characters
///
/// Never splits a multi-byte character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn rules() -> String {
    let mut rules = String::from(RULES_HEAD);
    for verb in ModalVerb::ALL {
        rules.push_str(&format!("     - \"{}\" -> {}\n", verb, verb.importance()));
    }
    rules.push_str(RULES_TAIL);
    rules
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You are an expert software analyst.

Extract both the Functional and the Non-Functional Requirements from the SRS text below.

Return ONLY a single JSON object with exactly this structure:

{
  "functional": [
    {
      "title": "<title exactly as it appears in the SRS>",
      "description": "<sentence(s) copied verbatim from the SRS>",
      "source": { "page": <page number or null>, "start_index": <character index or null> }
    }
  ],
  "non_functional": [
    {
      "title": "<title exactly as it appears in the SRS>",
      "description": "<professionally reworded requirement using one of the modal verbs below>",
      "source": { "page": <page number or null>, "start_index": <character index or null> }
    }
  ]
}"#;

const RULES_HEAD: &str = r#"RULES:
1. Functional requirements: copy both title and description verbatim from the SRS. Change nothing.
2. Non-functional requirements:
   - Keep the title identical to the SRS. Do not rename or paraphrase it.
   - Reword the description professionally.
   - Use exactly one of these modal verbs to signal importance:
"#;

const RULES_TAIL: &str = r#"   - Output exactly as many non-functional requirements as the SRS states. Do not add or guess any.
3. Do not invent or infer requirements that are not explicitly in the text.
4. Every description must be grammatically correct, concise and faithful to the original meaning.
5. If the page or index is unknown, set it to null.
6. The output must be valid JSON only, with no explanation or commentary outside the JSON.
"#;
