//! Prompt rendering for section drafting

/// Builds the instruction-following prompt for one section
///
/// The title, the instruction and the document text are embedded verbatim,
/// each under its own heading. The document comes last but one so that the
/// closing cue ("Write your response below") survives in the final chunk.
pub struct PromptBuilder<'a> {
    title: &'a str,
    instruction: &'a str,
    document: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(title: &'a str, instruction: &'a str, document: &'a str) -> Self {
        Self {
            title,
            instruction,
            document,
        }
    }

    /// Build the complete drafting prompt
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(
            PREAMBLE.len() + self.instruction.len() + self.document.len() + 2 * self.title.len() + 96,
        );

        prompt.push_str(PREAMBLE);
        prompt.push_str("\n\nTASK:\n");
        prompt.push_str(&format!(
            "Write the \"{}\" section of the client strategy report.\n\n",
            self.title
        ));

        prompt.push_str("Instructions:\n");
        prompt.push_str(self.instruction);
        prompt.push_str("\n\n");

        prompt.push_str("Source Text:\n");
        prompt.push_str(self.document);
        prompt.push_str("\n\n---\n\n");

        prompt.push_str("Write your response below:\n");
        prompt.push_str(self.title);
        prompt.push('\n');

        prompt
    }
}

const PREAMBLE: &str = "You are a helpful assistant writing a simple strategy report.";
