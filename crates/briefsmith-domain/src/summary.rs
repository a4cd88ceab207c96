//! Completion results and section summaries

use std::collections::HashMap;
use std::fmt;

/// Classification of a failed completion call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Upstream rate limit; retryable with backoff
    RateLimit,

    /// Network or unknown failure; retryable with backoff
    Transient,

    /// Non-retryable failure such as rejected credentials
    Fatal,
}

impl FailureKind {
    /// Whether a call failing this way may be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, FailureKind::RateLimit | FailureKind::Transient)
    }

    /// Short lowercase label used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::RateLimit => "rate_limit",
            FailureKind::Transient => "transient",
            FailureKind::Fatal => "fatal",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified chunk failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFailure {
    /// How the call failed
    pub kind: FailureKind,

    /// Human-readable error message
    pub message: String,
}

/// Outcome of one completion call for one chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResult {
    /// Generated text, trimmed; empty on failure unless a marker was configured
    pub text: String,

    /// Whether the provider returned text
    pub succeeded: bool,

    /// Failure details when `succeeded` is false
    pub error: Option<ChunkFailure>,
}

impl CompletionResult {
    /// Successful completion; the text is trimmed
    pub fn success(text: &str) -> Self {
        Self {
            text: text.trim().to_string(),
            succeeded: true,
            error: None,
        }
    }

    /// Failed completion contributing `placeholder` to the section text
    pub fn failure(kind: FailureKind, message: impl Into<String>, placeholder: &str) -> Self {
        Self {
            text: placeholder.to_string(),
            succeeded: false,
            error: Some(ChunkFailure {
                kind,
                message: message.into(),
            }),
        }
    }
}

/// The merged output for one section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSummary {
    /// Section name from the template
    pub name: String,

    /// Newline-joined chunk outputs in chunk order, one line per chunk
    pub text: String,

    /// Number of chunks the rendered prompt was split into
    pub chunk_count: usize,

    /// Number of chunks whose completion failed
    pub failed_chunks: usize,
}

impl SectionSummary {
    /// Merge per-chunk results into one section summary
    ///
    /// # Examples
    ///
    /// ```
    /// use briefsmith_domain::{CompletionResult, SectionSummary};
    ///
    /// let results = vec![
    ///     CompletionResult::success("  first part "),
    ///     CompletionResult::success("second part\n"),
    /// ];
    /// let summary = SectionSummary::merge("The Pitch", &results);
    /// assert_eq!(summary.text, "first part\nsecond part");
    /// assert_eq!(summary.chunk_count, 2);
    /// ```
    pub fn merge(name: impl Into<String>, results: &[CompletionResult]) -> Self {
        let mut text = results
            .iter()
            .map(|r| r.text.trim())
            .collect::<Vec<_>>()
            .join("\n");
        let failed_chunks = results.iter().filter(|r| !r.succeeded).count();

        // Lines stay positional; only a section with no output at all collapses
        if failed_chunks == results.len() {
            text = text.trim().to_string();
        }

        Self {
            name: name.into(),
            text,
            chunk_count: results.len(),
            failed_chunks,
        }
    }

    /// A section that produced no text at all
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: String::new(),
            chunk_count: 0,
            failed_chunks: 0,
        }
    }

    /// Whether every chunk failed (or there were none)
    pub fn is_failed(&self) -> bool {
        self.failed_chunks == self.chunk_count
    }
}

/// Section summaries for one document, in template order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSummary {
    sections: Vec<SectionSummary>,
}

impl DocumentSummary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next section in template order
    pub fn push(&mut self, summary: SectionSummary) {
        self.sections.push(summary);
    }

    /// Summary text for a section
    pub fn get(&self, name: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.text.as_str())
    }

    /// Section summaries in template order
    pub fn sections(&self) -> &[SectionSummary] {
        &self.sections
    }

    /// Section names in template order
    pub fn names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether no sections were summarized
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Unordered name to text mapping
    pub fn to_map(&self) -> HashMap<String, String> {
        self.sections
            .iter()
            .map(|s| (s.name.clone(), s.text.clone()))
            .collect()
    }
}
