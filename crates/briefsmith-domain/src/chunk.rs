//! Prompt chunks - context-window-sized slices of a rendered prompt

/// A bounded slice of a rendered prompt's token sequence
///
/// Chunks of one section are contiguous and non-overlapping; `index` is the
/// position whose output must be concatenated before chunk `index + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptChunk {
    /// Position of this chunk within its section
    pub index: usize,

    /// Token ids (or character units for the heuristic tokenizer)
    pub tokens: Vec<u32>,
}

impl PromptChunk {
    /// Number of units in the chunk
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the chunk holds no units
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Split a token sequence into contiguous chunks of at most `max_input_tokens`
///
/// Order is preserved, there is no overlap and no gap; only the final chunk
/// may be shorter. An empty sequence yields no chunks. A zero budget is
/// treated as one unit per chunk.
///
/// # Examples
///
/// ```
/// use briefsmith_domain::partition;
///
/// let chunks = partition(&[1, 2, 3, 4, 5], 2);
/// assert_eq!(chunks.len(), 3);
/// assert_eq!(chunks[2].tokens, vec![5]);
/// ```
pub fn partition(tokens: &[u32], max_input_tokens: usize) -> Vec<PromptChunk> {
    tokens
        .chunks(max_input_tokens.max(1))
        .enumerate()
        .map(|(index, slice)| PromptChunk {
            index,
            tokens: slice.to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_in_one_chunk() {
        let chunks = partition(&[1, 2, 3], 3);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].tokens, vec![1, 2, 3]);
        assert_eq!(chunks[0].index, 0);
    }

    #[test]
    fn test_exact_multiple() {
        let chunks = partition(&[1, 2, 3, 4], 2);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.len() == 2));
    }

    #[test]
    fn test_empty_sequence() {
        assert!(partition(&[], 10).is_empty());
    }

    #[test]
    fn test_zero_budget_clamped() {
        let chunks = partition(&[7, 8], 0);
        assert_eq!(chunks.len(), 2);
    }
}
