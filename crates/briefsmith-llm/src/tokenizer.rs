//! Character-length prompt measurement for providers without a local vocabulary

/// Default number of characters assumed per model token
pub const DEFAULT_CHARS_PER_TOKEN: usize = 4;

/// Measures prompts in characters
///
/// Each unit is one Unicode scalar value, so slicing never splits a
/// character. `chars_per_token` converts a token budget into a character
/// budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharTokenizer {
    chars_per_token: usize,
}

impl CharTokenizer {
    /// Create a tokenizer assuming `chars_per_token` characters per token
    pub fn new(chars_per_token: usize) -> Self {
        Self {
            chars_per_token: chars_per_token.max(1),
        }
    }

    /// Characters assumed per model token
    pub fn chars_per_token(&self) -> usize {
        self.chars_per_token
    }

    /// One unit per character
    pub fn encode(&self, text: &str) -> Vec<u32> {
        text.chars().map(u32::from).collect()
    }

    /// Rebuild text from character units, dropping invalid values
    pub fn decode(&self, units: &[u32]) -> String {
        units.iter().filter_map(|&u| char::from_u32(u)).collect()
    }
}

impl Default for CharTokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_CHARS_PER_TOKEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_counts_characters() {
        let tokenizer = CharTokenizer::default();
        assert_eq!(tokenizer.encode("héllo").len(), 5);
    }

    #[test]
    fn test_decode_slices_on_char_boundaries() {
        let tokenizer = CharTokenizer::default();
        let units = tokenizer.encode("naïve café");
        let (left, right) = units.split_at(3);
        assert_eq!(tokenizer.decode(left), "naï");
        assert_eq!(tokenizer.decode(right), "ve café");
    }

    #[test]
    fn test_invalid_units_dropped() {
        let tokenizer = CharTokenizer::default();
        assert_eq!(tokenizer.decode(&[0x61, 0xD800, 0x62]), "ab");
    }

    #[test]
    fn test_zero_ratio_clamped() {
        assert_eq!(CharTokenizer::new(0).chars_per_token(), 1);
    }
}
