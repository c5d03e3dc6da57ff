//! Character-based token estimation for prompt sizing.
//!
//! Approximation: ~4 characters per token, which holds well enough for
//! Gemini on English study material.

pub struct TokenCounter;

impl TokenCounter {
    /// Estimate token count for text.
    pub fn estimate_tokens(text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        (text.chars().count() + 3) / 4
    }

    /// Estimate tokens for a system/user prompt pair, including wrapper overhead.
    pub fn estimate_prompt_tokens(system: &str, user: &str) -> usize {
        let wrappers = [system, user]
            .iter()
            .filter(|part| !part.trim().is_empty())
            .count()
            * 4;
        wrappers + Self::estimate_tokens(system) + Self::estimate_tokens(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        assert_eq!(TokenCounter::estimate_tokens(""), 0);
    }

    #[test]
    fn test_rounds_up() {
        assert_eq!(TokenCounter::estimate_tokens("abcde"), 2);
        assert_eq!(TokenCounter::estimate_tokens("abcd"), 1);
    }

    #[test]
    fn test_prompt_overhead() {
        assert_eq!(TokenCounter::estimate_prompt_tokens("", "abcd"), 5);
        assert_eq!(TokenCounter::estimate_prompt_tokens("abcd", "abcd"), 10);
    }
}
