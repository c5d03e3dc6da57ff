use once_cell::sync::Lazy;
use regex::Regex;

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").unwrap());

static REASONING_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<reasoning>[\s\S]*?</reasoning>").unwrap());

static CODE_FENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*```[A-Za-z]*[ \t]*$").unwrap());

static BOLD_MARKER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*").unwrap());

static MULTIPLE_NEWLINES_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Cleans a model reply before section parsing.
///
/// Gemini frequently decorates labels as `**Subject:**` and may wrap the whole
/// answer in a fenced block; both would hide the line-start labels.
pub fn clean_llm_response(response: &str) -> String {
    let mut cleaned = response.replace("\r\n", "\n").replace('\r', "\n");

    cleaned = THINK_TAG_PATTERN.replace_all(&cleaned, "").to_string();

    cleaned = REASONING_TAG_PATTERN.replace_all(&cleaned, "").to_string();

    cleaned = CODE_FENCE_PATTERN.replace_all(&cleaned, "").to_string();

    cleaned = BOLD_MARKER_PATTERN.replace_all(&cleaned, "").to_string();

    cleaned = cleaned.trim().to_string();

    // Collapse multiple consecutive newlines into at most two
    cleaned = MULTIPLE_NEWLINES_PATTERN
        .replace_all(&cleaned, "\n\n")
        .to_string();

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_think_tags() {
        let input = "<think>Some reasoning here</think>Subject: Physics";
        assert_eq!(clean_llm_response(input), "Subject: Physics");
    }

    #[test]
    fn test_clean_self_closing_think() {
        let input = "<think />Subject: Maths";
        assert_eq!(clean_llm_response(input), "Subject: Maths");
    }

    #[test]
    fn test_clean_reasoning_tags() {
        let input = "<reasoning>Internal reasoning</reasoning>Subject: Biology";
        assert_eq!(clean_llm_response(input), "Subject: Biology");
    }

    #[test]
    fn test_clean_crlf() {
        let input = "Subject: Physics\r\nTopics: Optics\r\n";
        assert_eq!(clean_llm_response(input), "Subject: Physics\nTopics: Optics");
    }

    #[test]
    fn test_clean_code_fence_and_bold_labels() {
        let input = "```text\n**Subject:** Chemistry\n**Topics:** Acids, Bases\n```";
        assert_eq!(
            clean_llm_response(input),
            "Subject: Chemistry\nTopics: Acids, Bases"
        );
    }

    #[test]
    fn test_clean_multiple_newlines() {
        let input = "Summary:\n\n\n\n\n- Point";
        assert_eq!(clean_llm_response(input), "Summary:\n\n- Point");
    }

    #[test]
    fn test_clean_preserves_normal_text() {
        let input = "Subject: Computer Science\nTopics: Graphs, Trees";
        assert_eq!(clean_llm_response(input), input);
    }
}
