use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Subject {
    Physics,
    Chemistry,
    Maths,
    Biology,
    #[serde(rename = "Computer Science")]
    ComputerScience,
    #[default]
    Other,
}

impl Subject {
    /// Subjects the model may classify into, in match priority order.
    pub const CLASSIFIED: [Subject; 5] = [
        Subject::Physics,
        Subject::Chemistry,
        Subject::Maths,
        Subject::Biology,
        Subject::ComputerScience,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
            Subject::Maths => "Maths",
            Subject::Biology => "Biology",
            Subject::ComputerScience => "Computer Science",
            Subject::Other => "Other",
        }
    }

    /// Exact, case-insensitive label lookup. Used when reading stored records.
    pub fn from_label(value: &str) -> Subject {
        let value = value.trim();
        Self::CLASSIFIED
            .iter()
            .copied()
            .find(|subject| subject.label().eq_ignore_ascii_case(value))
            .unwrap_or(Subject::Other)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn from_word(word: &str) -> Option<Difficulty> {
        match word.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Letter of the correct option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerKey {
    A,
    B,
    C,
    D,
}

impl AnswerKey {
    pub fn from_char(c: char) -> Option<AnswerKey> {
        match c.to_ascii_uppercase() {
            'A' => Some(AnswerKey::A),
            'B' => Some(AnswerKey::B),
            'C' => Some(AnswerKey::C),
            'D' => Some(AnswerKey::D),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "question")]
    pub question_text: String,
    /// Exactly four option lines, each starting with its `A)`..`D)` label.
    pub options: Vec<String>,
    pub correct_answer: AnswerKey,
    #[serde(default)]
    pub difficulty: Difficulty,
}

/// Structured metadata extracted from one model reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AnalysisResult {
    #[serde(default)]
    pub subject: Subject,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub summary: Vec<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}
