//! Extraction of structured study metadata from a free-text model reply.
//!
//! The reply is expected to follow the line-oriented format requested by
//! [`super::prompts::build_analysis_prompt`], but nothing guarantees it does.
//! Each field is pulled out by its own extractor; a missing or malformed
//! section only falls back to that field's default.

use crate::domain::analysis::{AnalysisResult, AnswerKey, Difficulty, Question, Subject};
use once_cell::sync::Lazy;
use regex::Regex;

const MAX_TOPICS: usize = 5;
const MAX_TOPIC_CHARS: usize = 50;
const MAX_SUMMARY_POINTS: usize = 5;
const MIN_SUMMARY_CHARS: usize = 10;
const MAX_SUMMARY_CHARS: usize = 200;
const MIN_QUESTION_LINES: usize = 3;
const OPTIONS_PER_QUESTION: usize = 4;

static SUBJECT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^[ \t]*subject:\s*([^\n]+)").unwrap());

static TOPICS_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?im)^[ \t]*topics:").unwrap());

static SUMMARY_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?im)^[ \t]*summary:").unwrap());

static QUESTIONS_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^[ \t]*questions:").unwrap());

static BULLET_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*•]\s*").unwrap());

static NUMBER_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s*").unwrap());

static QUESTION_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\d+\.\s+").unwrap());

static DIFFICULTY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^difficulty:\s*(easy|medium|hard)").unwrap());

static OPTION_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^[A-D]\)").unwrap());

/// Parses a model reply. Never fails; unparseable fields keep their defaults.
pub fn parse(response_text: &str) -> AnalysisResult {
    AnalysisResult {
        subject: extract_subject(response_text).unwrap_or_default(),
        topics: extract_topics(response_text).unwrap_or_default(),
        summary: extract_summary(response_text).unwrap_or_default(),
        questions: extract_questions(response_text).unwrap_or_default(),
    }
}

/// First known subject mentioned on the `Subject:` line, in priority order.
pub fn extract_subject(text: &str) -> Option<Subject> {
    let captures = SUBJECT_PATTERN.captures(text)?;
    let detected = captures.get(1)?.as_str().trim().to_lowercase();

    Subject::CLASSIFIED
        .iter()
        .copied()
        .find(|subject| detected.contains(&subject.label().to_lowercase()))
}

pub fn extract_topics(text: &str) -> Option<Vec<String>> {
    let label = TOPICS_LABEL.find(text)?;
    let block = topics_block(&text[label.end()..]);

    let topics = block
        .iter()
        .flat_map(|line| line.split(','))
        .map(strip_list_marker)
        .filter(|topic| {
            let len = topic.chars().count();
            len > 0 && len < MAX_TOPIC_CHARS
        })
        .take(MAX_TOPICS)
        .map(str::to_string)
        .collect();

    Some(topics)
}

/// Lines following `Topics:` up to the next section label or blank line.
fn topics_block(rest: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    for line in rest.split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if lines.is_empty() {
                continue;
            }
            break;
        }
        if starts_section(trimmed) {
            break;
        }
        lines.push(trimmed);
    }
    lines
}

fn starts_section(line: &str) -> bool {
    SUMMARY_LABEL.is_match(line) || QUESTIONS_LABEL.is_match(line)
}

/// Summary runs to the end of the reply.
pub fn extract_summary(text: &str) -> Option<Vec<String>> {
    let label = SUMMARY_LABEL.find(text)?;

    let points = text[label.end()..]
        .split('\n')
        .map(strip_list_marker)
        .filter(|line| {
            let len = line.chars().count();
            len > MIN_SUMMARY_CHARS && len < MAX_SUMMARY_CHARS
        })
        .take(MAX_SUMMARY_POINTS)
        .map(str::to_string)
        .collect();

    Some(points)
}

pub fn extract_questions(text: &str) -> Option<Vec<Question>> {
    let label = QUESTIONS_LABEL.find(text)?;
    // Anchor the first item on a newline so it splits like the rest.
    let body = format!("\n{}", text[label.end()..].trim_start());

    let questions = QUESTION_BOUNDARY
        .split(&body)
        .skip(1)
        .filter_map(parse_question_block)
        .collect();

    Some(questions)
}

fn parse_question_block(block: &str) -> Option<Question> {
    let lines: Vec<&str> = block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.len() < MIN_QUESTION_LINES {
        return None;
    }

    let question_text = lines[0].to_string();

    let difficulty = lines
        .iter()
        .find(|line| is_difficulty_line(line))
        .and_then(|line| DIFFICULTY_PATTERN.captures(line))
        .and_then(|captures| Difficulty::from_word(&captures[1]))
        .unwrap_or_default();

    let correct_answer = lines
        .iter()
        .find(|line| is_answer_line(line))
        .and_then(|line| line.split(':').nth(1))
        .and_then(|value| value.trim().chars().next())
        .and_then(AnswerKey::from_char)?;

    let options: Vec<String> = lines
        .iter()
        .filter(|line| {
            OPTION_PATTERN.is_match(line) && !is_answer_line(line) && !is_difficulty_line(line)
        })
        .map(|line| line.to_string())
        .collect();
    if options.len() != OPTIONS_PER_QUESTION {
        return None;
    }

    Some(Question {
        question_text,
        options,
        correct_answer,
        difficulty,
    })
}

fn is_answer_line(line: &str) -> bool {
    line.to_uppercase().starts_with("ANSWER:")
}

fn is_difficulty_line(line: &str) -> bool {
    line.to_lowercase().starts_with("difficulty:")
}

fn strip_list_marker(item: &str) -> &str {
    let item = item.trim();
    let item = match BULLET_PREFIX.find(item) {
        Some(m) => &item[m.end()..],
        None => item,
    };
    match NUMBER_PREFIX.find(item) {
        Some(m) => &item[m.end()..],
        None => item,
    }
}
