use crate::domain::profile::StudentProfile;

/// Student context substituted verbatim into the analysis prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyContext {
    pub university: String,
    pub course: String,
    pub semester: String,
}

impl Default for StudyContext {
    fn default() -> Self {
        Self {
            university: "Unknown University".to_string(),
            course: "Unknown Course".to_string(),
            semester: "Unknown Year/Semester".to_string(),
        }
    }
}

impl StudyContext {
    pub fn from_profile(profile: Option<&StudentProfile>) -> Self {
        let defaults = Self::default();
        let Some(profile) = profile else {
            return defaults;
        };

        Self {
            university: non_empty_or(&profile.university, defaults.university),
            course: non_empty_or(&profile.course, defaults.course),
            semester: non_empty_or(&profile.semester, defaults.semester),
        }
    }
}

fn non_empty_or(value: &str, fallback: String) -> String {
    if value.trim().is_empty() {
        fallback
    } else {
        value.to_string()
    }
}

pub fn build_analysis_system_prompt() -> &'static str {
    "You are analyzing study material for students."
}

pub fn build_analysis_prompt(excerpt: &str, context: &StudyContext) -> String {
    format!(
        r#"Based only on the content below:
1. Identify the academic subject (choose only from: Physics, Chemistry, Maths, Biology, Computer Science, Other)
2. Give 5 topic keywords
3. Give a 5-bullet-point revision summary
4. Generate 5 multiple-choice questions with 4 options each and give the correct answer

Return strictly in this format:

Subject:
Topics:
Summary:
- point 1
- point 2
- point 3
- point 4
- point 5

Questions:
1. Question Text
Difficulty: Easy
A) Option A
B) Option B
C) Option C
D) Option D
Answer: A

2. Question Text
Difficulty: Medium
A) Option A
B) Option B
C) Option C
D) Option D
Answer: B

Note: Assign difficulty (Easy, Medium, or Hard) based on complexity.

Study Material (Student: {university}, {course}, {semester}):
{excerpt}"#,
        university = context.university,
        course = context.course,
        semester = context.semester,
        excerpt = excerpt,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_defaults_without_profile() {
        let context = StudyContext::from_profile(None);
        assert_eq!(context.university, "Unknown University");
        assert_eq!(context.course, "Unknown Course");
        assert_eq!(context.semester, "Unknown Year/Semester");
    }

    #[test]
    fn test_context_from_profile_keeps_blank_defaults() {
        let profile = StudentProfile {
            user_id: "u1".to_string(),
            name: None,
            email: None,
            university: "IIT Delhi".to_string(),
            course: "  ".to_string(),
            semester: "Semester 3".to_string(),
            created_at: None,
        };
        let context = StudyContext::from_profile(Some(&profile));
        assert_eq!(context.university, "IIT Delhi");
        assert_eq!(context.course, "Unknown Course");
        assert_eq!(context.semester, "Semester 3");
    }

    #[test]
    fn test_prompt_embeds_context_and_excerpt() {
        let context = StudyContext {
            university: "MIT".to_string(),
            course: "6.006".to_string(),
            semester: "Fall".to_string(),
        };
        let prompt = build_analysis_prompt("--- Page 1 --- Dijkstra", &context);
        assert!(prompt.contains("Study Material (Student: MIT, 6.006, Fall):\n--- Page 1 --- Dijkstra"));
        assert!(prompt.contains("Computer Science, Other"));
        assert!(prompt.contains("Answer: A"));
    }
}
