pub mod report;
pub mod session;

use std::collections::HashSet;
use std::fmt;

use crate::error::GenerationError;

pub use report::{QuizReport, ReviewRow};
pub use session::QuizSession;

/// Every question offers exactly this many options.
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[serde(alias = "Easy")]
    Easy,
    #[default]
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "Hard")]
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Lowercase form the generation backend expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The only question counts the wizard offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum QuestionCount {
    Three,
    #[default]
    Five,
    Ten,
    Fifteen,
    Twenty,
}

impl QuestionCount {
    pub const ALL: [QuestionCount; 5] = [
        QuestionCount::Three,
        QuestionCount::Five,
        QuestionCount::Ten,
        QuestionCount::Fifteen,
        QuestionCount::Twenty,
    ];

    pub fn get(self) -> u32 {
        match self {
            QuestionCount::Three => 3,
            QuestionCount::Five => 5,
            QuestionCount::Ten => 10,
            QuestionCount::Fifteen => 15,
            QuestionCount::Twenty => 20,
        }
    }
}

impl TryFrom<u32> for QuestionCount {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|c| c.get() == value)
            .ok_or_else(|| format!("{value} is not one of 3, 5, 10, 15 or 20"))
    }
}

impl From<QuestionCount> for u32 {
    fn from(count: QuestionCount) -> Self {
        count.get()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuizConfig {
    pub question_count: QuestionCount,
    pub difficulty: Difficulty,
    pub topic_filter: Option<String>,
}

impl QuizConfig {
    /// Stores the topic filter, treating blank input as "no filter".
    pub fn set_topic_filter(&mut self, topic: Option<String>) {
        self.topic_filter = topic
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
    }

    pub fn topic_filter(&self) -> Option<&str> {
        self.topic_filter.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub id: u32,
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: [String; OPTION_COUNT],
    #[serde(rename = "correct")]
    pub correct_option: usize,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl Question {
    pub fn new(
        id: u32,
        prompt: impl Into<String>,
        options: [&str; OPTION_COUNT],
        correct_option: usize,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            options: options.map(String::from),
            correct_option,
            difficulty,
        }
    }

    pub fn is_correct(&self, option: usize) -> bool {
        self.correct_option == option
    }

    pub fn correct_text(&self) -> &str {
        // validate_questions keeps correct_option in range for anything we accept
        self.options
            .get(self.correct_option)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// Checks the guarantees a generated list must carry: unique ids and an in-range correct index.
/// The option count is already enforced by the array type.
pub fn validate_questions(questions: &[Question]) -> Result<(), GenerationError> {
    let mut seen = HashSet::with_capacity(questions.len());
    for question in questions {
        if !seen.insert(question.id) {
            return Err(GenerationError::InvalidQuiz(format!(
                "duplicate question id {}",
                question.id
            )));
        }
        if question.correct_option >= OPTION_COUNT {
            return Err(GenerationError::InvalidQuiz(format!(
                "question {} marks option {} as correct",
                question.id, question.correct_option
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DifficultyBreakdown {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl DifficultyBreakdown {
    pub fn of(questions: &[Question]) -> Self {
        questions
            .iter()
            .fold(Self::default(), |mut acc, q| {
                match q.difficulty {
                    Difficulty::Easy => acc.easy += 1,
                    Difficulty::Medium => acc.medium += 1,
                    Difficulty::Hard => acc.hard += 1,
                }
                acc
            })
    }
}
