use async_trait::async_trait;
use rand::seq::SliceRandom;

use super::{DocumentHandle, Generator};
use crate::error::Result;
use crate::quiz::{Difficulty, Question, QuestionCount};

/// Offline generator with fixed question pools. The backend is the real thing; this one exists
/// for demos and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct SampleGenerator;

impl SampleGenerator {
    pub fn new() -> Self {
        Self
    }

    /// A shuffled draw from the pool, never more than the pool holds.
    pub fn draw(count: QuestionCount, difficulty: Difficulty) -> Vec<Question> {
        let mut pool = pool(difficulty);
        pool.shuffle(&mut rand::thread_rng());
        pool.truncate(count.get() as usize);
        pool
    }
}

#[async_trait]
impl Generator for SampleGenerator {
    async fn summarize_document(&self, file: &DocumentHandle) -> Result<String> {
        Ok(format!(
            "This PDF document ({}) covers key concepts in the uploaded material. The main themes \
             include comprehensive analysis of the subject matter, detailed explanations of core \
             principles, and practical applications.",
            file.file_name
        ))
    }

    async fn summarize_video(&self, url: &str) -> Result<String> {
        Ok(format!(
            "This YouTube video ({url}) presents educational content with clear explanations and \
             visual demonstrations. The main points covered include step-by-step processes, \
             expert insights, and practical examples."
        ))
    }

    async fn generate_quiz_from_document(
        &self,
        _file: &DocumentHandle,
        _topic: Option<&str>,
        count: QuestionCount,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>> {
        Ok(Self::draw(count, difficulty))
    }

    async fn generate_quiz_from_video(
        &self,
        _url: &str,
        _topic: Option<&str>,
        count: QuestionCount,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>> {
        Ok(Self::draw(count, difficulty))
    }

    async fn generate_quiz_from_search(
        &self,
        _query: &str,
        count: QuestionCount,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>> {
        Ok(Self::draw(count, difficulty))
    }
}

fn pool(difficulty: Difficulty) -> Vec<Question> {
    use Difficulty::*;
    match difficulty {
        Easy => vec![
            Question::new(1, "What is the main topic discussed in the content?", ["Technology", "Science", "History", "Literature"], 0, Easy),
            Question::new(2, "Which field is primarily covered?", ["Medicine", "Engineering", "Arts", "Business"], 1, Easy),
            Question::new(3, "What type of content is this?", ["Educational", "Entertainment", "News", "Fiction"], 0, Easy),
            Question::new(4, "Is this content factual or opinion-based?", ["Factual", "Opinion", "Mixed", "Unclear"], 0, Easy),
            Question::new(5, "What is the primary format of the content?", ["Text", "Video", "Audio", "Interactive"], 0, Easy),
        ],
        Medium => vec![
            Question::new(6, "Which concept is most emphasized in the content?", ["Innovation", "Tradition", "Analysis", "Implementation"], 2, Medium),
            Question::new(7, "What methodology is primarily discussed?", ["Qualitative research", "Quantitative analysis", "Mixed methods", "Theoretical framework"], 1, Medium),
            Question::new(8, "How does the content approach problem-solving?", ["Systematic", "Creative", "Traditional", "Experimental"], 0, Medium),
            Question::new(9, "What is the scope of the discussion?", ["Local", "Regional", "National", "Global"], 3, Medium),
            Question::new(10, "Which stakeholders are primarily addressed?", ["Students", "Professionals", "Researchers", "General public"], 2, Medium),
        ],
        Hard => vec![
            Question::new(11, "What are the underlying theoretical implications of the presented framework?", ["Paradigm shift in methodology", "Incremental improvement", "Validation of existing theories", "Complete theoretical overhaul"], 0, Hard),
            Question::new(12, "How do the presented findings challenge conventional wisdom?", ["They don't challenge it", "Partial contradiction", "Complete refutation", "Contextual disagreement"], 2, Hard),
            Question::new(13, "What are the epistemological foundations of the arguments presented?", ["Empiricism", "Rationalism", "Constructivism", "Pragmatism"], 2, Hard),
            Question::new(14, "Which critical analysis framework best applies to this content?", ["Deconstructive", "Comparative", "Systematic", "Meta-analytical"], 3, Hard),
            Question::new(15, "What are the long-term implications for the field discussed?", ["Minimal impact", "Moderate evolution", "Significant transformation", "Revolutionary change"], 2, Hard),
        ],
    }
}
