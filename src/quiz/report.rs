use super::{DifficultyBreakdown, Question, QuizSession};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRow {
    pub number: usize,
    pub prompt: String,
    pub chosen: Option<String>,
    pub correct: String,
    pub is_correct: bool,
}

/// Everything the completion screen shows, recomputed from the session on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizReport {
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub breakdown: DifficultyBreakdown,
    pub review: Vec<ReviewRow>,
}

impl QuizReport {
    pub fn from_session(session: &QuizSession) -> Self {
        let questions = session.questions();
        let score = session.score();
        let total = questions.len();

        let review = questions
            .iter()
            .enumerate()
            .map(|(i, q)| review_row(i + 1, q, session.answer_for(q.id)))
            .collect();

        Self {
            score,
            total,
            percentage: percentage(score, total),
            breakdown: DifficultyBreakdown::of(questions),
            review,
        }
    }
}

fn review_row(number: usize, question: &Question, chosen: Option<usize>) -> ReviewRow {
    ReviewRow {
        number,
        prompt: question.prompt.clone(),
        chosen: chosen.and_then(|i| question.options.get(i).cloned()),
        correct: question.correct_text().to_string(),
        is_correct: chosen.map_or(false, |i| question.is_correct(i)),
    }
}

/// Rounded half-up, like the results screen always showed it.
fn percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((score * 200 + total) / (total * 2)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::Difficulty;

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13); // 12.5
        assert_eq!(percentage(5, 5), 100);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn report_reviews_every_question() {
        let questions = vec![
            Question::new(7, "Capital of France?", ["Paris", "Rome", "Oslo", "Bern"], 0, Difficulty::Easy),
            Question::new(9, "2 ^ 10?", ["512", "1000", "1024", "2048"], 2, Difficulty::Hard),
        ];
        let mut session = QuizSession::new(questions).unwrap();
        session.answer_current(0);
        session.advance();
        session.answer_current(3);
        session.advance();

        let report = QuizReport::from_session(&session);
        assert_eq!(report.score, 1);
        assert_eq!(report.total, 2);
        assert_eq!(report.percentage, 50);
        assert_eq!(report.breakdown.easy, 1);
        assert_eq!(report.breakdown.hard, 1);

        assert!(report.review[0].is_correct);
        assert_eq!(report.review[1].chosen.as_deref(), Some("2048"));
        assert_eq!(report.review[1].correct, "1024");
        assert!(!report.review[1].is_correct);
    }

    #[test]
    fn unanswered_question_has_no_choice() {
        let questions = vec![Question::new(1, "?", ["a", "b", "c", "d"], 1, Difficulty::Medium)];
        let session = QuizSession::new(questions).unwrap();
        let report = QuizReport::from_session(&session);
        assert_eq!(report.review[0].chosen, None);
        assert!(!report.review[0].is_correct);
    }
}
