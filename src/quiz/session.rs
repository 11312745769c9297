use std::collections::HashMap;

use super::{Question, OPTION_COUNT};

/// One attempt at answering a generated question list.
///
/// The pointer always stays inside the list, so a session is never built from an
/// empty list.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "StoredSession")]
pub struct QuizSession {
    questions: Vec<Question>,
    current_index: usize,
    answers: HashMap<u32, usize>,
    completed: bool,
}

/// Shape of a session as it comes back from dialogue storage, checked before use.
#[derive(serde::Deserialize)]
struct StoredSession {
    questions: Vec<Question>,
    current_index: usize,
    answers: HashMap<u32, usize>,
    completed: bool,
}

impl TryFrom<StoredSession> for QuizSession {
    type Error = String;

    fn try_from(stored: StoredSession) -> Result<Self, Self::Error> {
        let len = stored.questions.len();
        let mut session =
            QuizSession::new(stored.questions).ok_or("stored session has no questions")?;
        if stored.current_index >= len {
            return Err(format!(
                "stored session points at question {} of {len}",
                stored.current_index
            ));
        }
        for (&id, &option) in &stored.answers {
            if !session.record_answer(id, option) {
                return Err(format!("stored answer {option} for question {id} is invalid"));
            }
        }
        session.current_index = stored.current_index;
        session.completed = stored.completed;
        Ok(session)
    }
}

impl QuizSession {
    pub fn new(questions: Vec<Question>) -> Option<Self> {
        if questions.is_empty() {
            return None;
        }
        Some(Self {
            questions,
            current_index: 0,
            answers: HashMap::new(),
            completed: false,
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    /// 1-based position of the current question and the total.
    pub fn progress(&self) -> (usize, usize) {
        (self.current_index + 1, self.questions.len())
    }

    pub fn answers(&self) -> &HashMap<u32, usize> {
        &self.answers
    }

    pub fn answer_for(&self, question_id: u32) -> Option<usize> {
        self.answers.get(&question_id).copied()
    }

    /// Upserts an answer. Last write wins, so an answer can be changed before moving on.
    pub fn record_answer(&mut self, question_id: u32, option: usize) -> bool {
        if option >= OPTION_COUNT || !self.questions.iter().any(|q| q.id == question_id) {
            log::debug!("ignoring answer {option} for question {question_id}");
            return false;
        }
        self.answers.insert(question_id, option);
        true
    }

    pub fn answer_current(&mut self, option: usize) -> bool {
        let id = self.current_question().id;
        self.record_answer(id, option)
    }

    /// "Next" is only offered once the current question has an answer.
    pub fn can_advance(&self) -> bool {
        self.answers.contains_key(&self.current_question().id)
    }

    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        if self.is_last_question() {
            self.completed = true;
        } else {
            self.current_index += 1;
        }
        true
    }

    /// Steps back one question. Never reopens a completed session.
    pub fn retreat(&mut self) -> bool {
        if self.current_index == 0 {
            return false;
        }
        self.current_index -= 1;
        true
    }

    pub fn score(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| self.answer_for(q.id) == Some(q.correct_option))
            .count()
    }

    /// Fresh attempt over the same questions.
    pub fn restart(&mut self) {
        self.answers.clear();
        self.current_index = 0;
        self.completed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::Difficulty;

    fn questions(n: u32) -> Vec<Question> {
        (1..=n)
            .map(|id| {
                Question::new(
                    id,
                    format!("Question {id}"),
                    ["a", "b", "c", "d"],
                    (id as usize) % OPTION_COUNT,
                    Difficulty::Medium,
                )
            })
            .collect()
    }

    #[test]
    fn stored_session_round_trips() {
        let mut session = QuizSession::new(questions(3)).unwrap();
        session.answer_current(2);
        session.advance();
        let json = serde_json::to_string(&session).unwrap();
        let restored: QuizSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn stored_session_with_a_stray_pointer_is_rejected() {
        let session = QuizSession::new(questions(1)).unwrap();
        let mut json = serde_json::to_value(&session).unwrap();
        json["current_index"] = serde_json::json!(5);
        assert!(serde_json::from_value::<QuizSession>(json).is_err());
    }

    #[test]
    fn stored_session_without_questions_is_rejected() {
        let json = serde_json::json!({
            "questions": [],
            "current_index": 0,
            "answers": {},
            "completed": false
        });
        assert!(serde_json::from_value::<QuizSession>(json).is_err());
    }

    #[test]
    fn stored_answers_must_belong_to_the_list() {
        let session = QuizSession::new(questions(2)).unwrap();
        let mut json = serde_json::to_value(&session).unwrap();
        json["answers"] = serde_json::json!({ "9": 1 });
        assert!(serde_json::from_value::<QuizSession>(json.clone()).is_err());

        json["answers"] = serde_json::json!({ "1": 7 });
        assert!(serde_json::from_value::<QuizSession>(json).is_err());
    }

    #[test]
    fn empty_list_builds_no_session() {
        assert!(QuizSession::new(Vec::new()).is_none());
    }

    #[test]
    fn advance_requires_an_answer() {
        let mut session = QuizSession::new(questions(3)).unwrap();
        assert!(!session.can_advance());
        assert!(!session.advance());
        assert_eq!(session.current_index(), 0);

        session.answer_current(2);
        assert!(session.advance());
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn advancing_past_the_last_question_completes_without_moving() {
        let mut session = QuizSession::new(questions(3)).unwrap();
        for _ in 0..3 {
            session.answer_current(0);
            assert!(session.advance());
        }
        assert!(session.is_completed());
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn retreat_stops_at_zero_and_keeps_completion() {
        let mut session = QuizSession::new(questions(2)).unwrap();
        assert!(!session.retreat());

        session.answer_current(0);
        session.advance();
        session.answer_current(0);
        session.advance();
        assert!(session.is_completed());

        assert!(session.retreat());
        assert_eq!(session.current_index(), 0);
        assert!(session.is_completed());
    }

    #[test]
    fn last_answer_wins() {
        let mut session = QuizSession::new(questions(1)).unwrap();
        let correct = session.current_question().correct_option;
        session.answer_current((correct + 1) % OPTION_COUNT);
        assert_eq!(session.score(), 0);
        session.answer_current(correct);
        assert_eq!(session.score(), 1);
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn out_of_range_answers_are_refused() {
        let mut session = QuizSession::new(questions(2)).unwrap();
        assert!(!session.record_answer(1, OPTION_COUNT));
        assert!(!session.record_answer(99, 0));
        assert!(session.answers().is_empty());
    }

    #[test]
    fn score_counts_matching_answers_in_any_order() {
        let qs = questions(4);
        let mut session = QuizSession::new(qs.clone()).unwrap();
        // answer in reverse, two right and two wrong
        session.record_answer(4, qs[3].correct_option);
        session.record_answer(3, (qs[2].correct_option + 1) % OPTION_COUNT);
        session.record_answer(2, qs[1].correct_option);
        session.record_answer(1, (qs[0].correct_option + 1) % OPTION_COUNT);
        assert_eq!(session.score(), 2);
    }

    #[test]
    fn restart_clears_answers_but_keeps_questions() {
        let qs = questions(2);
        let mut session = QuizSession::new(qs.clone()).unwrap();
        session.answer_current(1);
        session.advance();
        session.answer_current(1);
        session.advance();

        session.restart();
        assert!(!session.is_completed());
        assert_eq!(session.current_index(), 0);
        assert!(session.answers().is_empty());
        assert_eq!(session.questions(), qs.as_slice());
    }
}
