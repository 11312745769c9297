use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use quiz_summarizer::error::{GenerationError, Result};
use quiz_summarizer::generation::{DocumentHandle, Generator};
use quiz_summarizer::quiz::{Difficulty, Question, QuestionCount};
use quiz_summarizer::wizard::GenerationRequest;

/// What the next generator call answers with.
pub enum Reply {
    Summary(String),
    Questions(Vec<Question>),
    Fail,
}

/// Generator that records every call and answers from a script.
#[derive(Default)]
pub struct RecordingGenerator {
    calls: Mutex<Vec<GenerationRequest>>,
    replies: Mutex<VecDeque<Reply>>,
}

impl RecordingGenerator {
    pub fn replying(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            calls: Mutex::default(),
            replies: Mutex::new(replies.into_iter().collect()),
        }
    }

    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, request: GenerationRequest) -> Option<Reply> {
        self.calls.lock().unwrap().push(request);
        self.replies.lock().unwrap().pop_front()
    }

    fn summary(&self, request: GenerationRequest) -> Result<String> {
        match self.record(request) {
            Some(Reply::Summary(text)) => Ok(text),
            _ => Err(failure()),
        }
    }

    fn questions(&self, request: GenerationRequest) -> Result<Vec<Question>> {
        match self.record(request) {
            Some(Reply::Questions(questions)) => Ok(questions),
            _ => Err(failure()),
        }
    }
}

fn failure() -> GenerationError {
    GenerationError::Backend {
        status: 500,
        detail: "scripted failure".to_string(),
    }
}

#[async_trait]
impl Generator for RecordingGenerator {
    async fn summarize_document(&self, file: &DocumentHandle) -> Result<String> {
        self.summary(GenerationRequest::SummarizeDocument { file: file.clone() })
    }

    async fn summarize_video(&self, url: &str) -> Result<String> {
        self.summary(GenerationRequest::SummarizeVideo {
            url: url.to_string(),
        })
    }

    async fn generate_quiz_from_document(
        &self,
        file: &DocumentHandle,
        topic: Option<&str>,
        count: QuestionCount,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>> {
        self.questions(GenerationRequest::QuizFromDocument {
            file: file.clone(),
            topic: topic.map(str::to_string),
            count,
            difficulty,
        })
    }

    async fn generate_quiz_from_video(
        &self,
        url: &str,
        topic: Option<&str>,
        count: QuestionCount,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>> {
        self.questions(GenerationRequest::QuizFromVideo {
            url: url.to_string(),
            topic: topic.map(str::to_string),
            count,
            difficulty,
        })
    }

    async fn generate_quiz_from_search(
        &self,
        query: &str,
        count: QuestionCount,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>> {
        self.questions(GenerationRequest::QuizFromSearch {
            query: query.to_string(),
            count,
            difficulty,
        })
    }
}

pub fn questions(n: u32) -> Vec<Question> {
    (1..=n)
        .map(|id| {
            Question::new(
                id,
                &format!("Question {id}?"),
                ["first", "second", "third", "fourth"],
                (id as usize) % 4,
                Difficulty::Medium,
            )
        })
        .collect()
}
