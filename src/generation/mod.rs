//! Collaborators that turn validated wizard input into a summary or a question list.
//!
//! The wizard only ever talks to [`Generator`]; which implementation sits behind it is
//! decided once at startup from [`crate::config::Config`].

pub mod backend;
pub mod sample;
pub mod topic;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Config, GeneratorKind};
use crate::error::Result;
use crate::quiz::{Difficulty, Question, QuestionCount};

pub use backend::BackendClient;
pub use sample::SampleGenerator;
pub use topic::TopicQuizWriter;

pub const PDF_MIME: &str = "application/pdf";

/// A document the presentation layer has already stored locally.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DocumentHandle {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
}

impl DocumentHandle {
    pub fn new(path: impl Into<PathBuf>, file_name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            path: path.into(),
            file_name: file_name.into(),
            size_bytes,
        }
    }

    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0 / 1024.0
    }
}

/// Only PDFs under the size ceiling are accepted as uploads.
pub fn is_pdf_upload(mime: Option<&str>, size_bytes: u64, max_bytes: u64) -> bool {
    mime == Some(PDF_MIME) && size_bytes <= max_bytes
}

#[async_trait]
pub trait Generator: Send + Sync {
    async fn summarize_document(&self, file: &DocumentHandle) -> Result<String>;

    async fn summarize_video(&self, url: &str) -> Result<String>;

    async fn generate_quiz_from_document(
        &self,
        file: &DocumentHandle,
        topic: Option<&str>,
        count: QuestionCount,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>>;

    async fn generate_quiz_from_video(
        &self,
        url: &str,
        topic: Option<&str>,
        count: QuestionCount,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>>;

    async fn generate_quiz_from_search(
        &self,
        query: &str,
        count: QuestionCount,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>>;
}

/// Builds the generator the configuration asks for.
pub fn from_config(config: &Config) -> Result<Arc<dyn Generator>> {
    match config.generator {
        GeneratorKind::Sample => {
            log::warn!("Using the offline sample generator, answers are canned");
            Ok(Arc::new(SampleGenerator::new()))
        }
        GeneratorKind::Backend => {
            let mut client = BackendClient::new(&config.backend_url, config.request_timeout)?;
            if let Some(key) = &config.chatgpt_api_key {
                log::info!("Web search quizzes will be written by ChatGPT");
                client = client.with_topic_writer(TopicQuizWriter::from_api_key(key)?);
            }
            Ok(Arc::new(client))
        }
    }
}
