use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{DocumentHandle, Generator, TopicQuizWriter, PDF_MIME};
use crate::error::{GenerationError, Result};
use crate::quiz::{Difficulty, Question, QuestionCount};

/// Client for the summarization / quiz backend.
pub struct BackendClient {
    client: Client,
    base_url: String,
    topic_writer: Option<TopicQuizWriter>,
}

#[derive(Serialize)]
struct VideoSummaryRequest<'a> {
    url: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoQuizRequest<'a> {
    url: &'a str,
    specific_area: &'a str,
    no: u32,
    difficulty: Difficulty,
}

#[derive(Serialize)]
struct SearchQuizRequest<'a> {
    query: &'a str,
    no: u32,
    difficulty: Difficulty,
}

#[derive(Deserialize)]
struct SummaryResponse {
    summary: String,
}

#[derive(Deserialize)]
struct QuizResponse {
    quiz: Vec<Question>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    detail: serde_json::Value,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            topic_writer: None,
        })
    }

    /// Routes web search quizzes through ChatGPT instead of `/quiz/search`.
    pub fn with_topic_writer(mut self, writer: TopicQuizWriter) -> Self {
        self.topic_writer = Some(writer);
        self
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }

    async fn document_part(file: &DocumentHandle) -> Result<multipart::Part> {
        let bytes = tokio::fs::read(&file.path).await?;
        Ok(multipart::Part::bytes(bytes)
            .file_name(file.file_name.clone())
            .mime_str(PDF_MIME)?)
    }
}

#[async_trait]
impl Generator for BackendClient {
    async fn summarize_document(&self, file: &DocumentHandle) -> Result<String> {
        log::info!("Summarizing document {}", file.file_name);
        let form = multipart::Form::new().part("file", Self::document_part(file).await?);
        let response = self
            .client
            .post(self.url("/summary/pdf"))
            .multipart(form)
            .send()
            .await?;
        let body: SummaryResponse = read_json(response).await?;
        Ok(body.summary)
    }

    async fn summarize_video(&self, url: &str) -> Result<String> {
        log::info!("Summarizing video {url}");
        let response = self
            .client
            .post(self.url("/summary/youtube"))
            .json(&VideoSummaryRequest { url })
            .send()
            .await?;
        let body: SummaryResponse = read_json(response).await?;
        Ok(body.summary)
    }

    async fn generate_quiz_from_document(
        &self,
        file: &DocumentHandle,
        topic: Option<&str>,
        count: QuestionCount,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>> {
        log::info!(
            "Generating {} {} questions from {}",
            count.get(),
            difficulty.as_str(),
            file.file_name
        );
        let form = multipart::Form::new()
            .part("file", Self::document_part(file).await?)
            .text("specificArea", topic.unwrap_or_default().to_string())
            .text("no", count.get().to_string())
            .text("difficulty", difficulty.as_str());
        let response = self
            .client
            .post(self.url("/quiz/pdf"))
            .multipart(form)
            .send()
            .await?;
        let body: QuizResponse = read_json(response).await?;
        Ok(body.quiz)
    }

    async fn generate_quiz_from_video(
        &self,
        url: &str,
        topic: Option<&str>,
        count: QuestionCount,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>> {
        log::info!(
            "Generating {} {} questions from video {url}",
            count.get(),
            difficulty.as_str()
        );
        let request = VideoQuizRequest {
            url,
            specific_area: topic.unwrap_or_default(),
            no: count.get(),
            difficulty,
        };
        let response = self
            .client
            .post(self.url("/quiz/youtube"))
            .json(&request)
            .send()
            .await?;
        let body: QuizResponse = read_json(response).await?;
        Ok(body.quiz)
    }

    async fn generate_quiz_from_search(
        &self,
        query: &str,
        count: QuestionCount,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>> {
        if let Some(writer) = &self.topic_writer {
            return writer.write_quiz(query, count, difficulty).await;
        }

        log::info!(
            "Generating {} {} questions about {query:?}",
            count.get(),
            difficulty.as_str()
        );
        let request = SearchQuizRequest {
            query,
            no: count.get(),
            difficulty,
        };
        let response = self
            .client
            .post(self.url("/quiz/search"))
            .json(&request)
            .send()
            .await?;
        let body: QuizResponse = read_json(response).await?;
        Ok(body.quiz)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        log::warn!("Backend answered {status}: {body}");
        return Err(GenerationError::Backend {
            status: status.as_u16(),
            detail: error_detail(&body),
        });
    }
    Ok(serde_json::from_str(&body)?)
}

/// FastAPI puts the reason under `detail`, either as text or as a validation list.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse {
            detail: serde_json::Value::String(text),
        }) => text,
        Ok(ErrorResponse { detail }) => detail.to_string(),
        Err(_) => body.trim().to_string(),
    }
}
