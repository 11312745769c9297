use super::{ActionType, ContentSource, GenerationResult};
use crate::error::Result;
use crate::generation::{DocumentHandle, Generator};
use crate::quiz::{validate_questions, Difficulty, QuestionCount, QuizConfig};

/// One collaborator call, fully resolved from the wizard's input and configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    SummarizeDocument {
        file: DocumentHandle,
    },
    SummarizeVideo {
        url: String,
    },
    QuizFromDocument {
        file: DocumentHandle,
        topic: Option<String>,
        count: QuestionCount,
        difficulty: Difficulty,
    },
    QuizFromVideo {
        url: String,
        topic: Option<String>,
        count: QuestionCount,
        difficulty: Difficulty,
    },
    QuizFromSearch {
        query: String,
        count: QuestionCount,
        difficulty: Difficulty,
    },
}

/// Maps (content, action) onto the collaborator operation. Any other pairing plans nothing.
pub fn plan(
    source: &ContentSource,
    action: ActionType,
    config: &QuizConfig,
) -> Option<GenerationRequest> {
    let topic = config.topic_filter().map(str::to_string);
    let count = config.question_count;
    let difficulty = config.difficulty;

    let request = match (source, action) {
        (ContentSource::Pdf { file: Some(file) }, ActionType::Summarize) => {
            GenerationRequest::SummarizeDocument { file: file.clone() }
        }
        (ContentSource::YouTube { url }, ActionType::Summarize) => GenerationRequest::SummarizeVideo {
            url: url.trim().to_string(),
        },
        (ContentSource::Pdf { file: Some(file) }, ActionType::Quiz) => {
            GenerationRequest::QuizFromDocument {
                file: file.clone(),
                topic,
                count,
                difficulty,
            }
        }
        (ContentSource::YouTube { url }, ActionType::Quiz) => GenerationRequest::QuizFromVideo {
            url: url.trim().to_string(),
            topic,
            count,
            difficulty,
        },
        (ContentSource::WebSearch { query }, ActionType::Quiz) => GenerationRequest::QuizFromSearch {
            query: query.trim().to_string(),
            count,
            difficulty,
        },
        _ => return None,
    };
    Some(request)
}

impl GenerationRequest {
    pub async fn execute(&self, generator: &dyn Generator) -> Result<GenerationResult> {
        let result = match self {
            GenerationRequest::SummarizeDocument { file } => {
                GenerationResult::Summary(generator.summarize_document(file).await?)
            }
            GenerationRequest::SummarizeVideo { url } => {
                GenerationResult::Summary(generator.summarize_video(url).await?)
            }
            GenerationRequest::QuizFromDocument {
                file,
                topic,
                count,
                difficulty,
            } => GenerationResult::Questions(
                generator
                    .generate_quiz_from_document(file, topic.as_deref(), *count, *difficulty)
                    .await?,
            ),
            GenerationRequest::QuizFromVideo {
                url,
                topic,
                count,
                difficulty,
            } => GenerationResult::Questions(
                generator
                    .generate_quiz_from_video(url, topic.as_deref(), *count, *difficulty)
                    .await?,
            ),
            GenerationRequest::QuizFromSearch {
                query,
                count,
                difficulty,
            } => GenerationResult::Questions(
                generator
                    .generate_quiz_from_search(query, *count, *difficulty)
                    .await?,
            ),
        };

        if let GenerationResult::Questions(questions) = &result {
            validate_questions(questions)?;
        }
        Ok(result)
    }
}

/// A generation cycle that has been started and must be finished with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationJob {
    request: Option<GenerationRequest>,
}

impl GenerationJob {
    pub(super) fn new(request: Option<GenerationRequest>) -> Self {
        Self { request }
    }

    pub fn request(&self) -> Option<&GenerationRequest> {
        self.request.as_ref()
    }

    pub async fn run(&self, generator: &dyn Generator) -> Result<GenerationResult> {
        match &self.request {
            Some(request) => {
                log::info!("Dispatching {request:?}");
                request.execute(generator).await
            }
            None => {
                log::warn!("No generator operation for this content and action");
                Ok(GenerationResult::Empty)
            }
        }
    }
}
