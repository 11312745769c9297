use chatgpt::prelude::*;
use chatgpt::types::CompletionResponse;

use crate::error::{GenerationError, Result};
use crate::quiz::{Difficulty, Question, QuestionCount};

/// Writes web search quizzes with ChatGPT.
pub struct TopicQuizWriter {
    chat_gpt: ChatGPT,
}

impl TopicQuizWriter {
    pub fn new(chat_gpt: ChatGPT) -> Self {
        Self { chat_gpt }
    }

    pub fn from_api_key(api_key: &str) -> Result<Self> {
        let mut chat_gpt = ChatGPT::new(api_key)?;
        chat_gpt.config.engine = ChatGPTEngine::Gpt35Turbo;
        chat_gpt.config.timeout = std::time::Duration::from_secs(60);
        Ok(Self::new(chat_gpt))
    }

    pub async fn write_quiz(
        &self,
        topic: &str,
        count: QuestionCount,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>> {
        log::info!("Asking ChatGPT for {} questions about {topic:?}", count.get());
        let prompt = quiz_prompt(topic, count, difficulty);

        let response: CompletionResponse = self.chat_gpt.send_message(&prompt).await?;
        let content = &response.message().content;
        log::debug!("Completion: {content:?}");

        parse_quiz_reply(content)
    }
}

fn quiz_prompt(topic: &str, count: QuestionCount, difficulty: Difficulty) -> String {
    let difficulty = difficulty.as_str();
    format!(
        "You are a quiz generation bot. Generate a properly formatted JSON array of quiz questions.

Constraints:
- Topic: {topic}
- Number of Questions: {count}
- Difficulty: {difficulty}

Use what is currently known about the topic and cover different aspects of it.

IMPORTANT: Your response must be ONLY a JSON array in this exact format with no additional text:
[
  {{
    \"id\": 1,
    \"question\": \"Question text here\",
    \"options\": [\"Option A\", \"Option B\", \"Option C\", \"Option D\"],
    \"correct\": 0,
    \"difficulty\": \"{difficulty}\"
  }}
]

Do not include any other text, explanation, or formatting outside the JSON array.",
        count = count.get(),
    )
}

/// Pulls the outermost JSON array out of a reply, tolerating code fences and chatter around it.
/// Ids are renumbered from 1 since the model does not reliably keep them unique.
fn parse_quiz_reply(reply: &str) -> Result<Vec<Question>> {
    let payload = extract_json_array(reply).ok_or_else(|| {
        GenerationError::InvalidQuiz("model did not return a JSON array".to_string())
    })?;
    let mut questions: Vec<Question> = serde_json::from_str(payload)?;
    for (id, question) in (1..).zip(questions.iter_mut()) {
        question.id = id;
    }
    Ok(questions)
}

fn extract_json_array(reply: &str) -> Option<&str> {
    let start = reply.find('[')?;
    let end = reply.rfind(']')?;
    (start < end).then(|| &reply[start..=end])
}
