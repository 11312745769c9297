use std::io::Write;

use quiz_summarizer::error::GenerationError;
use quiz_summarizer::generation::{BackendClient, DocumentHandle, Generator};
use quiz_summarizer::quiz::{Difficulty, QuestionCount};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn quiz_body() -> serde_json::Value {
    json!({
        "quiz": [
            {
                "id": 1,
                "question": "What colour is the sky?",
                "options": ["Red", "Blue", "Green", "Black"],
                "correct": 1,
                "difficulty": "easy"
            },
            {
                "id": 2,
                "question": "How many legs does a spider have?",
                "options": ["Six", "Four", "Eight", "Ten"],
                "correct": 2,
                "difficulty": "Easy"
            }
        ]
    })
}

fn temp_pdf(name: &str) -> DocumentHandle {
    let path = std::env::temp_dir().join(format!("{}-{name}", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"%PDF-1.4 fake").unwrap();
    DocumentHandle::new(path, name, 13)
}

#[tokio::test]
async fn video_summary_posts_the_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summary/youtube"))
        .and(body_json(json!({ "url": "https://youtu.be/abc" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "summary": "A video." })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(&server.uri(), None).unwrap();
    let summary = client.summarize_video("https://youtu.be/abc").await.unwrap();
    assert_eq!(summary, "A video.");
}

#[tokio::test]
async fn video_quiz_sends_settings_and_parses_questions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/quiz/youtube"))
        .and(body_json(json!({
            "url": "https://youtu.be/abc",
            "specificArea": "Spiders",
            "no": 10,
            "difficulty": "hard"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(quiz_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(&server.uri(), None).unwrap();
    let questions = client
        .generate_quiz_from_video(
            "https://youtu.be/abc",
            Some("Spiders"),
            QuestionCount::Ten,
            Difficulty::Hard,
        )
        .await
        .unwrap();

    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].prompt, "What colour is the sky?");
    assert_eq!(questions[1].correct_option, 2);
    assert_eq!(questions[1].difficulty, Difficulty::Easy);
}

#[tokio::test]
async fn document_summary_uploads_the_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summary/pdf"))
        .and(header_exists("content-type"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("%PDF-1.4 fake"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "summary": "A book." })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(&server.uri(), None).unwrap();
    let summary = client
        .summarize_document(&temp_pdf("summary.pdf"))
        .await
        .unwrap();
    assert_eq!(summary, "A book.");
}

#[tokio::test]
async fn document_quiz_sends_form_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/quiz/pdf"))
        .and(body_string_contains("name=\"specificArea\""))
        .and(body_string_contains("name=\"no\""))
        .and(body_string_contains("medium"))
        .respond_with(ResponseTemplate::new(200).set_body_json(quiz_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(&server.uri(), None).unwrap();
    let questions = client
        .generate_quiz_from_document(
            &temp_pdf("quiz.pdf"),
            None,
            QuestionCount::Five,
            Difficulty::Medium,
        )
        .await
        .unwrap();
    assert_eq!(questions.len(), 2);
}

#[tokio::test]
async fn search_quiz_goes_to_the_search_route() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/quiz/search"))
        .and(body_json(json!({ "query": "Volcanoes", "no": 3, "difficulty": "easy" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(quiz_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(&format!("{}/", server.uri()), None).unwrap();
    let questions = client
        .generate_quiz_from_search("Volcanoes", QuestionCount::Three, Difficulty::Easy)
        .await
        .unwrap();
    assert_eq!(questions.len(), 2);
}

#[tokio::test]
async fn error_status_becomes_a_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summary/youtube"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "Invalid YouTube URL" })),
        )
        .mount(&server)
        .await;

    let client = BackendClient::new(&server.uri(), None).unwrap();
    let error = client.summarize_video("not a url").await.unwrap_err();
    match error {
        GenerationError::Backend { status, detail } => {
            assert_eq!(status, 400);
            assert_eq!(detail, "Invalid YouTube URL");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summary/youtube"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = BackendClient::new(&server.uri(), None).unwrap();
    let error = client.summarize_video("https://youtu.be/abc").await.unwrap_err();
    assert!(matches!(error, GenerationError::Json(_)));
}

#[tokio::test]
async fn missing_document_is_an_io_error() {
    let server = MockServer::start().await;
    let client = BackendClient::new(&server.uri(), None).unwrap();
    let missing = DocumentHandle::new("/definitely/not/here.pdf", "here.pdf", 1);
    let error = client.summarize_document(&missing).await.unwrap_err();
    assert!(matches!(error, GenerationError::Io(_)));
}
