/// Integration tests with a mocked Gemini API
/// Exercises the grounded Q&A path without hitting the real model
use loan_match_api::assistant::Assistant;
use loan_match_api::gemini_client::GeminiClient;
use loan_match_api::llm::{ChatModel, ModelError, ModelTurn};
use loan_match_api::models::{AnswerSource, ChatRole, ChatTurn, Product};
use loan_match_api::responder::generate_smart_response;
use loan_match_api::seed::load_seed_products;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

fn client(server: &MockServer, timeout: Duration) -> GeminiClient {
    GeminiClient::new(
        "test-key".to_string(),
        "gemini-1.5-flash".to_string(),
        format!("{}/v1beta", server.uri()),
        timeout,
    )
    .unwrap()
}

fn assistant(server: &MockServer) -> Assistant {
    let model: Arc<dyn ChatModel> = Arc::new(client(server, Duration::from_secs(5)));
    Assistant::new(Some(model))
}

fn hdfc() -> Product {
    load_seed_products()
        .unwrap()
        .into_iter()
        .find(|p| p.name == "HDFC Personal Loan Express")
        .unwrap()
}

fn candidate(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [
            { "content": { "role": "model", "parts": [ { "text": text } ] } }
        ]
    })
}

#[tokio::test]
async fn test_gemini_success_returns_model_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate(
            "The HDFC Personal Loan Express has an APR of 10.5%.",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let answer = assistant(&mock_server)
        .generate_ai_response(&hdfc(), "What is the APR?", &[])
        .await;

    assert_eq!(answer.source, AnswerSource::Gemini);
    assert_eq!(
        answer.response,
        "The HDFC Personal Loan Express has an APR of 10.5%."
    );
}

#[tokio::test]
async fn test_request_carries_seed_history_and_question() {
    let mock_server = MockServer::start().await;

    // grounding prompt, acknowledgement, two history turns, then the question
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(body_partial_json(serde_json::json!({
            "contents": [
                { "role": "user" },
                { "role": "model" },
                { "role": "user", "parts": [ { "text": "Hi" } ] },
                { "role": "model", "parts": [ { "text": "Hello! Ask me anything." } ] },
                { "role": "user", "parts": [ { "text": "Can I prepay?" } ] }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("Yes.")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let history = vec![
        ChatTurn {
            role: ChatRole::User,
            content: "Hi".to_string(),
        },
        ChatTurn {
            role: ChatRole::Assistant,
            content: "Hello! Ask me anything.".to_string(),
        },
    ];

    let answer = assistant(&mock_server)
        .generate_ai_response(&hdfc(), "Can I prepay?", &history)
        .await;
    assert_eq!(answer.source, AnswerSource::Gemini);
    assert_eq!(answer.response, "Yes.");
}

#[tokio::test]
async fn test_gemini_server_error_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let question = "What documents do I need?";
    let answer = assistant(&mock_server)
        .generate_ai_response(&hdfc(), question, &[])
        .await;

    assert_eq!(answer.source, AnswerSource::Fallback);
    assert_eq!(answer.response, generate_smart_response(&hdfc(), question));
}

#[tokio::test]
async fn test_malformed_body_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let answer = assistant(&mock_server)
        .generate_ai_response(&hdfc(), "What is the interest rate?", &[])
        .await;
    assert_eq!(answer.source, AnswerSource::Fallback);
}

#[tokio::test]
async fn test_empty_candidates_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
        )
        .mount(&mock_server)
        .await;

    let result = client(&mock_server, Duration::from_secs(5))
        .complete(&[ModelTurn::user("context")], "question")
        .await;
    assert!(matches!(result, Err(ModelError::EmptyResponse)));

    let answer = assistant(&mock_server)
        .generate_ai_response(&hdfc(), "What is the interest rate?", &[])
        .await;
    assert_eq!(answer.source, AnswerSource::Fallback);
}

#[tokio::test]
async fn test_status_error_keeps_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server, Duration::from_secs(5))
        .complete(&[], "question")
        .await;
    match result {
        Err(ModelError::Status { status, body }) => {
            assert_eq!(status, 429);
            assert_eq!(body, "quota exceeded");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_model_times_out_and_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(candidate("too late"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let slow_client = client(&mock_server, Duration::from_millis(200));
    let result = slow_client.complete(&[], "question").await;
    assert!(matches!(result, Err(ModelError::Timeout)));

    let model: Arc<dyn ChatModel> = Arc::new(slow_client);
    let answer = Assistant::new(Some(model))
        .generate_ai_response(&hdfc(), "What is the interest rate?", &[])
        .await;
    assert_eq!(answer.source, AnswerSource::Fallback);
}

#[tokio::test]
async fn test_api_key_stays_out_of_url_and_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("ok")))
        .mount(&mock_server)
        .await;

    client(&mock_server, Duration::from_secs(5))
        .complete(&[], "question")
        .await
        .unwrap();
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), None);

    // nothing listens on port 1
    let unreachable = GeminiClient::new(
        "SECRET-KEY-123".to_string(),
        "gemini-1.5-flash".to_string(),
        "http://127.0.0.1:1/v1beta".to_string(),
        Duration::from_secs(2),
    )
    .unwrap();
    let err = unreachable.complete(&[], "question").await.unwrap_err();
    assert!(matches!(err, ModelError::Http(_)));
    let message = err.to_string();
    assert!(!message.contains("SECRET-KEY-123"));
    assert!(!message.contains("generateContent"));

    let model: Arc<dyn ChatModel> = Arc::new(unreachable);
    let answer = Assistant::new(Some(model))
        .generate_ai_response(&hdfc(), "What is the interest rate?", &[])
        .await;
    assert_eq!(answer.source, AnswerSource::Fallback);
}

#[tokio::test]
async fn test_unconfigured_matches_rule_based_answer() {
    let product = hdfc();
    for question in [
        "What documents do I need?",
        "Am I eligible?",
        "Tell me something",
    ] {
        let answer = Assistant::unconfigured()
            .generate_ai_response(&product, question, &[])
            .await;
        assert_eq!(answer.source, AnswerSource::Fallback);
        assert_eq!(answer.response, generate_smart_response(&product, question));
    }
}
