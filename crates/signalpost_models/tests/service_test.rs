//! Exercises the text service against a local fake completions endpoint.

use axum::{Json, Router, http::StatusCode, routing::post};
use serde_json::{Value, json};
use signalpost_interface::{TextGenerator, Translator};
use signalpost_models::{ChatClient, ChatClientConfig, OpenAiTextService, PromptTemplates};

/// Echo the prompt back as the completion.
async fn echo(Json(body): Json<Value>) -> Json<Value> {
    let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
    let model = body["model"].as_str().unwrap_or_default();
    Json(json!({
        "id": "test",
        "model": model,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": format!("{model}|{prompt}")},
            "finish_reason": "stop"
        }]
    }))
}

async fn empty(Json(_body): Json<Value>) -> Json<Value> {
    Json(json!({"choices": []}))
}

async fn failing(Json(_body): Json<Value>) -> (StatusCode, &'static str) {
    (StatusCode::TOO_MANY_REQUESTS, "slow down")
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn service(base_url: String) -> OpenAiTextService {
    let config = ChatClientConfig::new(base_url, "test-model").with_api_key("secret");
    OpenAiTextService::new(
        ChatClient::new(config),
        PromptTemplates::new(
            "stats={stats_text};len={text_length}",
            "to={language};note={language_note};text={original_text}",
        ),
    )
}

#[tokio::test]
async fn test_generate_sends_rendered_prompt() {
    let base = serve(Router::new().route("/v1/chat/completions", post(echo))).await;
    let text = service(base).generate("x2 x9", 350).await.unwrap();
    assert_eq!(text, "test-model|stats=x2 x9;len=350");
}

#[tokio::test]
async fn test_translate_sends_rendered_prompt() {
    let base = serve(Router::new().route("/v1/chat/completions", post(echo))).await;
    let text = service(base)
        .translate("English", "Keep slang.", "Привет")
        .await
        .unwrap();
    assert_eq!(text, "test-model|to=English;note=Keep slang.;text=Привет");
}

#[tokio::test]
async fn test_empty_completion_is_an_error() {
    let base = serve(Router::new().route("/v1/chat/completions", post(empty))).await;
    let err = service(base).generate("x", 160).await.unwrap_err();
    assert!(err.to_string().contains("no text"));
}

#[tokio::test]
async fn test_error_status_surfaces_body() {
    let base = serve(Router::new().route("/v1/chat/completions", post(failing))).await;
    let err = service(base).generate("x", 160).await.unwrap_err();
    assert!(err.to_string().contains("slow down"));
}
