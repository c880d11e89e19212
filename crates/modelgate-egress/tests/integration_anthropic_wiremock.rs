//! Integration tests for the Anthropic adapter using wiremock
//!
//! These tests mock the Anthropic Messages API to verify header handling,
//! system-message lifting, and response normalization.

use modelgate_egress::anthropic::{AnthropicConfig, AnthropicConnector};
use modelgate_core::{
    chat::{ChatRequest, Message, Role},
    provider::{LlmProvider, ProviderId},
    Error,
};
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn connector(mock_server: &MockServer) -> AnthropicConnector {
    let config = AnthropicConfig::new("test-key").with_base_url(mock_server.uri());
    AnthropicConnector::new(config).unwrap()
}

fn chat_request(messages: Vec<Message>) -> ChatRequest {
    ChatRequest {
        provider: ProviderId::Anthropic,
        model: Some("claude-3-opus".to_string()),
        messages,
        temperature: Some(0.7),
        max_tokens: Some(200),
        top_p: None,
        seed: None,
    }
}

#[tokio::test]
async fn test_messages_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(serde_json::json!({
            "model": "claude-3-opus",
            "max_tokens": 200,
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "msg_01ABC",
            "type": "message",
            "role": "assistant",
            "content": [
                { "type": "text", "text": "Hello from mock Anthropic!" }
            ],
            "model": "claude-3-opus-20240229",
            "stop_reason": "end_turn",
            "usage": { "input_tokens": 12, "output_tokens": 8 }
        })))
        .mount(&mock_server)
        .await;

    let response = connector(&mock_server)
        .complete(chat_request(vec![Message::new(Role::User, "Hello!")]))
        .await
        .unwrap();

    assert_eq!(response.id, "msg_01ABC");
    assert_eq!(response.object, "message");
    assert_eq!(response.provider, ProviderId::Anthropic);
    assert_eq!(response.model, "claude-3-opus");
    assert_eq!(response.choices.len(), 1);
    assert_eq!(
        response.choices[0].message.content,
        "Hello from mock Anthropic!"
    );
    assert_eq!(response.choices[0].finish_reason, Some("end_turn".to_string()));

    // input/output token counts remap onto the canonical usage fields.
    let usage = response.usage.unwrap();
    assert_eq!(usage.prompt_tokens, 12);
    assert_eq!(usage.completion_tokens, None);
    assert_eq!(usage.total_tokens, 20);
}

#[tokio::test]
async fn test_messages_lifts_system_prompt() {
    let mock_server = MockServer::start().await;

    // The system turn moves into the top-level parameter and out of messages.
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(serde_json::json!({
            "system": "You are terse.",
            "messages": [
                { "role": "user", "content": "Hello!" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "msg_02",
            "type": "message",
            "role": "assistant",
            "content": [{ "type": "text", "text": "Hi." }],
            "model": "claude-3-opus-20240229",
            "stop_reason": "end_turn",
            "usage": { "input_tokens": 5, "output_tokens": 2 }
        })))
        .mount(&mock_server)
        .await;

    let response = connector(&mock_server)
        .complete(chat_request(vec![
            Message::new(Role::System, "You are terse."),
            Message::new(Role::User, "Hello!"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.choices[0].message.content, "Hi.");
}

#[tokio::test]
async fn test_messages_multiple_content_blocks_become_choices() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "msg_03",
            "type": "message",
            "role": "assistant",
            "content": [
                { "type": "text", "text": "First." },
                { "type": "text", "text": "Second." }
            ],
            "model": "claude-3-opus-20240229",
            "stop_reason": "end_turn",
            "usage": { "input_tokens": 3, "output_tokens": 6 }
        })))
        .mount(&mock_server)
        .await;

    let response = connector(&mock_server)
        .complete(chat_request(vec![Message::new(Role::User, "Hello!")]))
        .await
        .unwrap();

    assert_eq!(response.choices.len(), 2);
    assert_eq!(response.choices[0].index, 0);
    assert_eq!(response.choices[0].message.content, "First.");
    assert_eq!(response.choices[1].index, 1);
    assert_eq!(response.choices[1].message.content, "Second.");
}

#[tokio::test]
async fn test_messages_upstream_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "type": "error",
            "error": {
                "type": "invalid_request_error",
                "message": "max_tokens: must be positive"
            }
        })))
        .mount(&mock_server)
        .await;

    let result = connector(&mock_server)
        .complete(chat_request(vec![Message::new(Role::User, "Hello!")]))
        .await;

    assert!(matches!(result, Err(Error::Provider(_))));
}
