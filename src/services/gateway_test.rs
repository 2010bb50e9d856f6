use std::sync::Arc;

use super::*;
use crate::llm::types::Completion;
use crate::state::test_helpers::{MockLlm, completion};

fn provider(mock: &Arc<MockLlm>) -> Option<&dyn LlmChat> {
    let llm: &dyn LlmChat = mock.as_ref();
    Some(llm)
}

fn valid_request() -> GenerateRequest {
    GenerateRequest {
        system_prompt: Some("You are helpful.".into()),
        user_prompt: Some("Say hi".into()),
        model: Some("gpt-4".into()),
        temperature: Some(0.9),
        max_tokens: Some(200),
        presence_penalty: Some(0.5),
        frequency_penalty: Some(0.25),
        stop_sequence: Some(String::new()),
    }
}

// =============================================================================
// validation
// =============================================================================

#[tokio::test]
async fn missing_prompts_fail_validation_without_calling_provider() {
    let mock = Arc::new(MockLlm::replying("never"));
    let cases = [
        GenerateRequest { system_prompt: None, ..valid_request() },
        GenerateRequest { user_prompt: None, ..valid_request() },
        GenerateRequest { system_prompt: Some(String::new()), ..valid_request() },
        GenerateRequest { user_prompt: Some(String::new()), ..valid_request() },
        GenerateRequest::default(),
    ];
    for request in cases {
        let err = generate(provider(&mock), &request).await.unwrap_err();
        assert!(matches!(err, GatewayError::Validation));
    }
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn validation_is_checked_before_configuration() {
    let err = generate(None, &GenerateRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Validation));
}

#[tokio::test]
async fn missing_provider_is_configuration_error() {
    let err = generate(None, &valid_request()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Configuration));
    assert_eq!(err.to_string(), "OpenAI API key is not configured");
}

// =============================================================================
// forwarding
// =============================================================================

#[tokio::test]
async fn forwards_parameters_verbatim() {
    let mock = Arc::new(MockLlm::replying("hello"));
    let resp = generate(provider(&mock), &valid_request())
        .await
        .unwrap();
    assert_eq!(resp.output, "hello");
    assert_eq!(resp.usage.unwrap()["total_tokens"], 5);

    let sent = mock.last_request().unwrap();
    assert_eq!(sent.model, "gpt-4");
    assert_eq!(sent.messages, vec![ChatMessage::system("You are helpful."), ChatMessage::user("Say hi")]);
    assert_eq!(sent.temperature, Some(0.9));
    assert_eq!(sent.max_tokens, Some(200));
    assert_eq!(sent.presence_penalty, Some(0.5));
    assert_eq!(sent.frequency_penalty, Some(0.25));
}

#[tokio::test]
async fn absent_model_uses_provider_default() {
    let mock = Arc::new(MockLlm::replying("ok"));
    let request = GenerateRequest { model: None, temperature: None, ..valid_request() };
    generate(provider(&mock), &request).await.unwrap();

    let sent = mock.last_request().unwrap();
    assert_eq!(sent.model, "mock-model");
    assert!(sent.temperature.is_none());
}

#[test]
fn blank_stop_sequence_is_not_forwarded() {
    for stop in [None, Some(String::new()), Some("   \n".to_string())] {
        let request = GenerateRequest { stop_sequence: stop, ..valid_request() };
        let built = build_completion_request(&request, "s", "u", "m");
        assert!(built.stop.is_none());
    }
}

#[test]
fn stop_sequence_is_trimmed_into_single_entry() {
    let request = GenerateRequest { stop_sequence: Some("  ###  ".into()), ..valid_request() };
    let built = build_completion_request(&request, "s", "u", "m");
    assert_eq!(built.stop, Some(vec!["###".to_string()]));
}

#[tokio::test]
async fn empty_completion_falls_back_to_literal() {
    let mock = Arc::new(MockLlm::new(vec![Ok(Completion { content: None, ..completion("") })]));
    let resp = generate(provider(&mock), &valid_request())
        .await
        .unwrap();
    assert_eq!(resp.output, NO_RESPONSE_FALLBACK);
}

// =============================================================================
// provider failures
// =============================================================================

#[tokio::test]
async fn provider_error_message_is_relayed() {
    let mock = Arc::new(MockLlm::new(vec![Err(LlmError::ApiResponse {
        status: 401,
        body: r#"{"error":{"message":"Incorrect API key provided"}}"#.into(),
    })]));
    let err = generate(provider(&mock), &valid_request())
        .await
        .unwrap_err();
    assert!(matches!(&err, GatewayError::Provider(msg) if msg == "Incorrect API key provided"));
}

#[tokio::test]
async fn transport_error_is_provider_error() {
    let mock = Arc::new(MockLlm::new(vec![Err(LlmError::ApiRequest("connection reset".into()))]));
    let err = generate(provider(&mock), &valid_request())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("connection reset"));
}

#[tokio::test]
async fn messageless_failure_is_unknown_error() {
    let mock = Arc::new(MockLlm::new(vec![Err(LlmError::ApiResponse { status: 500, body: String::new() })]));
    let err = generate(provider(&mock), &valid_request())
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Unknown));
    assert_eq!(err.to_string(), "An unknown error occurred");
}

// =============================================================================
// GenerateRequest
// =============================================================================

#[test]
fn request_from_config_copies_every_field() {
    let config = PromptConfig { stop_sequence: "END".into(), ..PromptConfig::default() };
    let request = GenerateRequest::from(&config);
    assert_eq!(request.user_prompt.as_deref(), Some(config.user_prompt.as_str()));
    assert_eq!(request.model.as_deref(), Some("gpt-3.5-turbo"));
    assert_eq!(request.max_tokens, Some(150));
    assert_eq!(request.stop_sequence.as_deref(), Some("END"));
}

#[test]
fn request_deserializes_camel_case_with_missing_fields() {
    let request: GenerateRequest =
        serde_json::from_str(r####"{"systemPrompt":"s","userPrompt":"u","maxTokens":50,"stopSequence":"###"}"####).unwrap();
    assert_eq!(request.max_tokens, Some(50));
    assert!(request.model.is_none());
    assert_eq!(request.stop_sequence.as_deref(), Some("###"));
}
