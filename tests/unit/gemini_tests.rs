/*!
 * Tests for the Gemini client wire format
 */

use zhvi::errors::ProviderError;
use zhvi::providers::gemini::{Gemini, GeminiRequest, GeminiResponse, DEFAULT_ENDPOINT};
use zhvi::providers::{GenerationRequest, Provider};

#[test]
fn test_geminiRequest_shouldSerializeCamelCaseBody() {
    let request = GenerationRequest::new("gemini-1.5-flash", "Test")
        .temperature(0.1)
        .max_output_tokens(5);

    let json = serde_json::to_value(GeminiRequest::from_generation_request(&request)).unwrap();

    assert_eq!(json["contents"][0]["role"], "user");
    assert_eq!(json["contents"][0]["parts"][0]["text"], "Test");
    assert_eq!(json["generationConfig"]["maxOutputTokens"], 5);
    let temperature = json["generationConfig"]["temperature"].as_f64().unwrap();
    assert!((temperature - 0.1).abs() < 1e-6);
}

#[test]
fn test_geminiRequest_withoutOptions_shouldOmitGenerationConfig() {
    let request = GenerationRequest::new("gemini-1.5-flash", "你好");

    let json = serde_json::to_value(GeminiRequest::from_generation_request(&request)).unwrap();

    assert!(json.get("generationConfig").is_none());
}

#[test]
fn test_extractText_shouldJoinPartsOfFirstCandidate() {
    let body = r#"{
        "candidates": [
            {"content": {"role": "model", "parts": [{"text": "你好吗"}, {"text": "\n===PHÂN_CÁCH===\n世界！"}]}, "finishReason": "STOP"},
            {"content": {"role": "model", "parts": [{"text": "ignored"}]}}
        ],
        "usageMetadata": {"promptTokenCount": 42, "candidatesTokenCount": 7}
    }"#;
    let response: GeminiResponse = serde_json::from_str(body).unwrap();

    let text = Gemini::extract_text_from_response(&response).unwrap();

    assert_eq!(text, "你好吗\n===PHÂN_CÁCH===\n世界！");
    let usage = response.usage_metadata.unwrap();
    assert_eq!(usage.prompt_token_count, Some(42));
    assert_eq!(usage.candidates_token_count, Some(7));
}

#[test]
fn test_extractText_withBlockedCandidate_shouldFail() {
    let response: GeminiResponse =
        serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();

    let err = Gemini::extract_text_from_response(&response).unwrap_err();

    assert!(matches!(err, ProviderError::ParseError(_)));
    assert!(err.to_string().contains("SAFETY"));
}

#[test]
fn test_extractText_withEmptyParts_shouldFail() {
    let response: GeminiResponse = serde_json::from_str(
        r#"{"candidates": [{"content": {"role": "model", "parts": []}, "finishReason": "MAX_TOKENS"}]}"#,
    ).unwrap();

    assert!(matches!(
        Gemini::extract_text_from_response(&response),
        Err(ProviderError::ParseError(msg)) if msg.contains("MAX_TOKENS")
    ));
}

#[test]
fn test_extractText_withoutCandidates_shouldFail() {
    let response: GeminiResponse = serde_json::from_str("{}").unwrap();
    assert!(matches!(
        Gemini::extract_text_from_response(&response),
        Err(ProviderError::ParseError(_))
    ));
}

#[test]
fn test_extractText_withBlockedPrompt_shouldFail() {
    let response: GeminiResponse =
        serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();

    let err = Gemini::extract_text_from_response(&response).unwrap_err();
    assert!(err.to_string().contains("SAFETY"));
}

#[test]
fn test_generateUrl_shouldStripModelsPrefix() {
    let client = Gemini::new("key", "", 30).unwrap();

    assert_eq!(
        client.generate_url("models/gemini-1.5-flash"),
        format!("{}/models/gemini-1.5-flash:generateContent", DEFAULT_ENDPOINT)
    );
    assert_eq!(
        client.generate_url("gemini-2.0-flash-exp"),
        format!("{}/models/gemini-2.0-flash-exp:generateContent", DEFAULT_ENDPOINT)
    );
}

#[test]
fn test_generateUrl_withCustomEndpoint_shouldTrimTrailingSlash() {
    let client = Gemini::new("key", "http://localhost:8080/v1beta/", 30).unwrap();
    assert_eq!(
        client.generate_url("gemini-1.5-flash"),
        "http://localhost:8080/v1beta/models/gemini-1.5-flash:generateContent"
    );
}

#[test]
fn test_debug_shouldNotLeakApiKey() {
    let client = Gemini::new("secret-key-123", "", 30).unwrap();
    let debug = format!("{:?}", client);

    assert!(!debug.contains("secret-key-123"));
    assert_eq!(client.name(), "gemini");
}

#[tokio::test]
async fn test_complete_withRefusedConnection_shouldBeConnectivityError() {
    let client = Gemini::new("key", "http://127.0.0.1:9", 5).unwrap();

    let result = client.complete(GenerationRequest::new("gemini-1.5-flash", "Test")).await;

    let err = result.unwrap_err();
    assert!(err.is_connectivity_or_auth(), "unexpected error: {}", err);
}
