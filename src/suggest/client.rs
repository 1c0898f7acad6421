//! HTTP client for the Gemini `generateContent` endpoint.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use tracing::debug;

use crate::config::Settings;
use crate::credential::Credential;
use crate::error::SuggestError;

use super::response::{GenerateRequest, GenerateResponse, clean_suggestion};

/// Maximum characters of an error body kept for diagnostics.
const MAX_ERROR_BODY: usize = 500;

/// Trait for requesting a commit message suggestion.
///
/// This abstraction allows mocking the remote model in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Suggester: Send + Sync {
    /// One request, no retries. Returns the cleaned, non-empty suggestion.
    async fn request_suggestion(
        &self,
        credential: &Credential,
        prompt: &str,
    ) -> Result<String, SuggestError>;
}

/// Suggester backed by the Gemini REST API.
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(settings: &Settings) -> Result<Self, SuggestError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("gemit/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| SuggestError::ClientBuild(e.without_url().to_string()))?;

        Ok(Self {
            http,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                settings.api_base, settings.model
            ),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Suggester for GeminiClient {
    async fn request_suggestion(
        &self,
        credential: &Credential,
        prompt: &str,
    ) -> Result<String, SuggestError> {
        debug!(
            "Suggestion request: endpoint={}, prompt={} chars",
            self.endpoint,
            prompt.len()
        );
        let start = Instant::now();

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", credential.expose_secret())])
            .json(&GenerateRequest::new(prompt))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        debug!(
            "Suggestion response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            body.len()
        );

        parse_response(status, &body)
    }
}

/// Map a status and body to a suggestion or a specific error.
fn parse_response(status: StatusCode, body: &str) -> Result<String, SuggestError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(SuggestError::RateLimited);
    }
    if !status.is_success() {
        return Err(SuggestError::Http {
            status: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY).collect(),
        });
    }

    let parsed: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| SuggestError::MalformedResponse(e.to_string()))?;

    let suggestion = parsed
        .first_text()
        .map(clean_suggestion)
        .filter(|s| !s.is_empty())
        .ok_or(SuggestError::EmptyResponse)?;

    Ok(suggestion)
}

/// Classify a transport error, dropping the URL so the key never leaks.
fn transport_error(err: reqwest::Error) -> SuggestError {
    if err.is_timeout() {
        SuggestError::Timeout
    } else if err.is_decode() {
        SuggestError::MalformedResponse(err.without_url().to_string())
    } else {
        SuggestError::Connection(err.without_url().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{API_BASE_ENV_VAR, EnvSnapshot};
    use secrecy::SecretString;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

    fn client_for(server: &MockServer) -> GeminiClient {
        let env = EnvSnapshot::from_pairs([(API_BASE_ENV_VAR, server.uri())]);
        GeminiClient::new(&Settings::from_env(&env, None)).unwrap()
    }

    fn key() -> Credential {
        SecretString::from("test-key".to_string())
    }

    fn candidate(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]
        })
    }

    #[test]
    fn test_endpoint_includes_model() {
        let settings = Settings::from_env(&EnvSnapshot::default(), Some("gemini-test"));
        let client = GeminiClient::new(&settings).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_parse_rate_limit() {
        let result = parse_response(StatusCode::TOO_MANY_REQUESTS, "{}");
        assert!(matches!(result, Err(SuggestError::RateLimited)));
    }

    #[test]
    fn test_parse_server_error_truncates_body() {
        let body = "x".repeat(2_000);
        match parse_response(StatusCode::INTERNAL_SERVER_ERROR, &body) {
            Err(SuggestError::Http { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body.len(), MAX_ERROR_BODY);
            }
            other => panic!("Expected Http error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_malformed_body() {
        let result = parse_response(StatusCode::OK, "<html>oops</html>");
        assert!(matches!(result, Err(SuggestError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_fence_only_is_empty() {
        let body = candidate("```\n```").to_string();
        let result = parse_response(StatusCode::OK, &body);
        assert!(matches!(result, Err(SuggestError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_request_sends_prompt_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(query_param("key", "test-key"))
            .and(body_json(
                serde_json::json!({"contents": [{"parts": [{"text": "the prompt"}]}]}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate("feat: add login")))
            .expect(1)
            .mount(&server)
            .await;

        let suggestion = client_for(&server)
            .request_suggestion(&key(), "the prompt")
            .await
            .unwrap();

        assert_eq!(suggestion, "feat: add login");
    }

    #[tokio::test]
    async fn test_request_strips_code_fences() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(candidate("```\nfix: handle nil\n```\n")),
            )
            .mount(&server)
            .await;

        let suggestion = client_for(&server)
            .request_suggestion(&key(), "p")
            .await
            .unwrap();

        assert_eq!(suggestion, "fix: handle nil");
    }

    #[tokio::test]
    async fn test_request_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("RESOURCE_EXHAUSTED"))
            .mount(&server)
            .await;

        let result = client_for(&server).request_suggestion(&key(), "p").await;

        assert!(matches!(result, Err(SuggestError::RateLimited)));
    }

    #[tokio::test]
    async fn test_request_empty_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})),
            )
            .mount(&server)
            .await;

        let result = client_for(&server).request_suggestion(&key(), "p").await;

        assert!(matches!(result, Err(SuggestError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_request_times_out_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(candidate("feat: late"))
                    .set_delay(std::time::Duration::from_secs(5)),
            )
            .mount(&server)
            .await;
        let env = EnvSnapshot::from_pairs([
            (API_BASE_ENV_VAR, server.uri()),
            (crate::config::TIMEOUT_ENV_VAR, "1".to_string()),
        ]);
        let client = GeminiClient::new(&Settings::from_env(&env, None)).unwrap();

        let result = client.request_suggestion(&key(), "p").await;

        assert!(matches!(result, Err(SuggestError::Timeout)));
    }

    #[tokio::test]
    async fn test_connection_error_does_not_leak_key() {
        // Bind then release a port so connections to it are refused.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let env = EnvSnapshot::from_pairs([(API_BASE_ENV_VAR, format!("http://127.0.0.1:{port}"))]);
        let client = GeminiClient::new(&Settings::from_env(&env, None)).unwrap();

        let err = client
            .request_suggestion(&key(), "p")
            .await
            .expect_err("request to a closed port should fail");

        assert!(matches!(err, SuggestError::Connection(_)), "{err:?}");
        assert!(!err.to_string().contains("test-key"));
        assert!(!format!("{err:?}").contains("test-key"));
        assert!(err.user_message().contains("internet connection"));
    }
}
