//! Backend code-for-token exchange over HTTP.

use crate::error::{AuthError, Result};
use crate::providers::{IssuedTokens, TokenExchange};
use crate::state::OAuthUser;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Default exchange path, relative to the API base URL.
pub const DEFAULT_EXCHANGE_PATH: &str = "/user-auth/oauth/google/callback/";

#[derive(Debug, Serialize)]
struct ExchangeRequest<'a> {
    code: &'a str,
    redirect_uri: &'a str,
}

/// Check-auth shaped answer.
#[derive(Debug, Deserialize)]
struct ExchangeResponse {
    #[serde(default)]
    authenticated: bool,
    #[serde(default)]
    user: Option<OAuthUser>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    error: Option<String>,
}

/// [`TokenExchange`] backed by the storefront backend.
///
/// POSTs `{code, redirect_uri}` with the CSRF header and reads
/// `{authenticated, user, access_token, refresh_token, expires_in?}`.
#[derive(Debug, Clone)]
pub struct HttpTokenExchange {
    client: Client,
    endpoint: String,
    csrf_token: String,
}

impl HttpTokenExchange {
    /// Exchange against `{base_url}{DEFAULT_EXCHANGE_PATH}`.
    #[must_use]
    pub fn new(base_url: &str, csrf_token: impl Into<String>) -> Self {
        Self::with_endpoint(
            format!("{}{DEFAULT_EXCHANGE_PATH}", base_url.trim_end_matches('/')),
            csrf_token,
        )
    }

    /// Exchange against an explicit endpoint URL.
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>, csrf_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            csrf_token: csrf_token.into(),
        }
    }

    /// Endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl TokenExchange for HttpTokenExchange {
    fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> impl Future<Output = Result<IssuedTokens>> + Send {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let csrf_token = self.csrf_token.clone();
        let code = code.to_string();
        let redirect_uri = redirect_uri.to_string();

        async move {
            tracing::debug!(%endpoint, "Exchanging OAuth code");

            let response = client
                .post(&endpoint)
                .header("X-CSRFToken", csrf_token)
                .json(&ExchangeRequest {
                    code: &code,
                    redirect_uri: &redirect_uri,
                })
                .send()
                .await
                .map_err(|e| AuthError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                tracing::warn!(status = status.as_u16(), "OAuth code exchange refused");
                return Err(AuthError::TokenExchangeFailed {
                    status: Some(status.as_u16()),
                    message: if status == StatusCode::UNAUTHORIZED || message.is_empty() {
                        status.to_string()
                    } else {
                        message
                    },
                });
            }

            let payload: ExchangeResponse =
                response
                    .json()
                    .await
                    .map_err(|e| AuthError::TokenExchangeFailed {
                        status: Some(status.as_u16()),
                        message: format!("Failed to parse exchange response: {e}"),
                    })?;

            into_tokens(payload)
        }
    }
}

fn into_tokens(payload: ExchangeResponse) -> Result<IssuedTokens> {
    if !payload.authenticated {
        return Err(AuthError::TokenExchangeFailed {
            status: None,
            message: payload
                .error
                .unwrap_or_else(|| "backend did not authenticate the user".to_string()),
        });
    }

    let access_token = payload
        .access_token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::TokenExchangeFailed {
            status: None,
            message: "response carried no access token".to_string(),
        })?;

    Ok(IssuedTokens {
        access_token,
        refresh_token: payload.refresh_token,
        user: payload.user.unwrap_or_default(),
        expires_in: payload.expires_in,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_exchanges_code_for_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DEFAULT_EXCHANGE_PATH))
            .and(header("X-CSRFToken", "csrf-1"))
            .and(body_json(json!({
                "code": "auth-code",
                "redirect_uri": "https://shop.example/callback/"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "authenticated": true,
                "user": {
                    "id": 7,
                    "username": "ada",
                    "email": "ada@example.com",
                    "first_name": "Ada",
                    "last_name": "Lovelace"
                },
                "access_token": "jwt-access",
                "refresh_token": "jwt-refresh"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let exchange = HttpTokenExchange::new(&server.uri(), "csrf-1");
        let tokens = exchange
            .exchange_code("auth-code", "https://shop.example/callback/")
            .await
            .unwrap();

        assert_eq!(tokens.access_token, "jwt-access");
        assert_eq!(tokens.refresh_token.as_deref(), Some("jwt-refresh"));
        assert_eq!(tokens.user.email.as_deref(), Some("ada@example.com"));
        assert_eq!(tokens.expires_in, None);
    }

    #[tokio::test]
    async fn test_unauthenticated_answer_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "authenticated": false })),
            )
            .mount(&server)
            .await;

        let exchange = HttpTokenExchange::new(&server.uri(), "csrf");
        let error = exchange.exchange_code("c", "r").await.unwrap_err();

        assert!(matches!(error, AuthError::TokenExchangeFailed { status: None, .. }));
    }

    #[tokio::test]
    async fn test_http_failure_carries_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad code"))
            .mount(&server)
            .await;

        let exchange = HttpTokenExchange::new(&server.uri(), "csrf");
        let error = exchange.exchange_code("c", "r").await.unwrap_err();

        assert_eq!(
            error,
            AuthError::TokenExchangeFailed {
                status: Some(400),
                message: "bad code".into()
            }
        );
    }
}
