//! Mock code-for-token exchange.

use crate::error::Result;
use crate::providers::{IssuedTokens, TokenExchange};
use crate::state::OAuthUser;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Token exchange answering with a scripted result.
///
/// Defaults to issuing tokens for `ada@example.com`.
#[derive(Debug, Clone)]
pub struct MockTokenExchange {
    result: Arc<Mutex<Result<IssuedTokens>>>,
    codes: Arc<Mutex<Vec<String>>>,
}

impl MockTokenExchange {
    /// Create an exchange issuing default tokens.
    #[must_use]
    pub fn new() -> Self {
        Self {
            result: Arc::new(Mutex::new(Ok(Self::default_tokens()))),
            codes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Tokens issued unless overridden.
    #[must_use]
    pub fn default_tokens() -> IssuedTokens {
        IssuedTokens {
            access_token: "oauth-access-token".to_string(),
            refresh_token: Some("oauth-refresh-token".to_string()),
            user: OAuthUser {
                id: Some(1),
                username: Some("ada".to_string()),
                email: Some("ada@example.com".to_string()),
                first_name: Some("Ada".to_string()),
                last_name: Some("Lovelace".to_string()),
            },
            expires_in: None,
        }
    }

    /// Answer every future exchange with `result`.
    pub fn respond_with(&self, result: Result<IssuedTokens>) {
        if let Ok(mut guard) = self.result.lock() {
            *guard = result;
        }
    }

    /// Codes exchanged so far.
    #[must_use]
    pub fn exchanged_codes(&self) -> Vec<String> {
        self.codes
            .lock()
            .map(|codes| codes.clone())
            .unwrap_or_default()
    }
}

impl Default for MockTokenExchange {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenExchange for MockTokenExchange {
    fn exchange_code(
        &self,
        code: &str,
        _redirect_uri: &str,
    ) -> impl Future<Output = Result<IssuedTokens>> + Send {
        if let Ok(mut codes) = self.codes.lock() {
            codes.push(code.to_string());
        }
        let result = self
            .result
            .lock()
            .map_or_else(|poisoned| poisoned.into_inner().clone(), |guard| guard.clone());

        async move { result }
    }
}
