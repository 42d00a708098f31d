//! Credential providers injected into the API client.

use crate::config::SessionSettings;
use secrecy::Secret;
use std::sync::{PoisonError, RwLock};

/// Supplies the bearer token for API calls.
///
/// Called once per request, so implementations may rotate tokens freely.
pub trait CredentialProvider: Send + Sync {
    fn access_token(&self) -> Option<Secret<String>>;
}

/// A fixed token, typically from configuration.
pub struct StaticCredentials {
    token: Option<Secret<String>>,
}

impl StaticCredentials {
    pub fn new(token: Option<Secret<String>>) -> Self {
        Self { token }
    }

    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

impl CredentialProvider for StaticCredentials {
    fn access_token(&self) -> Option<Secret<String>> {
        self.token.clone()
    }
}

/// A session token that can be replaced after sign-in or cleared on expiry.
#[derive(Default)]
pub struct SessionCredentials {
    token: RwLock<Option<Secret<String>>>,
}

impl SessionCredentials {
    pub fn from_settings(settings: &SessionSettings) -> Self {
        Self {
            token: RwLock::new(settings.access_token.clone()),
        }
    }

    pub fn set_token(&self, token: Secret<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        tracing::info!("Session credentials cleared");
    }

    pub fn is_signed_in(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl CredentialProvider for SessionCredentials {
    fn access_token(&self) -> Option<Secret<String>> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_session_token_lifecycle() {
        let credentials = SessionCredentials::default();
        assert!(!credentials.is_signed_in());
        assert!(credentials.access_token().is_none());

        credentials.set_token(Secret::new("token-1".to_string()));
        assert!(credentials.is_signed_in());
        assert_eq!(
            credentials.access_token().unwrap().expose_secret(),
            "token-1"
        );

        credentials.clear();
        assert!(credentials.access_token().is_none());
    }

    #[test]
    fn test_from_settings() {
        let settings = SessionSettings {
            access_token: Some(Secret::new("configured".to_string())),
        };
        let credentials = SessionCredentials::from_settings(&settings);
        assert_eq!(
            credentials.access_token().unwrap().expose_secret(),
            "configured"
        );
    }

    #[test]
    fn test_static_anonymous() {
        assert!(StaticCredentials::anonymous().access_token().is_none());
    }
}
