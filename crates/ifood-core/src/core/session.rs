//! Session manager: OTP login, authentication and token refresh.
//!
//! ```text
//! Anonymous --request_otp--> OtpPending --claim_otp--> Authenticated
//!                                                          |   ^
//!                                               expire()   v   | refresh()
//!                                                         Expired
//! ```
//!
//! A failed refresh always drops back to `Anonymous`; no partial pair is kept.

use crate::api::{ApiClient, TokenPair};
use crate::credentials::Credentials;
use crate::error::{IfoodError, Result};

/// Where the login lifecycle currently stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Anonymous,
    /// Code emailed; waiting for the user to type it in.
    OtpPending { email: String, challenge: String },
    Authenticated { credentials: Credentials },
    /// The server rejected the access token; the refresh token is kept.
    Expired { refresh_token: String },
}

/// Owns the token pair and hands out the current bearer token.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: AuthState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session resumed from stored credentials.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            state: AuthState::Authenticated { credentials },
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Email the pending one-time code was sent to.
    pub fn pending_email(&self) -> Option<&str> {
        match &self.state {
            AuthState::OtpPending { email, .. } => Some(email),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated { .. })
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        match &self.state {
            AuthState::Authenticated { credentials } => Some(credentials),
            _ => None,
        }
    }

    /// Current bearer token for authenticated calls.
    ///
    /// # Errors
    /// `NotAuthenticated` unless the session holds a non-empty access token.
    pub fn bearer(&self) -> Result<&str> {
        match &self.state {
            AuthState::Authenticated { credentials } if !credentials.access_token.is_empty() => {
                Ok(&credentials.access_token)
            }
            _ => Err(IfoodError::NotAuthenticated),
        }
    }

    /// Marks the access token as rejected by the server.
    pub fn expire(&mut self) {
        if let AuthState::Authenticated { credentials } = &mut self.state {
            let refresh_token = std::mem::take(&mut credentials.refresh_token);
            tracing::info!("session expired");
            self.state = AuthState::Expired { refresh_token };
        }
    }

    /// Forgets every token.
    pub fn reset(&mut self) {
        self.state = AuthState::Anonymous;
    }

    /// Requests a one-time code for `email` and waits for it.
    ///
    /// On failure the state is left as it was.
    ///
    /// # Errors
    /// `Remote` when the OTP endpoint fails.
    pub async fn request_otp(&mut self, api: &ApiClient, email: &str) -> Result<()> {
        let email = email.trim();
        let challenge = api.request_otp(email).await?;
        tracing::info!("OTP requested");
        self.state = AuthState::OtpPending {
            email: email.to_string(),
            challenge,
        };
        Ok(())
    }

    /// Claims the emailed code and returns the short-lived access token.
    ///
    /// # Errors
    /// `Precondition` without a pending OTP; `InvalidCode` when rejected.
    pub async fn claim_otp(&mut self, api: &ApiClient, code: &str) -> Result<String> {
        let AuthState::OtpPending { challenge, .. } = &self.state else {
            return Err(IfoodError::Precondition(
                "request a one-time code before entering it",
            ));
        };

        let access_token = api.claim_otp(challenge, code).await?;
        self.state = AuthState::Authenticated {
            credentials: Credentials::new(access_token.clone(), String::new()),
        };
        Ok(access_token)
    }

    /// Exchanges the OTP-derived token for the durable pair.
    ///
    /// # Errors
    /// `Remote` when the exchange fails; the state is left as it was.
    pub async fn authenticate(
        &mut self,
        api: &ApiClient,
        email: &str,
        short_lived_token: &str,
    ) -> Result<Credentials> {
        let pair = api.authenticate(email, short_lived_token).await?;
        tracing::info!("authenticated");
        Ok(self.adopt(pair))
    }

    /// Exchanges the stored refresh token for a new pair.
    ///
    /// # Errors
    /// `RefreshFailed` (or `Remote` on transport failure) and the session
    /// becomes `Anonymous`.
    pub async fn refresh(&mut self, api: &ApiClient) -> Result<Credentials> {
        let refresh_token = match &self.state {
            AuthState::Authenticated { credentials } => credentials.refresh_token.clone(),
            AuthState::Expired { refresh_token } => refresh_token.clone(),
            _ => String::new(),
        };

        if refresh_token.is_empty() {
            self.reset();
            return Err(IfoodError::RefreshFailed(
                "no refresh token available".to_string(),
            ));
        }

        match api.refresh_tokens(&refresh_token).await {
            Ok(pair) => {
                tracing::info!("token refreshed");
                Ok(self.adopt(pair))
            }
            Err(err) => {
                tracing::warn!(error = %err, "token refresh failed");
                self.reset();
                Err(err)
            }
        }
    }

    fn adopt(&mut self, pair: TokenPair) -> Credentials {
        let credentials = Credentials::new(pair.access_token, pair.refresh_token);
        self.state = AuthState::Authenticated {
            credentials: credentials.clone(),
        };
        credentials
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::ApiConfig;

    fn api(server: &MockServer) -> ApiClient {
        ApiClient::new(ApiConfig::with_base_url(server.uri()))
    }

    async fn mount_login(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/v1/identity-providers/OTP/authorization-codes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"key": "chal"})))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/identity-providers/OTP/access-tokens"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "short"})))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v2/identity-providers/OTP/authentications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "access-1",
                "refresh_token": "refresh-1",
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_full_login_walks_states() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        let api = api(&server);

        let mut session = Session::new();
        assert_eq!(session.state(), &AuthState::Anonymous);
        assert!(matches!(session.bearer(), Err(IfoodError::NotAuthenticated)));

        session.request_otp(&api, " me@example.com ").await.unwrap();
        assert_eq!(
            session.state(),
            &AuthState::OtpPending {
                email: "me@example.com".to_string(),
                challenge: "chal".to_string(),
            }
        );
        assert_eq!(session.pending_email(), Some("me@example.com"));

        let short = session.claim_otp(&api, "123456").await.unwrap();
        assert_eq!(short, "short");
        assert!(session.is_authenticated());
        assert_eq!(session.pending_email(), None);

        let creds = session
            .authenticate(&api, "me@example.com", &short)
            .await
            .unwrap();
        assert_eq!(creds, Credentials::new("access-1", "refresh-1"));
        assert_eq!(session.bearer().unwrap(), "access-1");
    }

    #[tokio::test]
    async fn test_claim_without_pending_otp_is_precondition() {
        let server = MockServer::start().await;
        let mut session = Session::new();
        let err = session.claim_otp(&api(&server), "123").await.unwrap_err();
        assert!(matches!(err, IfoodError::Precondition(_)));
    }

    #[tokio::test]
    async fn test_invalid_code_keeps_pending_state() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/identity-providers/OTP/authorization-codes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"key": "chal"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/identity-providers/OTP/access-tokens"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;
        let api = api(&server);

        let mut session = Session::new();
        session.request_otp(&api, "me@example.com").await.unwrap();
        let err = session.claim_otp(&api, "000000").await.unwrap_err();
        assert!(matches!(err, IfoodError::InvalidCode));
        assert!(matches!(session.state(), AuthState::OtpPending { .. }));
    }

    #[tokio::test]
    async fn test_refresh_failure_leaves_session_anonymous() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/access_tokens"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid refresh token"))
            .mount(&server)
            .await;

        let mut session = Session::with_credentials(Credentials::new("old-a", "bad-r"));
        let err = session.refresh(&api(&server)).await.unwrap_err();
        assert!(matches!(err, IfoodError::RefreshFailed(_)));
        assert_eq!(session.state(), &AuthState::Anonymous);
        assert!(session.credentials().is_none());
        assert!(session.bearer().is_err());
    }

    #[tokio::test]
    async fn test_refresh_from_expired() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/access_tokens"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "access_token": "a2",
                "refresh_token": "r2",
            })))
            .mount(&server)
            .await;

        let mut session = Session::with_credentials(Credentials::new("a1", "r1"));
        session.expire();
        assert_eq!(
            session.state(),
            &AuthState::Expired {
                refresh_token: "r1".to_string()
            }
        );
        assert!(session.bearer().is_err());

        let creds = session.refresh(&api(&server)).await.unwrap();
        assert_eq!(creds, Credentials::new("a2", "r2"));
        assert_eq!(session.bearer().unwrap(), "a2");
    }

    #[tokio::test]
    async fn test_refresh_without_token_fails_without_request() {
        let server = MockServer::start().await;
        let mut session = Session::new();
        let err = session.refresh(&api(&server)).await.unwrap_err();
        assert!(matches!(err, IfoodError::RefreshFailed(_)));
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }
}
