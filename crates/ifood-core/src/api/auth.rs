//! OTP login and token endpoints. None of these take a bearer token.

use reqwest::StatusCode;
use reqwest::header::{ACCEPT_LANGUAGE, CONTENT_TYPE};
use serde_json::json;

use super::ApiClient;
use super::shared::{body_text, ensure_success, send};
use super::types::{OtpChallengeResponse, OtpClaimResponse, TokenPair};
use crate::error::{IfoodError, Result};

const OTP_AUTHORIZATION_CODES: &str = "/v1/identity-providers/OTP/authorization-codes";
const OTP_ACCESS_TOKENS: &str = "/v1/identity-providers/OTP/access-tokens";
const OTP_AUTHENTICATIONS: &str = "/v2/identity-providers/OTP/authentications";
const ACCESS_TOKENS: &str = "/v2/access_tokens";

const JSON_UTF8: &str = "application/json;charset=UTF-8";

impl ApiClient {
    /// Login requests carry the desktop platform and language headers.
    fn login_request(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .post(self.url(path))
            .header("Platform", &self.config.platform)
            .header(ACCEPT_LANGUAGE, &self.config.accept_language)
            .header(CONTENT_TYPE, JSON_UTF8)
    }

    /// Asks iFood to email a one-time code. Returns the challenge key.
    ///
    /// # Errors
    /// `Remote` on transport failure, non-2xx, or a reply without a key.
    pub async fn request_otp(&self, email: &str) -> Result<String> {
        const OP: &str = "request OTP";
        tracing::debug!(endpoint = OTP_AUTHORIZATION_CODES, "requesting OTP");

        let request = self.login_request(OTP_AUTHORIZATION_CODES).json(&json!({
            "tenant_id": self.config.tenant_id,
            "email": email,
            "type": "EMAIL",
        }));
        let response = ensure_success(send(request, OP).await?, OP).await?;
        let body = body_text(response, OP).await?;

        match serde_json::from_str::<OtpChallengeResponse>(&body) {
            Ok(reply) if !reply.key.is_empty() => Ok(reply.key),
            _ => Err(IfoodError::Remote {
                operation: OP,
                status: None,
                message: "response carried no challenge key".to_string(),
            }),
        }
    }

    /// Exchanges the emailed code plus challenge key for a short-lived token.
    ///
    /// Only the first line of `code` is sent.
    ///
    /// # Errors
    /// `Remote` on transport failure; `InvalidCode` whenever the reply has
    /// no token, whatever its status.
    pub async fn claim_otp(&self, challenge: &str, code: &str) -> Result<String> {
        const OP: &str = "claim OTP";
        let code = code.lines().next().unwrap_or_default().trim();
        tracing::debug!(endpoint = OTP_ACCESS_TOKENS, "claiming OTP");

        let request = self
            .http
            .get(self.url(OTP_ACCESS_TOKENS))
            .query(&[("key", challenge), ("auth_code", code)]);
        let response = send(request, OP).await?;
        let status = response.status();
        let body = body_text(response, OP).await?;

        match serde_json::from_str::<OtpClaimResponse>(&body) {
            Ok(reply) if !reply.access_token.is_empty() => Ok(reply.access_token),
            _ => {
                tracing::debug!(status = status.as_u16(), "OTP claim returned no token");
                Err(IfoodError::InvalidCode)
            }
        }
    }

    /// Trades the OTP-derived token for the durable access/refresh pair.
    ///
    /// # Errors
    /// `Remote` on transport failure, non-2xx, or an incomplete pair.
    pub async fn authenticate(&self, email: &str, token: &str) -> Result<TokenPair> {
        const OP: &str = "authenticate";
        tracing::debug!(endpoint = OTP_AUTHENTICATIONS, "authenticating");

        let request = self.login_request(OTP_AUTHENTICATIONS).json(&json!({
            "tenant_id": self.config.tenant_id,
            "device_id": self.config.device_id,
            "email": email,
            "token": token,
        }));
        let response = ensure_success(send(request, OP).await?, OP).await?;
        let body = body_text(response, OP).await?;

        match serde_json::from_str::<TokenPair>(&body) {
            Ok(pair) if pair.is_complete() => Ok(pair),
            _ => Err(IfoodError::Remote {
                operation: OP,
                status: None,
                message: "response carried no token pair".to_string(),
            }),
        }
    }

    /// Exchanges a refresh token for a new pair.
    ///
    /// # Errors
    /// `RefreshFailed` unless the reply is 201 with a complete pair;
    /// `Remote` on transport failure.
    pub async fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPair> {
        const OP: &str = "refresh token";
        tracing::debug!(endpoint = ACCESS_TOKENS, "refreshing token");

        let request = self
            .http
            .post(self.url(ACCESS_TOKENS))
            .header(CONTENT_TYPE, JSON_UTF8)
            .json(&json!({ "refresh_token": refresh_token }));
        let response = send(request, OP).await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            return Err(IfoodError::RefreshFailed(format!("HTTP {status}: {body}")));
        }

        let body = body_text(response, OP).await?;
        match serde_json::from_str::<TokenPair>(&body) {
            Ok(pair) if pair.is_complete() => Ok(pair),
            _ => Err(IfoodError::RefreshFailed(
                "response carried no token pair".to_string(),
            )),
        }
    }
}
