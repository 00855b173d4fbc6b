use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::config::PhoneAuthConfig;
use crate::core::error::{AppError, Result};

/// Result of confirming an OTP with the provider
#[derive(Debug, Clone)]
pub struct PhoneSignIn {
    pub uid: String,
    pub phone_number: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub is_new_user: bool,
}

/// Tokens returned by a refresh
#[derive(Debug, Clone)]
pub struct ProviderTokens {
    pub uid: String,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Phone one-time-code identity provider
#[async_trait]
pub trait PhoneAuthProvider: Send + Sync {
    /// Sends an SMS code, returning the opaque session info that ties it to confirmation
    async fn send_verification_code(&self, phone_number: &str, recaptcha_token: &str)
        -> Result<String>;

    async fn sign_in_with_phone_number(&self, session_info: &str, code: &str)
        -> Result<PhoneSignIn>;

    async fn refresh(&self, refresh_token: &str) -> Result<ProviderTokens>;

    /// Deletes the account that owns `id_token`
    async fn delete_account(&self, id_token: &str) -> Result<()>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendCodeRequest<'a> {
    phone_number: &'a str,
    recaptcha_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendCodeResponse {
    session_info: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    session_info: &'a str,
    code: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    local_id: String,
    #[serde(default)]
    is_new_user: bool,
    #[serde(default)]
    phone_number: Option<String>,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    grant_type: &'static str,
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    user_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteAccountRequest<'a> {
    id_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorEnvelope {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    message: String,
}

/// REST client for an Identity-Toolkit compatible phone auth API
pub struct PhoneAuthClient {
    config: PhoneAuthConfig,
    http_client: reqwest::Client,
}

impl PhoneAuthClient {
    pub fn new(config: PhoneAuthConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn accounts_url(&self, method: &str) -> String {
        format!(
            "{}/accounts:{}?key={}",
            self.config.api_base_url,
            method,
            urlencoding::encode(&self.config.api_key)
        )
    }

    async fn post_json<B, R>(&self, url: &str, body: &B, operation: &str) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let response = self
            .http_client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Phone auth request '{}' failed: {}", operation, e);
                AppError::ExternalServiceError(format!("Auth provider unreachable: {}", e))
            })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<R>().await.map_err(|e| {
                tracing::error!("Failed to parse '{}' response: {}", operation, e);
                AppError::ExternalServiceError(format!("Invalid auth provider response: {}", e))
            });
        }

        let body = response.text().await.unwrap_or_default();
        let code = serde_json::from_str::<ProviderErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_default();

        tracing::warn!(
            "Phone auth '{}' rejected: HTTP {} {}",
            operation,
            status,
            code
        );
        Err(map_provider_error(&code, status.as_u16()))
    }
}

#[async_trait]
impl PhoneAuthProvider for PhoneAuthClient {
    async fn send_verification_code(
        &self,
        phone_number: &str,
        recaptcha_token: &str,
    ) -> Result<String> {
        let url = self.accounts_url("sendVerificationCode");
        let body = SendCodeRequest {
            phone_number,
            recaptcha_token,
        };

        let response: SendCodeResponse = self.post_json(&url, &body, "sendVerificationCode").await?;
        tracing::info!("Verification code sent");
        Ok(response.session_info)
    }

    async fn sign_in_with_phone_number(
        &self,
        session_info: &str,
        code: &str,
    ) -> Result<PhoneSignIn> {
        let url = self.accounts_url("signInWithPhoneNumber");
        let body = SignInRequest { session_info, code };

        let response: SignInResponse = self.post_json(&url, &body, "signInWithPhoneNumber").await?;

        Ok(PhoneSignIn {
            uid: response.local_id,
            phone_number: response.phone_number,
            id_token: response.id_token,
            refresh_token: response.refresh_token,
            expires_in: parse_expires_in(&response.expires_in),
            is_new_user: response.is_new_user,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<ProviderTokens> {
        let url = format!(
            "{}?key={}",
            self.config.token_url,
            urlencoding::encode(&self.config.api_key)
        );
        let body = RefreshRequest {
            grant_type: "refresh_token",
            refresh_token,
        };

        let response: RefreshResponse = self.post_json(&url, &body, "token").await?;

        Ok(ProviderTokens {
            uid: response.user_id,
            id_token: response.id_token,
            refresh_token: response.refresh_token,
            expires_in: parse_expires_in(&response.expires_in),
        })
    }

    async fn delete_account(&self, id_token: &str) -> Result<()> {
        let url = self.accounts_url("delete");
        let body = DeleteAccountRequest { id_token };

        let _: serde_json::Value = self.post_json(&url, &body, "delete").await?;
        Ok(())
    }
}

/// Provider error codes arrive as `CODE` or `CODE : detail`
fn map_provider_error(message: &str, status: u16) -> AppError {
    let code = message.split(':').next().unwrap_or_default().trim();

    match code {
        "INVALID_CODE" => AppError::Auth("Invalid verification code".to_string()),
        "SESSION_EXPIRED" | "INVALID_SESSION_INFO" | "MISSING_SESSION_INFO" => {
            AppError::Auth("Verification session expired, request a new code".to_string())
        }
        "INVALID_PHONE_NUMBER" | "MISSING_PHONE_NUMBER" => {
            AppError::Validation("phone_number: Invalid phone number".to_string())
        }
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "INVALID_GRANT_TYPE" | "USER_NOT_FOUND"
        | "INVALID_ID_TOKEN" => AppError::Unauthorized("Session is no longer valid".to_string()),
        "CAPTCHA_CHECK_FAILED" | "MISSING_RECAPTCHA_TOKEN" | "INVALID_RECAPTCHA_TOKEN" => {
            AppError::BadRequest("reCAPTCHA verification failed".to_string())
        }
        "TOO_MANY_ATTEMPTS_TRY_LATER" | "QUOTA_EXCEEDED" => {
            AppError::BadRequest("Too many attempts, try again later".to_string())
        }
        _ if (400..500).contains(&status) => {
            AppError::BadRequest(format!("Auth provider rejected the request: {}", code))
        }
        _ => AppError::ExternalServiceError(format!("Auth provider error: HTTP {}", status)),
    }
}

fn parse_expires_in(value: &str) -> i64 {
    value.trim().parse().unwrap_or(3600)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_provider_error_codes() {
        assert!(matches!(
            map_provider_error("INVALID_CODE", 400),
            AppError::Auth(_)
        ));
        assert!(matches!(
            map_provider_error("INVALID_PHONE_NUMBER : Invalid format.", 400),
            AppError::Validation(_)
        ));
        assert!(matches!(
            map_provider_error("TOKEN_EXPIRED", 400),
            AppError::Unauthorized(_)
        ));
        assert!(matches!(
            map_provider_error("SOMETHING_NEW", 400),
            AppError::BadRequest(_)
        ));
        assert!(matches!(
            map_provider_error("", 503),
            AppError::ExternalServiceError(_)
        ));
    }

    #[test]
    fn test_parse_expires_in() {
        assert_eq!(parse_expires_in("3600"), 3600);
        assert_eq!(parse_expires_in(" 120 "), 120);
        assert_eq!(parse_expires_in("soon"), 3600);
    }

    #[test]
    fn test_accounts_url() {
        let client = PhoneAuthClient::new(PhoneAuthConfig {
            api_base_url: "https://auth.example.com/v1".to_string(),
            api_key: "key 1".to_string(),
            token_url: "https://token.example.com/v1/token".to_string(),
        });

        assert_eq!(
            client.accounts_url("sendVerificationCode"),
            "https://auth.example.com/v1/accounts:sendVerificationCode?key=key%201"
        );
    }

    #[test]
    fn test_sign_in_response_parses_provider_payload() {
        let response: SignInResponse = serde_json::from_value(serde_json::json!({
            "idToken": "id",
            "refreshToken": "refresh",
            "expiresIn": "3600",
            "localId": "uid-1",
            "isNewUser": true,
            "phoneNumber": "+13105550100"
        }))
        .unwrap();

        assert_eq!(response.local_id, "uid-1");
        assert!(response.is_new_user);
        assert_eq!(response.phone_number.as_deref(), Some("+13105550100"));
    }
}
