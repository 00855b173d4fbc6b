//! In-memory phone auth provider for handler and service tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::phone_auth_client::{PhoneAuthProvider, PhoneSignIn, ProviderTokens};
use crate::core::error::{AppError, Result};

pub const VALID_CODE: &str = "123456";

/// Accepts `VALID_CODE` for any session; sign-ins report `is_new_user` unless
/// built with `existing_user`
#[derive(Default)]
pub struct FakePhoneAuth {
    sent: AtomicUsize,
    deleted: AtomicUsize,
    existing_user: bool,
    omit_phone_number: bool,
}

impl FakePhoneAuth {
    pub fn existing_user(mut self) -> Self {
        self.existing_user = true;
        self
    }

    pub fn without_phone_number(mut self) -> Self {
        self.omit_phone_number = true;
        self
    }

    pub fn sent_codes(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }

    pub fn deleted_accounts(&self) -> usize {
        self.deleted.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PhoneAuthProvider for FakePhoneAuth {
    async fn send_verification_code(
        &self,
        phone_number: &str,
        _recaptcha_token: &str,
    ) -> Result<String> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(format!("session-{}", phone_number))
    }

    async fn sign_in_with_phone_number(
        &self,
        session_info: &str,
        code: &str,
    ) -> Result<PhoneSignIn> {
        if code != VALID_CODE {
            return Err(AppError::Auth("Invalid verification code".to_string()));
        }

        Ok(PhoneSignIn {
            uid: "fake-uid".to_string(),
            phone_number: session_info
                .strip_prefix("session-")
                .filter(|_| !self.omit_phone_number)
                .map(str::to_string),
            id_token: "fake-id-token".to_string(),
            refresh_token: "fake-refresh-token".to_string(),
            expires_in: 3600,
            is_new_user: !self.existing_user,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<ProviderTokens> {
        if refresh_token.is_empty() {
            return Err(AppError::Unauthorized("Invalid refresh token".to_string()));
        }

        Ok(ProviderTokens {
            uid: "fake-uid".to_string(),
            id_token: "refreshed-id-token".to_string(),
            refresh_token: refresh_token.to_string(),
            expires_in: 3600,
        })
    }

    async fn delete_account(&self, _id_token: &str) -> Result<()> {
        self.deleted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
