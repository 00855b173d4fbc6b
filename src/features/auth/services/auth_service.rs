use std::future::Future;
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::clients::{PhoneAuthProvider, PhoneSignIn};
use crate::features::auth::dtos::{
    AuthResponseDto, AuthUserDto, MeResponseDto, RefreshTokenRequestDto, RefreshTokenResponseDto,
    SendCodeRequestDto, SendCodeResponseDto, SignUpRequestDto, SignUpResponseDto,
    VerifyCodeRequestDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::profiles::dtos::NewProfile;
use crate::features::profiles::ProfileStore;

/// Phone OTP sign-in and sign-up
pub struct AuthService {
    provider: Arc<dyn PhoneAuthProvider>,
    profiles: Arc<dyn ProfileStore>,
}

impl AuthService {
    pub fn new(provider: Arc<dyn PhoneAuthProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { provider, profiles }
    }

    pub async fn send_code(&self, dto: SendCodeRequestDto) -> Result<SendCodeResponseDto> {
        let session_info = self
            .provider
            .send_verification_code(&dto.phone_number, &dto.recaptcha_token)
            .await?;

        Ok(SendCodeResponseDto { session_info })
    }

    pub async fn verify_code(&self, dto: VerifyCodeRequestDto) -> Result<AuthResponseDto> {
        let sign_in = self
            .provider
            .sign_in_with_phone_number(&dto.session_info, &dto.code)
            .await?;

        tracing::info!(uid = %sign_in.uid, new_user = sign_in.is_new_user, "Phone sign-in");
        Ok(to_auth_response(sign_in))
    }

    /// Confirm the code, then write the profile. When the profile write fails
    /// for an account created by this call, the provider account is deleted
    /// and the original error is returned.
    pub async fn sign_up(&self, dto: SignUpRequestDto) -> Result<SignUpResponseDto> {
        let username = dto.username.trim().to_string();

        if !self.profiles.username_available(&username).await? {
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }

        let sign_in = self
            .provider
            .sign_in_with_phone_number(&dto.session_info, &dto.code)
            .await?;

        let write_profile = async {
            let phone_number = sign_in.phone_number.clone().ok_or_else(|| {
                AppError::ExternalServiceError(
                    "Auth provider did not return a phone number".to_string(),
                )
            })?;

            self.profiles
                .create(NewProfile {
                    uid: sign_in.uid.clone(),
                    phone_number,
                    email: dto
                        .email
                        .as_deref()
                        .map(str::trim)
                        .filter(|e| !e.is_empty())
                        .map(str::to_string),
                    username,
                })
                .await
        };

        let rollback = sign_in
            .is_new_user
            .then(|| self.provider.delete_account(&sign_in.id_token));

        let profile = with_compensation(write_profile, rollback).await?;

        tracing::info!(uid = %sign_in.uid, "Sign-up completed");
        Ok(SignUpResponseDto {
            session: to_auth_response(sign_in),
            profile,
        })
    }

    pub async fn refresh(&self, dto: RefreshTokenRequestDto) -> Result<RefreshTokenResponseDto> {
        let tokens = self.provider.refresh(&dto.refresh_token).await?;

        Ok(RefreshTokenResponseDto {
            uid: tokens.uid,
            access_token: tokens.id_token,
            token_type: "Bearer".to_string(),
            expires_in: tokens.expires_in,
            refresh_token: tokens.refresh_token,
        })
    }

    pub fn me(&self, user: AuthenticatedUser) -> MeResponseDto {
        user.into()
    }
}

fn to_auth_response(sign_in: PhoneSignIn) -> AuthResponseDto {
    AuthResponseDto {
        access_token: sign_in.id_token,
        token_type: "Bearer".to_string(),
        expires_in: sign_in.expires_in,
        refresh_token: sign_in.refresh_token,
        user: AuthUserDto {
            uid: sign_in.uid,
            phone_number: sign_in.phone_number,
            is_new_user: sign_in.is_new_user,
        },
    }
}

/// Run `write`; on failure run `compensate` (if any) and return the write's error.
/// A failing compensation is logged, never surfaced in place of the original error.
pub(crate) async fn with_compensation<T, W, C>(write: W, compensate: Option<C>) -> Result<T>
where
    W: Future<Output = Result<T>>,
    C: Future<Output = Result<()>>,
{
    let err = match write.await {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };

    match compensate {
        Some(compensate) => match compensate.await {
            Ok(()) => tracing::warn!("Write failed, compensating action applied: {}", err),
            Err(comp_err) => tracing::error!(
                "Write failed ({}) and compensating action failed: {}",
                err,
                comp_err
            ),
        },
        None => tracing::warn!("Write failed, nothing to compensate: {}", err),
    }

    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::clients::testing::{FakePhoneAuth, VALID_CODE};
    use crate::features::profiles::dtos::ProfileResponseDto;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeProfiles {
        taken: bool,
        fail_create: bool,
        created: AtomicUsize,
    }

    #[async_trait]
    impl ProfileStore for FakeProfiles {
        async fn username_available(&self, _username: &str) -> Result<bool> {
            Ok(!self.taken)
        }

        async fn create(&self, new_profile: NewProfile) -> Result<ProfileResponseDto> {
            if self.fail_create {
                return Err(AppError::Conflict("Username is already taken".to_string()));
            }
            self.created.fetch_add(1, Ordering::SeqCst);
            let now = Utc::now();
            Ok(ProfileResponseDto {
                uid: new_profile.uid,
                phone_number: new_profile.phone_number,
                email: new_profile.email,
                username: Some(new_profile.username),
                is_verified: true,
                created_at: now,
                updated_at: now,
            })
        }
    }

    fn sign_up_request(username: &str) -> SignUpRequestDto {
        SignUpRequestDto {
            session_info: "session-+13105550100".to_string(),
            code: VALID_CODE.to_string(),
            username: username.to_string(),
            email: Some("  bella@example.com ".to_string()),
        }
    }

    fn auth_service(provider: Arc<FakePhoneAuth>, profiles: Arc<FakeProfiles>) -> AuthService {
        AuthService::new(provider, profiles)
    }

    #[tokio::test]
    async fn test_sign_up_creates_profile() {
        let provider = Arc::new(FakePhoneAuth::default());
        let profiles = Arc::new(FakeProfiles::default());
        let service = auth_service(provider.clone(), profiles.clone());

        let response = service.sign_up(sign_up_request("  bella_b ")).await.unwrap();

        assert_eq!(response.session.user.uid, "fake-uid");
        assert_eq!(response.profile.username.as_deref(), Some("bella_b"));
        assert_eq!(response.profile.email.as_deref(), Some("bella@example.com"));
        assert_eq!(response.profile.phone_number, "+13105550100");
        assert_eq!(profiles.created.load(Ordering::SeqCst), 1);
        assert_eq!(provider.deleted_accounts(), 0);
    }

    #[tokio::test]
    async fn test_sign_up_rejects_taken_username_before_sign_in() {
        let provider = Arc::new(FakePhoneAuth::default());
        let profiles = Arc::new(FakeProfiles {
            taken: true,
            ..Default::default()
        });
        let service = auth_service(provider.clone(), profiles);

        let result = service.sign_up(sign_up_request("bella_b")).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(provider.deleted_accounts(), 0);
    }

    #[tokio::test]
    async fn test_sign_up_deletes_new_account_when_profile_write_fails() {
        let provider = Arc::new(FakePhoneAuth::default());
        let profiles = Arc::new(FakeProfiles {
            fail_create: true,
            ..Default::default()
        });
        let service = auth_service(provider.clone(), profiles);

        let result = service.sign_up(sign_up_request("bella_b")).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(provider.deleted_accounts(), 1);
    }

    #[tokio::test]
    async fn test_sign_up_keeps_existing_account_when_profile_write_fails() {
        let provider = Arc::new(FakePhoneAuth::default().existing_user());
        let profiles = Arc::new(FakeProfiles {
            fail_create: true,
            ..Default::default()
        });
        let service = auth_service(provider.clone(), profiles);

        let result = service.sign_up(sign_up_request("bella_b")).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(provider.deleted_accounts(), 0);
    }

    #[tokio::test]
    async fn test_sign_up_without_provider_phone_number_rolls_back() {
        let provider = Arc::new(FakePhoneAuth::default().without_phone_number());
        let profiles = Arc::new(FakeProfiles::default());
        let service = auth_service(provider.clone(), profiles.clone());

        let result = service.sign_up(sign_up_request("bella_b")).await;

        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
        assert_eq!(profiles.created.load(Ordering::SeqCst), 0);
        assert_eq!(provider.deleted_accounts(), 1);
    }

    #[tokio::test]
    async fn test_sign_up_with_wrong_code_creates_nothing() {
        let provider = Arc::new(FakePhoneAuth::default());
        let profiles = Arc::new(FakeProfiles::default());
        let service = auth_service(provider.clone(), profiles.clone());

        let mut request = sign_up_request("bella_b");
        request.code = "000000".to_string();
        let result = service.sign_up(request).await;

        assert!(matches!(result, Err(AppError::Auth(_))));
        assert_eq!(profiles.created.load(Ordering::SeqCst), 0);
        assert_eq!(provider.deleted_accounts(), 0);
    }

    #[tokio::test]
    async fn test_refresh_returns_provider_uid() {
        let service = auth_service(
            Arc::new(FakePhoneAuth::default()),
            Arc::new(FakeProfiles::default()),
        );

        let tokens = service
            .refresh(RefreshTokenRequestDto {
                refresh_token: "fake-refresh-token".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(tokens.uid, "fake-uid");
        assert_eq!(tokens.access_token, "refreshed-id-token");
    }

    #[tokio::test]
    async fn test_success_skips_compensation() {
        let compensated = AtomicBool::new(false);
        let result = with_compensation(async { Ok(7) }, Some(async {
            compensated.store(true, Ordering::SeqCst);
            Ok(())
        }))
        .await;

        assert_eq!(result.unwrap(), 7);
        assert!(!compensated.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_failure_runs_compensation_and_keeps_error() {
        let compensated = AtomicBool::new(false);
        let result: Result<()> = with_compensation(
            async { Err(AppError::Conflict("Username is already taken".to_string())) },
            Some(async {
                compensated.store(true, Ordering::SeqCst);
                Ok(())
            }),
        )
        .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert!(compensated.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_failed_compensation_does_not_mask_error() {
        let result: Result<()> = with_compensation(
            async { Err(AppError::Internal("disk full".to_string())) },
            Some(async { Err(AppError::ExternalServiceError("provider down".to_string())) }),
        )
        .await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_failed_profile_write_deletes_provider_account() {
        let provider = FakePhoneAuth::default();
        let result: Result<()> = with_compensation(
            async { Err(AppError::Conflict("Username is already taken".to_string())) },
            Some(provider.delete_account("fake-id-token")),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(provider.deleted_accounts(), 1);
    }

    #[tokio::test]
    async fn test_no_compensation_for_existing_accounts() {
        let result: Result<()> = with_compensation(
            async { Err(AppError::Conflict("Profile already exists".to_string())) },
            None::<std::future::Ready<Result<()>>>,
        )
        .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
