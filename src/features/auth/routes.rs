use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Public auth routes (no authentication required)
pub fn public_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/phone/send-code", post(handlers::send_code))
        .route("/api/auth/phone/verify", post(handlers::verify_code))
        .route("/api/auth/sign-up", post(handlers::sign_up))
        .route("/api/auth/refresh", post(handlers::refresh_token))
        .with_state(service)
}

/// Protected auth routes (require JWT authentication)
pub fn protected_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/me", get(handlers::get_me))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::clients::testing::FakePhoneAuth;
    use crate::features::profiles::ProfileService;
    use crate::shared::test_helpers::with_customer_auth;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;

    fn service(provider: Arc<FakePhoneAuth>) -> Arc<AuthService> {
        // Never connects: these routes do not reach the profile store
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        Arc::new(AuthService::new(
            provider,
            Arc::new(ProfileService::new(pool)),
        ))
    }

    #[tokio::test]
    async fn test_send_code_returns_session_info() {
        let provider = Arc::new(FakePhoneAuth::default());
        let server = TestServer::new(public_routes(service(provider.clone()))).unwrap();

        let response = server
            .post("/api/auth/phone/send-code")
            .json(&json!({ "phone_number": "+13105550100", "recaptcha_token": "captcha" }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["session_info"], "session-+13105550100");
        assert_eq!(provider.sent_codes(), 1);
    }

    #[tokio::test]
    async fn test_send_code_rejects_non_e164_number() {
        let provider = Arc::new(FakePhoneAuth::default());
        let server = TestServer::new(public_routes(service(provider.clone()))).unwrap();

        let response = server
            .post("/api/auth/phone/send-code")
            .json(&json!({ "phone_number": "310-555-0100", "recaptcha_token": "captcha" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(provider.sent_codes(), 0);
    }

    #[tokio::test]
    async fn test_verify_code_returns_tokens() {
        let server = TestServer::new(public_routes(service(Arc::new(FakePhoneAuth::default()))))
            .unwrap();

        let response = server
            .post("/api/auth/phone/verify")
            .json(&json!({ "session_info": "session-+13105550100", "code": "123456" }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["token_type"], "Bearer");
        assert_eq!(body["data"]["user"]["uid"], "fake-uid");
    }

    #[tokio::test]
    async fn test_verify_code_wrong_code_is_unauthorized() {
        let server = TestServer::new(public_routes(service(Arc::new(FakePhoneAuth::default()))))
            .unwrap();

        let response = server
            .post("/api/auth/phone/verify")
            .json(&json!({ "session_info": "session-+13105550100", "code": "000000" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_sign_up_rejects_bad_username_before_provider_call() {
        let server = TestServer::new(public_routes(service(Arc::new(FakePhoneAuth::default()))))
            .unwrap();

        let response = server
            .post("/api/auth/sign-up")
            .json(&json!({
                "session_info": "session-+13105550100",
                "code": "123456",
                "username": "no spaces!"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_me_without_user_is_unauthorized() {
        let server = TestServer::new(protected_routes(service(Arc::new(
            FakePhoneAuth::default(),
        ))))
        .unwrap();

        server
            .get("/api/auth/me")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_returns_current_user() {
        let app = with_customer_auth(protected_routes(service(Arc::new(
            FakePhoneAuth::default(),
        ))));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/auth/me").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["uid"], "test-customer-uid");
        assert_eq!(body["data"]["is_admin"], false);
    }
}
