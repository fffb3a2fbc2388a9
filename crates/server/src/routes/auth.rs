use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use service::auth::domain::{AccountSummary, Identity, LoginInput, RegisterInput};
use service::auth::password::{CredentialHasher, PasswordParams};
use service::auth::repository::AccountRepository;
use service::auth::service::RegistrationPolicy;
use service::auth::{AccessGuard, AuthService, TokenIssuer};
use service::booking::repository::BookingRepository;
use service::booking::BookingService;
use service::errors::ServiceError;

use crate::errors::JsonApiError;

/// Shared handler state; cheap to clone.
#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<dyn AccountRepository>>,
    pub bookings: Arc<BookingService<dyn BookingRepository>>,
    pub guard: AccessGuard,
}

impl ServerState {
    /// Wire services over the given stores using the `auth` config section.
    pub fn with_repositories(
        accounts: Arc<dyn AccountRepository>,
        bookings: Arc<dyn BookingRepository>,
        cfg: &configs::AuthConfig,
    ) -> Result<Self, ServiceError> {
        let issuer = Arc::new(TokenIssuer::from_config(cfg));
        let hasher = Arc::new(CredentialHasher::new(PasswordParams::from(cfg))?);
        let auth = AuthService::new(accounts, hasher, Arc::clone(&issuer), RegistrationPolicy::from(cfg));
        Ok(Self {
            auth: Arc::new(auth),
            bookings: Arc::new(BookingService::new(bookings)),
            guard: AccessGuard::new(issuer),
        })
    }
}

/// Decode a JSON object body into `T`. Rejections, non-object bodies and
/// shape mismatches all become a 400 in our error shape.
pub(crate) fn json_body<T: DeserializeOwned>(payload: Result<Json<Value>, JsonRejection>) -> Result<T, JsonApiError> {
    let bad_body = |detail: String| {
        JsonApiError::new(StatusCode::BAD_REQUEST, "validation_error", "malformed request body").with_detail(detail)
    };
    let Json(value) = payload.map_err(|e| bad_body(e.body_text()))?;
    if !value.is_object() {
        return Err(bad_body("request body must be a JSON object".into()));
    }
    serde_json::from_value(value).map_err(|e| bad_body(e.to_string()))
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub access: String,
    pub refresh: String,
    pub user_id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct RefreshInput {
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Serialize)]
pub struct RefreshOutput {
    pub access: String,
}

#[utoipa::path(post, path = "/api/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered", body = crate::openapi::AccountDoc), (status = 400, description = "Bad Request", body = crate::openapi::ErrorDoc)))]
pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountSummary>), JsonApiError> {
    let input: RegisterInput = json_body(payload)?;
    let summary = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

#[utoipa::path(post, path = "/api/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In", body = crate::openapi::LoginResponse), (status = 400, description = "Missing fields"), (status = 401, description = "Unauthorized", body = crate::openapi::ErrorDoc)))]
pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<LoginOutput>, JsonApiError> {
    let input: LoginInput = json_body(payload)?;
    let session = state.auth.login(input).await?;
    Ok(Json(LoginOutput {
        access: session.tokens.access,
        refresh: session.tokens.refresh,
        user_id: session.identity.account_id,
        username: session.identity.username,
        email: session.identity.email,
    }))
}

#[utoipa::path(post, path = "/api/token/refresh", tag = "auth", request_body = crate::openapi::RefreshRequest, responses((status = 200, description = "New access token", body = crate::openapi::RefreshResponse), (status = 401, description = "token_expired or token_invalid", body = crate::openapi::ErrorDoc)))]
pub async fn refresh(
    State(state): State<ServerState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RefreshOutput>, JsonApiError> {
    let token = json_body::<RefreshInput>(payload)?
        .refresh
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ServiceError::validation("refresh token required"))?;
    let access = state.auth.refresh(token.trim()).await?;
    Ok(Json(RefreshOutput { access }))
}

#[utoipa::path(get, path = "/api/me", tag = "auth", responses((status = 200, description = "Caller identity", body = crate::openapi::IdentityDoc), (status = 401, description = "Unauthorized")))]
pub async fn me(Extension(identity): Extension<Identity>) -> Json<Identity> {
    Json(identity)
}

/// Route layer for protected routes: validates `Authorization: Bearer <access>`
/// and puts the caller's [`Identity`] into request extensions. Any failure is 401.
pub async fn require_access_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let header = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let identity = state.guard.authorize_header(header).map_err(|e| {
        warn!(path = %req.uri().path(), "unauthenticated request");
        e
    })?;
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
