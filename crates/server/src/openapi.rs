use utoipa::OpenApi;
use utoipa::ToSchema;

// Documentation-only shapes; the handlers use the service crate's types.

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String, pub version: String }

#[derive(ToSchema)]
pub struct ErrorDoc {
    /// Human-readable title
    pub error: String,
    /// Stable machine-readable kind, e.g. `token_expired`
    pub code: String,
    pub detail: Option<String>,
}

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub username: Option<String>,
    /// Used as the username when `username` is absent
    pub name: Option<String>,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(ToSchema)]
pub struct AccountDoc { pub id: i64, pub username: String, pub email: String, pub first_name: String, pub last_name: String }

#[derive(ToSchema)]
pub struct LoginRequest {
    /// Username or email
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

#[derive(ToSchema)]
pub struct LoginResponse { pub access: String, pub refresh: String, pub user_id: i64, pub username: String, pub email: String }

#[derive(ToSchema)]
pub struct RefreshRequest { pub refresh: String }

#[derive(ToSchema)]
pub struct RefreshResponse { pub access: String }

#[derive(ToSchema)]
pub struct IdentityDoc { pub account_id: i64, pub username: String, pub email: String }

#[derive(ToSchema)]
pub struct BookingRequest {
    pub destination: Option<String>,
    /// `YYYY-MM-DD`, not in the past
    pub date: Option<String>,
    pub guests: Option<i32>,
}

#[derive(ToSchema)]
pub struct BookingDoc {
    pub id: i64,
    pub owner_id: i64,
    pub destination: String,
    pub date: String,
    pub guests: i32,
    pub created_at: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::refresh,
        crate::routes::auth::me,
        crate::routes::bookings::list,
        crate::routes::bookings::create,
        crate::routes::bookings::get,
        crate::routes::bookings::update,
        crate::routes::bookings::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            RegisterRequest,
            AccountDoc,
            LoginRequest,
            LoginResponse,
            RefreshRequest,
            RefreshResponse,
            IdentityDoc,
            BookingRequest,
            BookingDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "bookings")
    )
)]
pub struct ApiDoc;
