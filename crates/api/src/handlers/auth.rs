//! Handlers for the `/auth` resource (register, login, profile).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use eduvillage_core::account::{normalize_email, INVALID_CREDENTIALS, MIN_PASSWORD_LENGTH};
use eduvillage_core::error::CoreError;
use eduvillage_core::roles::Role;
use eduvillage_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use eduvillage_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(required(message = "is required"))]
    pub name: Option<String>,
    #[validate(required(message = "is required"))]
    pub email: Option<String>,
    #[validate(required(message = "is required"))]
    pub password: Option<String>,
    /// Defaults to `student`.
    pub role: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required(message = "is required"))]
    pub email: Option<String>,
    #[validate(required(message = "is required"))]
    pub password: Option<String>,
}

/// Request body for `PUT /auth/profile`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

/// Successful authentication response returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validation(msg: impl Into<String>) -> AppError {
    AppError::Core(CoreError::Validation(msg.into()))
}

fn required_text(value: Option<String>, field: &str) -> AppResult<String> {
    let value = value.unwrap_or_default();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Normalize an email and check its shape.
fn checked_email(raw: &str) -> AppResult<String> {
    let email = normalize_email(raw);
    if !email.validate_email() {
        return Err(validation("email: must be a valid email address"));
    }
    Ok(email)
}

fn issue_token(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let token = generate_access_token(user.id, &user.email, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Create an account and return a token for it.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input.validate()?;

    let name = required_text(input.name, "name")?;
    let email = checked_email(&required_text(input.email, "email")?)?;
    let password = input.password.unwrap_or_default();
    validate_password_strength(&password, MIN_PASSWORD_LENGTH).map_err(validation)?;
    let role = match input.role.as_deref() {
        Some(raw) => raw.parse::<Role>()?,
        None => Role::default(),
    };

    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "User already exists".into(),
        )));
    }

    let password_hash = hash_password(&password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    // A racing registration for the same email fails on uq_users_email (409).
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name,
            email,
            password_hash,
            role: role.as_str().to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, role = %role, "User registered");
    Ok((StatusCode::CREATED, Json(issue_token(&state, user)?)))
}

/// POST /api/auth/login
///
/// Authenticate with email + password.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    input.validate()?;
    let email = normalize_email(input.email.as_deref().unwrap_or_default());
    let password = input.password.unwrap_or_default();

    let invalid = || AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into()));

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid());
    }

    tracing::debug!(user_id = user.id, "User logged in");
    Ok(Json(issue_token(&state, user)?))
}

/// GET /api/auth/profile
pub async fn get_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    Ok(Json(user.into()))
}

/// PUT /api/auth/profile
///
/// Update name, email and avatar. The email stays unique after normalization.
pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    input.validate()?;

    let name = match input.name {
        Some(name) => Some(required_text(Some(name), "name")?),
        None => None,
    };
    let email = match input.email.as_deref() {
        Some(raw) => Some(checked_email(raw)?),
        None => None,
    };

    if let Some(email) = email.as_deref() {
        if let Some(existing) = UserRepo::find_by_email(&state.pool, email).await? {
            if existing.id != auth.user_id {
                return Err(AppError::Core(CoreError::Conflict(
                    "Email is already in use".into(),
                )));
            }
        }
    }

    let update = UpdateUser {
        name,
        email,
        avatar: input.avatar,
    };
    let user = UserRepo::update(&state.pool, auth.user_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    Ok(Json(user.into()))
}
