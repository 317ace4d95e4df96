use common::Role;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::models::shared::{required, validate_email, validate_max_len};

/// Request body for artist registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "jane@example.com")]
    pub email: String,
    /// Password (8-128 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    /// Copied into the artist profile.
    #[schema(example = "France")]
    pub country: Option<String>,
}

pub fn validate_register_request(payload: &RegisterRequest) -> Result<(), AppError> {
    validate_email(&payload.email)?;
    let name = required(&payload.name, "Name")?;
    validate_max_len(&name, 128, "Name")?;
    validate_password(&payload.password)
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < 8 || password.chars().count() > 128 {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    Ok(())
}

/// Request body for user login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Request body for the shared-password admin login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct AdminLoginRequest {
    pub password: String,
}

/// The signed-in principal, as carried in the session cookie.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PrincipalResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    pub role: Role,
}

impl From<AuthUser> for PrincipalResponse {
    fn from(user: AuthUser) -> Self {
        Self {
            id: user.user_id,
            email: user.email,
            name: user.name,
            role: user.role,
        }
    }
}

impl From<crate::entity::user::Model> for PrincipalResponse {
    fn from(user: crate::entity::user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        }
    }
}

/// Whether the caller holds a valid admin session.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AdminSessionResponse {
    pub authenticated: bool,
}
