//! Signed session cookies.
//!
//! There is no server-side session table: a cookie stays valid until it
//! expires, and logout only asks the browser to drop it.

use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{Duration, Utc};
use common::Role;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const USER_COOKIE: &str = "user_session";
pub const ADMIN_COOKIE: &str = "admin_session";

pub const USER_SESSION_DAYS: i64 = 7;
pub const ADMIN_SESSION_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("session secret is not configured")]
    MissingSecret,
    #[error("token is not an admin session")]
    NotAdmin,
}

/// Claims of an artist/jury/admin user session. Carries the principal and
/// nothing more sensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub uid: i32,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub exp: usize,
}

/// Claims of the shared-password admin session. No user identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub admin: bool,
    pub exp: usize,
}

fn expiry(ttl: Duration) -> usize {
    (Utc::now() + ttl).timestamp().max(0) as usize
}

fn encoding_key(secret: &str) -> Result<EncodingKey, SessionError> {
    if secret.is_empty() {
        return Err(SessionError::MissingSecret);
    }
    Ok(EncodingKey::from_secret(secret.as_bytes()))
}

/// Sign a user session token valid for seven days.
pub fn sign_user(
    user_id: i32,
    email: &str,
    name: &str,
    role: Role,
    secret: &str,
) -> Result<String, SessionError> {
    let claims = UserClaims {
        uid: user_id,
        email: email.to_owned(),
        name: name.to_owned(),
        role,
        exp: expiry(Duration::days(USER_SESSION_DAYS)),
    };
    Ok(encode(&Header::default(), &claims, &encoding_key(secret)?)?)
}

pub fn verify_user(token: &str, secret: &str) -> Result<UserClaims, SessionError> {
    let data = decode::<UserClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// Sign an admin session token valid for 24 hours.
pub fn sign_admin(secret: &str) -> Result<String, SessionError> {
    let claims = AdminClaims {
        admin: true,
        exp: expiry(Duration::hours(ADMIN_SESSION_HOURS)),
    };
    Ok(encode(&Header::default(), &claims, &encoding_key(secret)?)?)
}

pub fn verify_admin(token: &str, secret: &str) -> Result<AdminClaims, SessionError> {
    let data = decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    if !data.claims.admin {
        return Err(SessionError::NotAdmin);
    }
    Ok(data.claims)
}

/// Build an httponly, same-site strict session cookie.
pub fn session_cookie(
    name: &'static str,
    value: String,
    max_age: time::Duration,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(max_age)
        .build()
}

pub fn user_cookie(token: String, secure: bool) -> Cookie<'static> {
    session_cookie(USER_COOKIE, token, time::Duration::days(USER_SESSION_DAYS), secure)
}

pub fn admin_cookie(token: String, secure: bool) -> Cookie<'static> {
    session_cookie(
        ADMIN_COOKIE,
        token,
        time::Duration::hours(ADMIN_SESSION_HOURS),
        secure,
    )
}

/// A cookie that, once set, makes the browser discard the named session.
pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}
