use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use common::Role;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::session::{self, ADMIN_COOKIE, USER_COOKIE};

/// Authenticated user decoded from the `user_session` cookie.
///
/// Add this as a handler parameter to require a signed-in user of any role.
/// The cookie is trusted as signed; the password is not re-checked.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl AuthUser {
    /// Returns `Ok(())` if the user holds one of `roles`, `Err(PermissionDenied)` otherwise.
    pub fn require_role(&self, roles: &[Role]) -> Result<(), AppError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(USER_COOKIE).ok_or(AppError::TokenMissing)?;

        let claims = session::verify_user(token.value(), &state.config.auth.session_secret)
            .map_err(|_| AppError::TokenInvalid)?;

        Ok(AuthUser {
            user_id: claims.uid,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        })
    }
}

/// Signed-in user with role `artist`.
pub struct RequireArtist(pub AuthUser);

impl FromRequestParts<AppState> for RequireArtist {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.require_role(&[Role::Artist])?;
        Ok(RequireArtist(user))
    }
}

/// Signed-in user with role `jury`.
pub struct RequireJury(pub AuthUser);

impl FromRequestParts<AppState> for RequireJury {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.require_role(&[Role::Jury])?;
        Ok(RequireJury(user))
    }
}

/// Who was let through the admin gate.
#[derive(Debug, Clone)]
pub enum AdminPrincipal {
    /// Holder of the shared-password admin cookie.
    SharedPassword,
    /// A user account whose role is `admin`.
    User(AuthUser),
}

/// Admin access: either a valid `admin_session` cookie or a user session with
/// role `admin`.
///
/// No session at all is `TOKEN_MISSING`; a valid user session of another role
/// is `PERMISSION_DENIED`.
pub struct RequireAdmin(pub AdminPrincipal);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let secret = &state.config.auth.session_secret;

        if let Some(cookie) = jar.get(ADMIN_COOKIE)
            && session::verify_admin(cookie.value(), secret).is_ok()
        {
            return Ok(RequireAdmin(AdminPrincipal::SharedPassword));
        }

        match AuthUser::from_request_parts(parts, state).await {
            Ok(user) => {
                user.require_role(&[Role::Admin])?;
                Ok(RequireAdmin(AdminPrincipal::User(user)))
            }
            Err(AppError::TokenMissing) if jar.get(ADMIN_COOKIE).is_some() => {
                Err(AppError::TokenInvalid)
            }
            Err(e) => Err(e),
        }
    }
}

impl AdminPrincipal {
    /// Short label for logs.
    pub fn label(&self) -> String {
        match self {
            AdminPrincipal::SharedPassword => "admin-session".into(),
            AdminPrincipal::User(user) => format!("user:{}", user.user_id),
        }
    }
}
