use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use sea_orm::TransactionTrait;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::{
    AdminLoginRequest, AdminSessionResponse, LoginRequest, PrincipalResponse, RegisterRequest,
    validate_login_request, validate_register_request,
};
use crate::services::account::AccountService;
use crate::state::AppState;
use crate::utils::{hash, session};

fn issue_user_cookie(
    state: &AppState,
    jar: CookieJar,
    user: &crate::entity::user::Model,
) -> Result<CookieJar, AppError> {
    let token = session::sign_user(
        user.id,
        &user.email,
        &user.name,
        user.role,
        &state.config.auth.session_secret,
    )
    .map_err(|e| AppError::Internal(format!("Session sign error: {e}")))?;
    Ok(jar.add(session::user_cookie(token, state.config.auth.secure_cookies)))
}

#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    operation_id = "register",
    summary = "Register an artist account",
    description = "Creates an artist account with an artist profile and signs the user in.",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, session cookie set", body = PrincipalResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Email already registered (EMAIL_TAKEN)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_register_request(&payload)?;

    let txn = state.db.begin().await?;
    let user = AccountService::new(&txn).register(payload).await?;
    txn.commit().await?;

    let jar = issue_user_cookie(&state, jar, &user)?;
    Ok((StatusCode::CREATED, jar, Json(PrincipalResponse::from(user))))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Sign in with email and password",
    description = "Sets a 7-day `user_session` cookie. The fixed jury bootstrap credential provisions the shared jury account on first use.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in, session cookie set", body = PrincipalResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Wrong email or password (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_login_request(&payload)?;

    let txn = state.db.begin().await?;
    let user = AccountService::new(&txn)
        .authenticate(&payload.email, &payload.password)
        .await?;
    txn.commit().await?;

    tracing::debug!(user_id = user.id, role = %user.role, "User signed in");
    let jar = issue_user_cookie(&state, jar, &user)?;
    Ok((jar, Json(PrincipalResponse::from(user))))
}

#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    operation_id = "logout",
    summary = "Sign out",
    description = "Clears the `user_session` cookie. The token itself stays valid until it expires.",
    responses((status = 204, description = "Cookie cleared")),
)]
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        jar.remove(session::removal_cookie(session::USER_COOKIE)),
    )
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    operation_id = "me",
    summary = "Current signed-in user",
    responses(
        (status = 200, description = "Current principal", body = PrincipalResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
)]
#[instrument(skip(auth_user), fields(user_id = auth_user.user_id))]
pub async fn me(auth_user: AuthUser) -> Json<PrincipalResponse> {
    Json(auth_user.into())
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Admin",
    operation_id = "adminLogin",
    summary = "Sign in with the shared admin password",
    description = "Sets a 24-hour `admin_session` cookie. Always fails when no admin password is configured.",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AdminSessionResponse),
        (status = 401, description = "Wrong password (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar, payload))]
pub async fn admin_login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<AdminLoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let expected = &state.config.auth.admin_password;
    if expected.is_empty() {
        tracing::error!("Admin login attempted but no admin password is configured");
        return Err(AppError::InvalidCredentials);
    }
    if !hash::secrets_match(&payload.password, expected) {
        tracing::warn!("Admin login failed");
        return Err(AppError::InvalidCredentials);
    }

    let token = session::sign_admin(&state.config.auth.session_secret)
        .map_err(|e| AppError::Internal(format!("Session sign error: {e}")))?;
    tracing::info!("Admin signed in");
    Ok((
        jar.add(session::admin_cookie(token, state.config.auth.secure_cookies)),
        Json(AdminSessionResponse {
            authenticated: true,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/logout",
    tag = "Admin",
    operation_id = "adminLogout",
    summary = "End the admin session",
    responses((status = 204, description = "Cookie cleared")),
)]
pub async fn admin_logout(jar: CookieJar) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        jar.remove(session::removal_cookie(session::ADMIN_COOKIE)),
    )
}

#[utoipa::path(
    get,
    path = "/session",
    tag = "Admin",
    operation_id = "adminSession",
    summary = "Whether the caller holds a valid admin session",
    responses((status = 200, description = "Admin session state", body = AdminSessionResponse)),
)]
pub async fn admin_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Json<AdminSessionResponse> {
    let authenticated = jar
        .get(session::ADMIN_COOKIE)
        .is_some_and(|c| session::verify_admin(c.value(), &state.config.auth.session_secret).is_ok());
    Json(AdminSessionResponse { authenticated })
}
