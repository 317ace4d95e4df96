use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::RequireArtist;
use crate::extractors::json::AppJson;
use crate::models::profile::{ArtistProfileResponse, UpsertProfileRequest, validate_upsert_profile};
use crate::services::account::AccountService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/profile",
    tag = "Artist",
    operation_id = "getArtistProfile",
    summary = "The artist's profile",
    description = "Returns empty fields when the profile was never saved.",
    responses(
        (status = 200, description = "Artist profile", body = ArtistProfileResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, artist), fields(user_id = artist.user_id))]
pub async fn get_profile(
    RequireArtist(artist): RequireArtist,
    State(state): State<AppState>,
) -> Result<Json<ArtistProfileResponse>, AppError> {
    let profile = AccountService::new(&state.db)
        .get_profile(artist.user_id)
        .await?;
    Ok(Json(match profile {
        Some(p) => p.into(),
        None => ArtistProfileResponse::empty(artist.user_id),
    }))
}

#[utoipa::path(
    put,
    path = "/profile",
    tag = "Artist",
    operation_id = "upsertArtistProfile",
    summary = "Create or replace the artist's profile",
    description = "Omitted or blank fields are cleared.",
    request_body = UpsertProfileRequest,
    responses(
        (status = 200, description = "Profile saved", body = ArtistProfileResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, artist, payload), fields(user_id = artist.user_id))]
pub async fn upsert_profile(
    RequireArtist(artist): RequireArtist,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpsertProfileRequest>,
) -> Result<Json<ArtistProfileResponse>, AppError> {
    validate_upsert_profile(&payload)?;
    let profile = AccountService::new(&state.db)
        .upsert_profile(artist.user_id, payload)
        .await?;
    Ok(Json(profile.into()))
}
