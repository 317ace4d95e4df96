use axum::Json;
use axum::extract::multipart::Field;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::SubmissionStatus;
use common::scoring::overall_average;
use sea_orm::TransactionTrait;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{RequireAdmin, RequireArtist};
use crate::extractors::json::AppJson;
use crate::models::submission::*;
use crate::services::scoring::ScoringService;
use crate::services::submission::SubmissionService;
use crate::state::AppState;
use crate::utils::upload::{ImagePolicy, store_image_field};

/// Body limit for multipart submissions (many images of up to 10 MiB each).
pub fn submission_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(128 * 1024 * 1024)
}

async fn field_text(field: Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read form field: {e}")))
}

/// Read the submission form, storing every image part as it arrives.
async fn read_submission_form(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<NewSubmission, AppError> {
    let policy = ImagePolicy::submission(state.config.storage.max_image_size);
    let mut form = SubmissionForm::default();
    let mut image_urls = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "images" | "images[]" | "image" => {
                if let Some(image) = store_image_field(field, &*state.images, policy).await? {
                    image_urls.push(state.config.storage.public_url(&image.key.file_name()));
                }
            }
            "artistName" | "artist_name" => form.artist_name = field_text(field).await?,
            "email" => form.email = field_text(field).await?,
            "country" => form.country = field_text(field).await?,
            "artworkTitle" | "artwork_title" => form.artwork_title = Some(field_text(field).await?),
            "statement" => form.statement = Some(field_text(field).await?),
            _ => {} // Ignore unknown fields.
        }
    }

    form.validate()?.with_images(image_urls)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Submissions",
    operation_id = "listGallery",
    summary = "Public gallery of approved submissions",
    description = "Approved submissions, newest first. Shows the artist's name and country but never their email.",
    responses((status = 200, description = "Approved submissions", body = Vec<GalleryItem>)),
)]
#[instrument(skip(state))]
pub async fn list_gallery(
    State(state): State<AppState>,
) -> Result<Json<Vec<GalleryItem>>, AppError> {
    let rows = SubmissionService::new(&state.db).list_approved().await?;
    Ok(Json(rows.into_iter().map(GalleryItem::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Submissions",
    operation_id = "createSubmission",
    summary = "Submit artwork as the signed-in artist",
    description = "Multipart form: `artistName`, `email`, `country`, optional `artworkTitle` and `statement`, and one or more `images` (JPEG, PNG, WebP or GIF, 10 MiB each). The submission starts as `pending`.",
    request_body(content_type = "multipart/form-data", description = "Submission form with images"),
    responses(
        (status = 201, description = "Submission created", body = SubmissionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, artist, multipart), fields(user_id = artist.user_id))]
pub async fn create_submission(
    RequireArtist(artist): RequireArtist,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let new = read_submission_form(&state, multipart).await?;
    let model = SubmissionService::new(&state.db)
        .create(Some(artist.user_id), new)
        .await?;
    Ok((StatusCode::CREATED, Json(SubmissionResponse::from(model))))
}

#[utoipa::path(
    post,
    path = "/public",
    tag = "Submissions",
    operation_id = "createPublicSubmission",
    summary = "Submit artwork without an account",
    description = "Same form as the authenticated endpoint; the submission has no owner and cannot be edited later.",
    request_body(content_type = "multipart/form-data", description = "Submission form with images"),
    responses(
        (status = 201, description = "Submission created", body = SubmissionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn create_public_submission(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let new = read_submission_form(&state, multipart).await?;
    let model = SubmissionService::new(&state.db).create(None, new).await?;
    Ok((StatusCode::CREATED, Json(SubmissionResponse::from(model))))
}

// ---------- Artist ----------

#[utoipa::path(
    get,
    path = "/",
    tag = "Artist",
    operation_id = "artistDashboard",
    summary = "The artist's own submissions with scores and totals",
    responses(
        (status = 200, description = "Artist dashboard", body = ArtistDashboardResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, artist), fields(user_id = artist.user_id))]
pub async fn artist_dashboard(
    RequireArtist(artist): RequireArtist,
    State(state): State<AppState>,
) -> Result<Json<ArtistDashboardResponse>, AppError> {
    let rows = SubmissionService::new(&state.db)
        .list_by_artist(artist.user_id)
        .await?;
    let ids: Vec<i32> = rows.iter().map(|s| s.id).collect();
    let mut summaries = ScoringService::new(&state.db).summaries(&ids).await?;

    let count = |status: SubmissionStatus| rows.iter().filter(|s| s.status == status).count() as u64;
    let (pending, approved, rejected) = (
        count(SubmissionStatus::Pending),
        count(SubmissionStatus::Approved),
        count(SubmissionStatus::Rejected),
    );
    let total = rows.len() as u64;

    let submissions: Vec<ArtistSubmission> = rows
        .into_iter()
        .map(|s| {
            let scores = summaries.remove(&s.id);
            ArtistSubmission {
                submission: s.into(),
                scores,
            }
        })
        .collect();
    let overall_average = overall_average(submissions.iter().map(|s| s.scores.as_ref()));

    Ok(Json(ArtistDashboardResponse {
        submissions,
        total,
        pending,
        approved,
        rejected,
        overall_average,
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Artist",
    operation_id = "getArtistSubmission",
    summary = "One of the artist's own submissions",
    params(("id" = i32, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Submission", body = SubmissionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found or not owned (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, artist), fields(user_id = artist.user_id, id))]
pub async fn get_artist_submission(
    RequireArtist(artist): RequireArtist,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let model = SubmissionService::new(&state.db)
        .find_owned(&artist, id)
        .await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Artist",
    operation_id = "updateArtistSubmission",
    summary = "Edit a pending submission",
    description = "Partial update of descriptive fields. Only allowed while the submission is `pending`.",
    params(("id" = i32, Path, description = "Submission ID")),
    request_body = UpdateSubmissionRequest,
    responses(
        (status = 200, description = "Submission updated", body = SubmissionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found or not owned (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "No longer pending (INVALID_STATE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, artist, payload), fields(user_id = artist.user_id, id))]
pub async fn update_artist_submission(
    RequireArtist(artist): RequireArtist,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateSubmissionRequest>,
) -> Result<Json<SubmissionResponse>, AppError> {
    validate_update_submission(&payload)?;

    let txn = state.db.begin().await?;
    let model = SubmissionService::new(&txn)
        .update_fields(&artist, id, payload)
        .await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Artist",
    operation_id = "deleteArtistSubmission",
    summary = "Withdraw a pending submission",
    params(("id" = i32, Path, description = "Submission ID")),
    responses(
        (status = 204, description = "Submission deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found or not owned (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "No longer pending (INVALID_STATE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, artist), fields(user_id = artist.user_id, id))]
pub async fn delete_artist_submission(
    RequireArtist(artist): RequireArtist,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    SubmissionService::new(&txn)
        .delete_by_artist(&artist, id)
        .await?;
    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------- Admin ----------

#[utoipa::path(
    get,
    path = "/",
    tag = "Admin Submissions",
    operation_id = "listAllSubmissions",
    summary = "Every submission, optionally filtered by status",
    params(SubmissionListQuery),
    responses(
        (status = 200, description = "Submissions", body = Vec<SubmissionResponse>),
        (status = 400, description = "Unknown status (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, _admin, query))]
pub async fn list_all_submissions(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<SubmissionListQuery>,
) -> Result<Json<Vec<SubmissionResponse>>, AppError> {
    let status = query.status_filter()?;
    let rows = SubmissionService::new(&state.db).list_all(status).await?;
    Ok(Json(rows.into_iter().map(SubmissionResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Admin Submissions",
    operation_id = "getSubmission",
    summary = "Full submission record",
    params(("id" = i32, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Submission", body = SubmissionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Submission not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, _admin), fields(id))]
pub async fn get_submission(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let model = SubmissionService::new(&state.db).find(id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Admin Submissions",
    operation_id = "updateSubmissionStatus",
    summary = "Approve, reject or reset a submission",
    description = "The first approval assigns the next anonymous id, which is kept on every later transition.",
    params(("id" = i32, Path, description = "Submission ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = SubmissionResponse),
        (status = 400, description = "Unknown status (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Submission not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, admin, payload), fields(id, admin = %admin.label()))]
pub async fn update_submission_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateStatusRequest>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let status = payload.parse()?;

    let txn = state.db.begin().await?;
    let model = SubmissionService::new(&txn).update_status(id, status).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Admin Submissions",
    operation_id = "deleteSubmission",
    summary = "Delete any submission and its scores",
    params(("id" = i32, Path, description = "Submission ID")),
    responses(
        (status = 204, description = "Submission deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Submission not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, admin), fields(id, admin = %admin.label()))]
pub async fn delete_submission(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    SubmissionService::new(&txn).delete_by_admin(id).await?;
    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
