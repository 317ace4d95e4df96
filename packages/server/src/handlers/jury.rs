use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::TransactionTrait;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{RequireAdmin, RequireJury};
use crate::extractors::json::AppJson;
use crate::models::profile::{CreateJuryRequest, JuryMemberResponse, validate_create_jury};
use crate::models::score::{JuryScoredItem, JuryStatsResponse, ResultItem, ScoreRequest, ScoreResponse};
use crate::models::submission::JurySubmission;
use crate::services::account::AccountService;
use crate::services::scoring::ScoringService;
use crate::services::submission::SubmissionService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/submissions",
    tag = "Jury",
    operation_id = "listJurySubmissions",
    summary = "Approved submissions the juror has not scored yet",
    description = "Anonymized: no artist name or email, only the anonymous id, country, title, statement and images.",
    responses(
        (status = 200, description = "Submissions to score", body = Vec<JurySubmission>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jury), fields(jury_id = jury.user_id))]
pub async fn list_submissions(
    RequireJury(jury): RequireJury,
    State(state): State<AppState>,
) -> Result<Json<Vec<JurySubmission>>, AppError> {
    let rows = SubmissionService::new(&state.db)
        .list_for_jury(jury.user_id)
        .await?;
    Ok(Json(rows.into_iter().map(JurySubmission::from).collect()))
}

#[utoipa::path(
    get,
    path = "/scores",
    tag = "Jury",
    operation_id = "listJuryScores",
    summary = "The juror's own scores, newest first",
    responses(
        (status = 200, description = "Scored submissions", body = Vec<JuryScoredItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jury), fields(jury_id = jury.user_id))]
pub async fn list_scores(
    RequireJury(jury): RequireJury,
    State(state): State<AppState>,
) -> Result<Json<Vec<JuryScoredItem>>, AppError> {
    let scoring = ScoringService::new(&state.db);
    let rows = scoring.list_scored_by_jury(jury.user_id).await?;
    let ids: Vec<i32> = rows.iter().map(|(_, s)| s.id).collect();
    let mut summaries = scoring.summaries(&ids).await?;

    Ok(Json(
        rows.into_iter()
            .map(|(score, submission)| JuryScoredItem {
                summary: summaries.remove(&submission.id),
                score: score.into(),
                submission: submission.into(),
            })
            .collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/submissions/{id}/score",
    tag = "Jury",
    operation_id = "submitScore",
    summary = "Score a submission",
    description = "Each criterion must be an integer from 1 to 10. The total is computed server-side. Re-scoring overwrites the juror's previous score for the submission.",
    params(("id" = i32, Path, description = "Submission ID")),
    request_body = ScoreRequest,
    responses(
        (status = 200, description = "Score saved", body = ScoreResponse),
        (status = 400, description = "Criterion out of range (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Submission not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Submission is not approved (INVALID_STATE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jury, payload), fields(jury_id = jury.user_id, submission_id))]
pub async fn submit_score(
    RequireJury(jury): RequireJury,
    State(state): State<AppState>,
    Path(submission_id): Path<i32>,
    AppJson(payload): AppJson<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let (criteria, comments) = payload.validate()?;
    let txn = state.db.begin().await?;
    let score = ScoringService::new(&txn)
        .submit(jury.user_id, submission_id, criteria, comments)
        .await?;
    txn.commit().await?;
    Ok(Json(score.into()))
}

#[utoipa::path(
    get,
    path = "/stats",
    tag = "Jury",
    operation_id = "juryStats",
    summary = "Scored and remaining counts for the juror",
    responses(
        (status = 200, description = "Jury stats", body = JuryStatsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jury), fields(jury_id = jury.user_id))]
pub async fn stats(
    RequireJury(jury): RequireJury,
    State(state): State<AppState>,
) -> Result<Json<JuryStatsResponse>, AppError> {
    let stats = ScoringService::new(&state.db).stats(jury.user_id).await?;
    Ok(Json(JuryStatsResponse {
        total_scored: stats.total_scored,
        total_pending: stats.total_pending,
    }))
}

// ---------- Admin ----------

#[utoipa::path(
    get,
    path = "/results",
    tag = "Admin Jury",
    operation_id = "listResults",
    summary = "Approved submissions ranked by average score",
    description = "Unscored submissions are listed last with no summary.",
    responses(
        (status = 200, description = "Ranked results", body = Vec<ResultItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, _admin))]
pub async fn list_results(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<ResultItem>>, AppError> {
    let rows = ScoringService::new(&state.db).results().await?;
    Ok(Json(
        rows.into_iter()
            .map(|(submission, summary)| ResultItem {
                submission: submission.into(),
                summary,
            })
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/jury",
    tag = "Admin Jury",
    operation_id = "listJuryMembers",
    summary = "Every jury account with its profile",
    responses(
        (status = 200, description = "Jury members", body = Vec<JuryMemberResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, _admin))]
pub async fn list_jury_members(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<JuryMemberResponse>>, AppError> {
    let rows = AccountService::new(&state.db).list_jury_members().await?;
    Ok(Json(
        rows.into_iter()
            .map(|(user, profile)| JuryMemberResponse::new(user, profile))
            .collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/jury",
    tag = "Admin Jury",
    operation_id = "createJuryMember",
    summary = "Create a jury account",
    request_body = CreateJuryRequest,
    responses(
        (status = 201, description = "Jury member created", body = JuryMemberResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Email already registered (EMAIL_TAKEN)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, admin, payload), fields(admin = %admin.label()))]
pub async fn create_jury_member(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateJuryRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_jury(&payload)?;

    let txn = state.db.begin().await?;
    let (user, profile) = AccountService::new(&txn).create_jury_member(payload).await?;
    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(JuryMemberResponse::new(user, Some(profile))),
    ))
}
