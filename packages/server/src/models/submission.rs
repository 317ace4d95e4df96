use chrono::{DateTime, Utc};
use common::{ScoreSummary, SubmissionStatus};
use serde::{Deserialize, Serialize};

use crate::entity::submission;
use crate::error::AppError;
use crate::models::shared::{double_option, non_blank, required, validate_email, validate_max_len};

/// Text fields of a new submission, collected from the multipart form.
#[derive(Debug, Default, Clone)]
pub struct SubmissionForm {
    pub artist_name: String,
    pub email: String,
    pub country: String,
    pub artwork_title: Option<String>,
    pub statement: Option<String>,
}

/// A validated submission ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub artist_name: String,
    pub email: String,
    pub country: String,
    pub artwork_title: String,
    pub statement: Option<String>,
    pub image_urls: Vec<String>,
}

impl SubmissionForm {
    /// Validate the text fields. The artwork title falls back to the artist
    /// name when left blank.
    pub fn validate(self) -> Result<ValidForm, AppError> {
        let artist_name = required(&self.artist_name, "Artist name")?;
        validate_max_len(&artist_name, 256, "Artist name")?;
        let email = required(&self.email, "Email")?;
        validate_email(&email)?;
        let country = required(&self.country, "Country")?;
        validate_max_len(&country, 128, "Country")?;

        let artwork_title = non_blank(self.artwork_title).unwrap_or_else(|| artist_name.clone());
        validate_max_len(&artwork_title, 256, "Artwork title")?;
        let statement = non_blank(self.statement);
        if let Some(s) = &statement {
            validate_max_len(s, 10_000, "Statement")?;
        }

        Ok(ValidForm(NewSubmission {
            artist_name,
            email,
            country,
            artwork_title,
            statement,
            image_urls: Vec::new(),
        }))
    }
}

/// Text fields that passed validation; images are attached separately.
#[derive(Debug)]
pub struct ValidForm(NewSubmission);

impl ValidForm {
    pub fn with_images(self, image_urls: Vec<String>) -> Result<NewSubmission, AppError> {
        if image_urls.is_empty() {
            return Err(AppError::Validation(
                "At least one image is required".into(),
            ));
        }
        Ok(NewSubmission {
            image_urls,
            ..self.0
        })
    }
}

/// Complete submission record, as seen by its owner and by admins.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SubmissionResponse {
    pub id: i32,
    pub artist_id: Option<i32>,
    #[schema(example = "Jane Doe")]
    pub artist_name: String,
    pub email: String,
    #[schema(example = "France")]
    pub country: String,
    pub artwork_title: Option<String>,
    pub statement: Option<String>,
    pub image_urls: Vec<String>,
    pub status: SubmissionStatus,
    /// Set on first approval.
    pub anonymous_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<submission::Model> for SubmissionResponse {
    fn from(m: submission::Model) -> Self {
        let image_urls = m.image_url_list();
        Self {
            id: m.id,
            artist_id: m.artist_id,
            artist_name: m.artist_name,
            email: m.email,
            country: m.country,
            artwork_title: m.artwork_title,
            statement: m.statement,
            image_urls,
            status: m.status,
            anonymous_id: m.anonymous_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Public gallery entry. Shows the artist's name, never their email.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct GalleryItem {
    pub id: i32,
    pub artist_name: String,
    pub country: String,
    pub artwork_title: Option<String>,
    pub image_urls: Vec<String>,
}

impl From<submission::Model> for GalleryItem {
    fn from(m: submission::Model) -> Self {
        let image_urls = m.image_url_list();
        Self {
            id: m.id,
            artist_name: m.artist_name,
            country: m.country,
            artwork_title: m.artwork_title,
            image_urls,
        }
    }
}

/// Anonymized projection shown to jurors. Carries no artist identity.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct JurySubmission {
    pub id: i32,
    #[schema(example = 1)]
    pub anonymous_id: Option<i32>,
    pub artwork_title: Option<String>,
    pub statement: Option<String>,
    pub image_urls: Vec<String>,
    pub country: String,
    pub created_at: DateTime<Utc>,
}

impl From<submission::Model> for JurySubmission {
    fn from(m: submission::Model) -> Self {
        let image_urls = m.image_url_list();
        Self {
            id: m.id,
            anonymous_id: m.anonymous_id,
            artwork_title: m.artwork_title,
            statement: m.statement,
            image_urls,
            country: m.country,
            created_at: m.created_at,
        }
    }
}

/// One row of the artist dashboard.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ArtistSubmission {
    #[serde(flatten)]
    pub submission: SubmissionResponse,
    /// Absent until at least one juror has scored it.
    pub scores: Option<ScoreSummary>,
}

/// Artist dashboard: own submissions plus totals.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ArtistDashboardResponse {
    pub submissions: Vec<ArtistSubmission>,
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    /// Mean of the average totals of scored submissions.
    #[schema(example = 36.0)]
    pub overall_average: Option<f64>,
}

/// Partial update of an artist's own pending submission.
#[derive(Debug, Default, PartialEq, Deserialize, utoipa::ToSchema)]
pub struct UpdateSubmissionRequest {
    pub artist_name: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub artwork_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub statement: Option<Option<String>>,
}

pub fn validate_update_submission(payload: &UpdateSubmissionRequest) -> Result<(), AppError> {
    if let Some(name) = &payload.artist_name {
        validate_max_len(&required(name, "Artist name")?, 256, "Artist name")?;
    }
    if let Some(email) = &payload.email {
        validate_email(&required(email, "Email")?)?;
    }
    if let Some(country) = &payload.country {
        validate_max_len(&required(country, "Country")?, 128, "Country")?;
    }
    if let Some(Some(title)) = &payload.artwork_title {
        validate_max_len(title, 256, "Artwork title")?;
    }
    if let Some(Some(statement)) = &payload.statement {
        validate_max_len(statement, 10_000, "Statement")?;
    }
    Ok(())
}

/// Admin status change.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateStatusRequest {
    /// One of `pending`, `approved`, `rejected`.
    #[schema(example = "approved")]
    pub status: String,
}

impl UpdateStatusRequest {
    pub fn parse(&self) -> Result<SubmissionStatus, AppError> {
        self.status
            .trim()
            .parse()
            .map_err(|e: common::submission_status::ParseStatusError| {
                AppError::Validation(e.to_string())
            })
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubmissionListQuery {
    /// Only return submissions with this status.
    pub status: Option<String>,
}

impl SubmissionListQuery {
    pub fn status_filter(&self) -> Result<Option<SubmissionStatus>, AppError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => s
                .parse()
                .map(Some)
                .map_err(|e: common::submission_status::ParseStatusError| {
                    AppError::Validation(e.to_string())
                }),
        }
    }
}
