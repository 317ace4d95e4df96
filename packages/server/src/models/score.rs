use chrono::{DateTime, Utc};
use common::{Criteria, ScoreSummary};
use serde::{Deserialize, Serialize};

use crate::entity::score;
use crate::error::AppError;
use crate::models::shared::{non_blank, validate_max_len};
use crate::models::submission::{JurySubmission, SubmissionResponse};

/// A juror's score for one submission. Any total sent by the client is ignored.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ScoreRequest {
    #[schema(example = 7)]
    pub creativity: i32,
    #[schema(example = 8)]
    pub technique: i32,
    #[schema(example = 6)]
    pub concept: i32,
    #[schema(example = 9)]
    pub presentation: i32,
    pub comments: Option<String>,
}

impl ScoreRequest {
    pub fn criteria(&self) -> Criteria {
        Criteria {
            creativity: self.creativity,
            technique: self.technique,
            concept: self.concept,
            presentation: self.presentation,
        }
    }

    /// All-or-nothing validation: one bad criterion rejects the whole score.
    pub fn validate(self) -> Result<(Criteria, Option<String>), AppError> {
        let criteria = self.criteria();
        criteria
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let comments = non_blank(self.comments);
        if let Some(c) = &comments {
            validate_max_len(c, 5000, "Comments")?;
        }
        Ok((criteria, comments))
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ScoreResponse {
    pub id: i32,
    pub submission_id: i32,
    pub jury_id: i32,
    pub creativity: i32,
    pub technique: i32,
    pub concept: i32,
    pub presentation: i32,
    /// Sum of the four criteria.
    #[schema(example = 30)]
    pub total: i32,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<score::Model> for ScoreResponse {
    fn from(m: score::Model) -> Self {
        Self {
            id: m.id,
            submission_id: m.submission_id,
            jury_id: m.jury_id,
            creativity: m.creativity,
            technique: m.technique,
            concept: m.concept,
            presentation: m.presentation,
            total: m.total,
            comments: m.comments,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// One of the juror's own scores with the anonymized submission it rates.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct JuryScoredItem {
    pub score: ScoreResponse,
    pub submission: JurySubmission,
    /// Aggregate over every juror's score of this submission.
    pub summary: Option<ScoreSummary>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct JuryStatsResponse {
    /// Scores this juror has given.
    pub total_scored: u64,
    /// Approved submissions this juror has not scored yet.
    pub total_pending: u64,
}

/// Admin results row.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ResultItem {
    pub submission: SubmissionResponse,
    pub summary: Option<ScoreSummary>,
}
