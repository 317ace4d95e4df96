use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::Utc;
use common::{Criteria, ScoreSummary, SubmissionStatus};
use sea_orm::sea_query::{LockType, OnConflict, Query as SeaQuery};
use sea_orm::*;

use crate::entity::{score, submission};
use crate::error::AppError;

/// Jury scoring: one score per (submission, juror), plus aggregation.
pub struct ScoringService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

/// Counters shown on the jury dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JuryStats {
    pub total_scored: u64,
    pub total_pending: u64,
}

impl<'a, C: ConnectionTrait> ScoringService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Insert or overwrite the juror's score for a submission.
    ///
    /// Criteria must already be validated. The total is recomputed here.
    /// Run inside a transaction: the submission row is share-locked so a
    /// concurrent status change or delete cannot slip in before the write.
    pub async fn submit(
        &self,
        jury_id: i32,
        submission_id: i32,
        criteria: Criteria,
        comments: Option<String>,
    ) -> Result<score::Model, AppError> {
        criteria
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let target = submission::Entity::find_by_id(submission_id)
            .lock(LockType::Share)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Submission not found".into()))?;
        if !target.status.is_visible_to_jury() {
            return Err(AppError::InvalidState(format!(
                "Submission is {} and cannot be scored",
                target.status
            )));
        }

        let now = Utc::now();
        let model = score::ActiveModel {
            submission_id: Set(submission_id),
            jury_id: Set(jury_id),
            creativity: Set(criteria.creativity),
            technique: Set(criteria.technique),
            concept: Set(criteria.concept),
            presentation: Set(criteria.presentation),
            total: Set(criteria.total()),
            comments: Set(comments),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        score::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([score::Column::SubmissionId, score::Column::JuryId])
                    .update_columns([
                        score::Column::Creativity,
                        score::Column::Technique,
                        score::Column::Concept,
                        score::Column::Presentation,
                        score::Column::Total,
                        score::Column::Comments,
                        score::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await?;

        let saved = score::Entity::find()
            .filter(score::Column::SubmissionId.eq(submission_id))
            .filter(score::Column::JuryId.eq(jury_id))
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::Internal("score missing after upsert".into()))?;

        tracing::info!(
            submission_id,
            jury_id,
            total = saved.total,
            "Score recorded"
        );
        Ok(saved)
    }

    pub async fn stats(&self, jury_id: i32) -> Result<JuryStats, AppError> {
        let total_scored = score::Entity::find()
            .filter(score::Column::JuryId.eq(jury_id))
            .count(self.conn)
            .await?;

        let total_pending = submission::Entity::find()
            .filter(submission::Column::Status.eq(SubmissionStatus::Approved))
            .filter(
                submission::Column::Id.not_in_subquery(
                    SeaQuery::select()
                        .column(score::Column::SubmissionId)
                        .from(score::Entity)
                        .and_where(score::Column::JuryId.eq(jury_id))
                        .to_owned(),
                ),
            )
            .count(self.conn)
            .await?;

        Ok(JuryStats {
            total_scored,
            total_pending,
        })
    }

    /// The juror's scores with the submissions they rate, newest first.
    pub async fn list_scored_by_jury(
        &self,
        jury_id: i32,
    ) -> Result<Vec<(score::Model, submission::Model)>, AppError> {
        let scores = score::Entity::find()
            .filter(score::Column::JuryId.eq(jury_id))
            .order_by_desc(score::Column::UpdatedAt)
            .all(self.conn)
            .await?;

        let ids: Vec<i32> = scores.iter().map(|s| s.submission_id).collect();
        let mut submissions: HashMap<i32, submission::Model> = submission::Entity::find()
            .filter(submission::Column::Id.is_in(ids))
            .all(self.conn)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(scores
            .into_iter()
            .filter_map(|s| submissions.remove(&s.submission_id).map(|sub| (s, sub)))
            .collect())
    }

    /// Aggregate scores per submission. Unscored ids are absent from the map.
    pub async fn summaries(
        &self,
        submission_ids: &[i32],
    ) -> Result<HashMap<i32, ScoreSummary>, AppError> {
        if submission_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let scores = score::Entity::find()
            .filter(score::Column::SubmissionId.is_in(submission_ids.iter().copied()))
            .all(self.conn)
            .await?;

        let mut grouped: HashMap<i32, Vec<Criteria>> = HashMap::new();
        for s in &scores {
            grouped.entry(s.submission_id).or_default().push(s.criteria());
        }

        Ok(grouped
            .into_iter()
            .filter_map(|(id, criteria)| ScoreSummary::from_scores(&criteria).map(|s| (id, s)))
            .collect())
    }

    /// Every approved submission with its summary, best average first and
    /// unscored submissions last.
    pub async fn results(
        &self,
    ) -> Result<Vec<(submission::Model, Option<ScoreSummary>)>, AppError> {
        let approved = submission::Entity::find()
            .filter(submission::Column::Status.eq(SubmissionStatus::Approved))
            .order_by_asc(submission::Column::AnonymousId)
            .all(self.conn)
            .await?;
        let ids: Vec<i32> = approved.iter().map(|s| s.id).collect();
        let mut summaries = self.summaries(&ids).await?;

        let mut rows: Vec<_> = approved
            .into_iter()
            .map(|s| {
                let summary = summaries.remove(&s.id);
                (s, summary)
            })
            .collect();
        rows.sort_by(|(_, a), (_, b)| rank_by_average(a.as_ref(), b.as_ref()));
        Ok(rows)
    }
}

/// Descending by average total; unscored after every scored entry.
fn rank_by_average(a: Option<&ScoreSummary>, b: Option<&ScoreSummary>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
