use chrono::Utc;
use common::SubmissionStatus;
use sea_orm::sea_query::{LockType, OnConflict, Query as SeaQuery};
use sea_orm::*;

use crate::entity::{counter, score, submission};
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::models::shared::non_blank;
use crate::models::submission::{NewSubmission, UpdateSubmissionRequest};

/// Persistence and lifecycle rules for submissions.
///
/// Status changes must run inside a transaction: the anonymous-id counter row
/// is locked for the rest of it.
pub struct SubmissionService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> SubmissionService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Create a pending submission. `owner` is `None` for anonymous entries.
    pub async fn create(
        &self,
        owner: Option<i32>,
        new: NewSubmission,
    ) -> Result<submission::Model, AppError> {
        if new.image_urls.is_empty() {
            return Err(AppError::Validation(
                "At least one image is required".into(),
            ));
        }
        let now = Utc::now();
        let model = submission::ActiveModel {
            artist_id: Set(owner),
            artist_name: Set(new.artist_name),
            email: Set(new.email),
            country: Set(new.country),
            artwork_title: Set(Some(new.artwork_title)),
            statement: Set(new.statement),
            image_urls: Set(submission::encode_image_urls(&new.image_urls)),
            status: Set(SubmissionStatus::Pending),
            anonymous_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;

        tracing::info!(submission_id = model.id, artist_id = ?owner, "Submission created");
        Ok(model)
    }

    pub async fn find(&self, id: i32) -> Result<submission::Model, AppError> {
        submission::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Submission not found".into()))
    }

    async fn find_for_update(&self, id: i32) -> Result<submission::Model, AppError> {
        submission::Entity::find_by_id(id)
            .lock(LockType::Update)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Submission not found".into()))
    }

    /// A submission owned by `artist`. Other artists' entries read as missing.
    pub async fn find_owned(
        &self,
        artist: &AuthUser,
        id: i32,
    ) -> Result<submission::Model, AppError> {
        let model = self.find(id).await?;
        if model.artist_id != Some(artist.user_id) {
            return Err(AppError::NotFound("Submission not found".into()));
        }
        Ok(model)
    }

    async fn find_owned_for_update(
        &self,
        artist: &AuthUser,
        id: i32,
    ) -> Result<submission::Model, AppError> {
        let model = self.find_for_update(id).await?;
        if model.artist_id != Some(artist.user_id) {
            return Err(AppError::NotFound("Submission not found".into()));
        }
        Ok(model)
    }

    /// Admin status change. The first transition into `approved` draws the
    /// next anonymous id; later transitions never touch it.
    pub async fn update_status(
        &self,
        id: i32,
        status: SubmissionStatus,
    ) -> Result<submission::Model, AppError> {
        let existing = self.find_for_update(id).await?;
        let previous = existing.status;
        let needs_anonymous_id =
            status == SubmissionStatus::Approved && existing.anonymous_id.is_none();

        let mut active: submission::ActiveModel = existing.into();
        if needs_anonymous_id {
            let anonymous_id = self.next_anonymous_id().await?;
            active.anonymous_id = Set(Some(anonymous_id));
            tracing::info!(submission_id = id, anonymous_id, "Anonymous id assigned");
        }
        active.status = Set(status);
        active.updated_at = Set(Utc::now());

        let model = active.update(self.conn).await?;
        tracing::info!(submission_id = id, from = %previous, to = %status, "Submission status changed");
        Ok(model)
    }

    /// Increment the anonymous-id counter under a row lock.
    async fn next_anonymous_id(&self) -> Result<i32, AppError> {
        let seed = counter::ActiveModel {
            name: Set(counter::ANONYMOUS_ID.to_string()),
            value: Set(0),
        };
        let inserted = counter::Entity::insert(seed)
            .on_conflict(
                OnConflict::column(counter::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await;
        match inserted {
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e.into()),
        }

        let row = counter::Entity::find_by_id(counter::ANONYMOUS_ID)
            .lock(LockType::Update)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::Internal("anonymous id counter missing".into()))?;

        let next = row
            .value
            .checked_add(1)
            .ok_or_else(|| AppError::Internal("anonymous id counter overflow".into()))?;
        counter::ActiveModel {
            name: Set(row.name),
            value: Set(next),
        }
        .update(self.conn)
        .await?;
        Ok(next)
    }

    /// Edit descriptive fields of the artist's own submission while pending.
    pub async fn update_fields(
        &self,
        artist: &AuthUser,
        id: i32,
        payload: UpdateSubmissionRequest,
    ) -> Result<submission::Model, AppError> {
        let existing = self.find_owned_for_update(artist, id).await?;
        if !existing.status.is_editable_by_artist() {
            return Err(AppError::InvalidState(format!(
                "Submission is {} and can no longer be edited",
                existing.status
            )));
        }

        if payload == UpdateSubmissionRequest::default() {
            return Ok(existing);
        }

        let fallback_title = payload
            .artist_name
            .as_deref()
            .map(str::trim)
            .unwrap_or(&existing.artist_name)
            .to_string();

        let mut active: submission::ActiveModel = existing.into();
        if let Some(name) = payload.artist_name {
            active.artist_name = Set(name.trim().to_string());
        }
        if let Some(email) = payload.email {
            active.email = Set(email.trim().to_string());
        }
        if let Some(country) = payload.country {
            active.country = Set(country.trim().to_string());
        }
        if let Some(title) = payload.artwork_title {
            active.artwork_title = Set(Some(non_blank(title).unwrap_or(fallback_title)));
        }
        if let Some(statement) = payload.statement {
            active.statement = Set(non_blank(statement));
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(self.conn).await?)
    }

    /// Artist withdrawal; only while pending.
    pub async fn delete_by_artist(&self, artist: &AuthUser, id: i32) -> Result<(), AppError> {
        let existing = self.find_owned_for_update(artist, id).await?;
        if !existing.status.is_editable_by_artist() {
            return Err(AppError::InvalidState(format!(
                "Submission is {} and can no longer be deleted",
                existing.status
            )));
        }
        self.remove(id).await
    }

    /// Admin delete, regardless of status.
    pub async fn delete_by_admin(&self, id: i32) -> Result<(), AppError> {
        self.find_for_update(id).await?;
        self.remove(id).await
    }

    async fn remove(&self, id: i32) -> Result<(), AppError> {
        score::Entity::delete_many()
            .filter(score::Column::SubmissionId.eq(id))
            .exec(self.conn)
            .await?;
        submission::Entity::delete_by_id(id).exec(self.conn).await?;
        tracing::info!(submission_id = id, "Submission deleted");
        Ok(())
    }

    /// Public gallery, newest first.
    pub async fn list_approved(&self) -> Result<Vec<submission::Model>, AppError> {
        Ok(submission::Entity::find()
            .filter(submission::Column::Status.eq(SubmissionStatus::Approved))
            .order_by_desc(submission::Column::CreatedAt)
            .all(self.conn)
            .await?)
    }

    /// Approved submissions this juror has not scored yet, by anonymous id.
    pub async fn list_for_jury(&self, jury_id: i32) -> Result<Vec<submission::Model>, AppError> {
        Ok(submission::Entity::find()
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
            .order_by_asc(submission::Column::AnonymousId)
            .all(self.conn)
            .await?)
    }

    pub async fn list_by_artist(
        &self,
        artist_id: i32,
    ) -> Result<Vec<submission::Model>, AppError> {
        Ok(submission::Entity::find()
            .filter(submission::Column::ArtistId.eq(artist_id))
            .order_by_desc(submission::Column::CreatedAt)
            .all(self.conn)
            .await?)
    }

    /// Every submission, optionally filtered by status, newest first.
    pub async fn list_all(
        &self,
        status: Option<SubmissionStatus>,
    ) -> Result<Vec<submission::Model>, AppError> {
        let mut select = submission::Entity::find();
        if let Some(status) = status {
            select = select.filter(submission::Column::Status.eq(status));
        }
        Ok(select
            .order_by_desc(submission::Column::CreatedAt)
            .all(self.conn)
            .await?)
    }
}
