use sea_orm::sea_query::{Index, OnConflict, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::entity::{counter, score, submission};

/// Create the anonymous-id counter, starting after the highest id already
/// handed out.
pub async fn seed_counters(db: &DatabaseConnection) -> Result<(), DbErr> {
    let highest: Option<i32> = submission::Entity::find()
        .select_only()
        .column_as(submission::Column::AnonymousId.max(), "max_id")
        .into_tuple::<Option<i32>>()
        .one(db)
        .await?
        .flatten();

    let model = counter::ActiveModel {
        name: Set(counter::ANONYMOUS_ID.to_string()),
        value: Set(highest.unwrap_or(0)),
    };

    let result = counter::Entity::insert(model)
        .on_conflict(
            OnConflict::column(counter::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(n) if n > 0 => info!(start = highest.unwrap_or(0), "Seeded anonymous id counter"),
        Ok(_) | Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e),
    }

    Ok(())
}

/// Ensure required database indexes exist.
///
/// Schema sync has no composite unique constraint, so the one-score-per-juror
/// rule is enforced by an index created here. Failing to create it is fatal.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let stmt = Index::create()
        .if_not_exists()
        .unique()
        .name("idx_score_submission_jury")
        .table(score::Entity)
        .col(score::Column::SubmissionId)
        .col(score::Column::JuryId)
        .to_string(PostgresQueryBuilder);
    db.execute_unprepared(&stmt).await?;
    info!("Ensured index idx_score_submission_jury exists");

    // Jury listings: approved submissions by anonymous id.
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_submission_status_anonymous")
        .table(submission::Entity)
        .col(submission::Column::Status)
        .col(submission::Column::AnonymousId)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => info!("Ensured index idx_submission_status_anonymous exists"),
        Err(e) => tracing::warn!(
            "Failed to create index idx_submission_status_anonymous: {}",
            e
        ),
    }

    Ok(())
}
