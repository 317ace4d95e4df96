use common::Criteria;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One juror's rating of one submission. `(submission_id, jury_id)` is
/// unique; see `seed::ensure_indexes`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "score")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub submission_id: i32,
    #[sea_orm(belongs_to, from = "submission_id", to = "id")]
    pub submission: HasOne<super::submission::Entity>,

    pub jury_id: i32,
    #[sea_orm(belongs_to, from = "jury_id", to = "id")]
    pub jury: HasOne<super::user::Entity>,

    pub creativity: i32,
    pub technique: i32,
    pub concept: i32,
    pub presentation: i32,
    pub total: i32,
    #[sea_orm(column_type = "Text")]
    pub comments: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn criteria(&self) -> Criteria {
        Criteria {
            creativity: self.creativity,
            technique: self.technique,
            concept: self.concept,
            presentation: self.presentation,
        }
    }
}
