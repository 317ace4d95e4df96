use common::SubmissionStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// NULL for legacy entries made without an account.
    pub artist_id: Option<i32>,
    #[sea_orm(belongs_to, from = "artist_id", to = "id")]
    pub artist: HasOne<super::user::Entity>,

    pub artist_name: String,
    pub email: String,
    pub country: String,
    pub artwork_title: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub statement: Option<String>,
    /// JSON array of image URLs, in upload order.
    #[sea_orm(column_type = "Text")]
    pub image_urls: String,

    pub status: SubmissionStatus,
    /// Assigned on first approval, then never changed.
    #[sea_orm(unique)]
    pub anonymous_id: Option<i32>,

    #[sea_orm(has_many)]
    pub scores: HasMany<super::score::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Decode the stored image URL list. Malformed data reads as empty.
    pub fn image_url_list(&self) -> Vec<String> {
        match serde_json::from_str::<Vec<String>>(&self.image_urls) {
            Ok(urls) => urls,
            Err(e) => {
                tracing::error!(submission_id = self.id, error = %e, "Malformed image_urls");
                Vec::new()
            }
        }
    }
}

/// Encode an image URL list for storage.
pub fn encode_image_urls(urls: &[String]) -> String {
    serde_json::to_string(urls).unwrap_or_else(|_| "[]".to_string())
}
