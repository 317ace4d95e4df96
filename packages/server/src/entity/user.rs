use common::Role;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub email: String,
    /// Argon2id PHC string. Never leaves the server.
    #[serde(skip_serializing)]
    pub password: String,
    pub name: String,
    pub role: Role,

    #[sea_orm(has_one)]
    pub artist_profile: HasOne<super::artist_profile::Entity>,

    #[sea_orm(has_one)]
    pub jury_profile: HasOne<super::jury_profile::Entity>,

    #[sea_orm(has_many)]
    pub submissions: HasMany<super::submission::Entity>,

    #[sea_orm(has_many)]
    pub scores: HasMany<super::score::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
