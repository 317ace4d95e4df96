use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Name of the counter handing out submission anonymous ids.
pub const ANONYMOUS_ID: &str = "submission_anonymous_id";

/// Named monotonic counters, incremented under a row lock.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "counter")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    /// Last value handed out.
    pub value: i32,
}

impl ActiveModelBehavior for ActiveModel {}
