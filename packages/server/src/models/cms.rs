use chrono::{DateTime, Utc};
use common::EventStatus;
use serde::{Deserialize, Serialize};

use crate::entity::{event, news_item, partner};
use crate::error::AppError;
use crate::models::shared::{double_option, required, validate_max_len};

/// Accepted partner categories.
pub const PARTNER_CATEGORIES: &[&str] = &[
    "Museum Partner",
    "Gallery Partner",
    "Art Fair Partner",
    "Cultural Partner",
    "Exhibition Partner",
    "Sponsor",
];

fn validate_title(title: &str) -> Result<(), AppError> {
    let title = required(title, "Title")?;
    validate_max_len(&title, 256, "Title")
}

fn validate_dates(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Result<(), AppError> {
    if let Some(end) = end
        && end < start
    {
        return Err(AppError::Validation(
            "End date must not be before start date".into(),
        ));
    }
    Ok(())
}

// ---------- Events ----------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateEventRequest {
    #[schema(example = "WAKA Nexus Opening Night")]
    pub title: String,
    pub description: String,
    #[schema(example = "Paris")]
    pub location: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
}

pub fn validate_create_event(payload: &CreateEventRequest) -> Result<(), AppError> {
    validate_title(&payload.title)?;
    required(&payload.location, "Location")?;
    validate_dates(payload.start_date, payload.end_date)
}

#[derive(Debug, Default, PartialEq, Deserialize, utoipa::ToSchema)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub end_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
}

pub fn validate_update_event(payload: &UpdateEventRequest) -> Result<(), AppError> {
    if let Some(title) = &payload.title {
        validate_title(title)?;
    }
    if let Some(location) = &payload.location {
        required(location, "Location")?;
    }
    Ok(())
}

/// Merge a partial update into the stored dates and check the result.
pub fn merged_event_dates(
    existing: &event::Model,
    payload: &UpdateEventRequest,
) -> Result<(DateTime<Utc>, Option<DateTime<Utc>>), AppError> {
    let start = payload.start_date.unwrap_or(existing.start_date);
    let end = match payload.end_date {
        Some(end) => end,
        None => existing.end_date,
    };
    validate_dates(start, end)?;
    Ok((start, end))
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct EventResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    /// Derived from the dates at request time.
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventResponse {
    pub fn at(m: event::Model, now: DateTime<Utc>) -> Self {
        let status = m.status_at(now);
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            location: m.location,
            start_date: m.start_date,
            end_date: m.end_date,
            image_url: m.image_url,
            status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

// ---------- News ----------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateNewsRequest {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub published: bool,
}

pub fn validate_create_news(payload: &CreateNewsRequest) -> Result<(), AppError> {
    validate_title(&payload.title)?;
    required(&payload.content, "Content")?;
    Ok(())
}

#[derive(Debug, Default, PartialEq, Deserialize, utoipa::ToSchema)]
pub struct UpdateNewsRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub excerpt: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
    pub published: Option<bool>,
}

pub fn validate_update_news(payload: &UpdateNewsRequest) -> Result<(), AppError> {
    if let Some(title) = &payload.title {
        validate_title(title)?;
    }
    if let Some(content) = &payload.content {
        required(content, "Content")?;
    }
    Ok(())
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct NewsResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub image_url: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<news_item::Model> for NewsResponse {
    fn from(m: news_item::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            content: m.content,
            excerpt: m.excerpt,
            image_url: m.image_url,
            published: m.published,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

// ---------- Partners ----------

fn validate_category(category: &str) -> Result<(), AppError> {
    if !PARTNER_CATEGORIES.contains(&category.trim()) {
        return Err(AppError::Validation(format!(
            "Category must be one of: {}",
            PARTNER_CATEGORIES.join(", ")
        )));
    }
    Ok(())
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreatePartnerRequest {
    #[schema(example = "Louvre")]
    pub name: String,
    #[schema(example = "Museum Partner")]
    pub category: String,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    /// Defaults to after the last partner.
    pub order: Option<i32>,
}

pub fn validate_create_partner(payload: &CreatePartnerRequest) -> Result<(), AppError> {
    let name = required(&payload.name, "Name")?;
    validate_max_len(&name, 256, "Name")?;
    validate_category(&payload.category)?;
    if let Some(order) = payload.order
        && order < 1
    {
        return Err(AppError::Validation("Order must be >= 1".into()));
    }
    Ok(())
}

#[derive(Debug, Default, PartialEq, Deserialize, utoipa::ToSchema)]
pub struct UpdatePartnerRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub logo_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub website: Option<Option<String>>,
    pub order: Option<i32>,
}

pub fn validate_update_partner(payload: &UpdatePartnerRequest) -> Result<(), AppError> {
    if let Some(name) = &payload.name {
        validate_max_len(&required(name, "Name")?, 256, "Name")?;
    }
    if let Some(category) = &payload.category {
        validate_category(category)?;
    }
    if let Some(order) = payload.order
        && order < 1
    {
        return Err(AppError::Validation("Order must be >= 1".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ReorderPartnersRequest {
    /// Every partner id, in the desired display order.
    pub partner_ids: Vec<i32>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PartnerResponse {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

impl From<partner::Model> for PartnerResponse {
    fn from(m: partner::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            category: m.category,
            logo_url: m.logo_url,
            website: m.website,
            order: m.sort_order,
            created_at: m.created_at,
        }
    }
}

// ---------- Admin content feed ----------

/// An entry of the admin content listing, tagged by kind.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentItem {
    Event(EventResponse),
    News(NewsResponse),
}

impl ContentItem {
    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            ContentItem::Event(e) => e.created_at,
            ContentItem::News(n) => n.created_at,
        }
    }
}

/// Response of the admin image upload.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    #[schema(example = "/api/v1/uploads/3a7bd3e2360a3d29eea436fcfb7e44c735d117c42d1c1835420b6b9942dd4f1b.png")]
    pub url: String,
    pub filename: String,
}
