use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{artist_profile, jury_profile, user};
use crate::error::AppError;
use crate::models::shared::{required, validate_email, validate_max_len};

/// Artist profile. Every field is optional.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ArtistProfileResponse {
    pub user_id: i32,
    pub bio: Option<String>,
    #[schema(example = "https://jane.example.com")]
    pub website: Option<String>,
    #[schema(example = "France")]
    pub country: Option<String>,
    pub social_links: Option<String>,
    /// Absent until the profile is first saved.
    pub updated_at: Option<DateTime<Utc>>,
}

impl ArtistProfileResponse {
    pub fn empty(user_id: i32) -> Self {
        Self {
            user_id,
            bio: None,
            website: None,
            country: None,
            social_links: None,
            updated_at: None,
        }
    }
}

impl From<artist_profile::Model> for ArtistProfileResponse {
    fn from(m: artist_profile::Model) -> Self {
        Self {
            user_id: m.user_id,
            bio: m.bio,
            website: m.website,
            country: m.country,
            social_links: m.social_links,
            updated_at: Some(m.updated_at),
        }
    }
}

/// Full replacement of the artist profile. Blank strings clear a field.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpsertProfileRequest {
    pub bio: Option<String>,
    pub website: Option<String>,
    pub country: Option<String>,
    pub social_links: Option<String>,
}

pub fn validate_upsert_profile(payload: &UpsertProfileRequest) -> Result<(), AppError> {
    if let Some(bio) = &payload.bio {
        validate_max_len(bio, 5000, "Bio")?;
    }
    if let Some(website) = &payload.website {
        validate_max_len(website, 512, "Website")?;
    }
    if let Some(country) = &payload.country {
        validate_max_len(country, 128, "Country")?;
    }
    if let Some(links) = &payload.social_links {
        validate_max_len(links, 2000, "Social links")?;
    }
    Ok(())
}

/// Request body for creating a jury account.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateJuryRequest {
    #[schema(example = "Maria Rossi")]
    pub name: String,
    #[schema(example = "maria@example.com")]
    pub email: String,
    pub password: String,
    #[schema(example = "Curator, Museo d'Arte")]
    pub title: Option<String>,
}

pub fn validate_create_jury(payload: &CreateJuryRequest) -> Result<(), AppError> {
    let name = required(&payload.name, "Name")?;
    validate_max_len(&name, 128, "Name")?;
    validate_email(&payload.email)?;
    crate::models::auth::validate_password(&payload.password)?;
    if let Some(title) = &payload.title {
        validate_max_len(title, 256, "Title")?;
    }
    Ok(())
}

/// A jury member with profile data.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct JuryMemberResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl JuryMemberResponse {
    pub fn new(user: user::Model, profile: Option<jury_profile::Model>) -> Self {
        let (title, bio, avatar_url, active) = match profile {
            Some(p) => (p.title, p.bio, p.avatar_url, p.active),
            None => (None, None, None, false),
        };
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            title,
            bio,
            avatar_url,
            active,
            created_at: user.created_at,
        }
    }
}
