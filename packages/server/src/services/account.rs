use chrono::Utc;
use common::Role;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;

use crate::entity::{artist_profile, jury_profile, user};
use crate::error::AppError;
use crate::models::auth::RegisterRequest;
use crate::models::profile::{CreateJuryRequest, UpsertProfileRequest};
use crate::models::shared::non_blank;
use crate::utils::hash;

/// Fixed credential that provisions the shared jury account on first use.
pub const JURY_BOOTSTRAP_EMAIL: &str = "jury@wakanexus.com";
pub const JURY_BOOTSTRAP_PASSWORD: &str = "waka2024";
const JURY_BOOTSTRAP_NAME: &str = "WAKA Nexus Jury";
const JURY_BOOTSTRAP_TITLE: &str = "Official Jury member";

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_or_internal(password: &str) -> Result<String, AppError> {
    hash::hash_password(password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {e}")))
}

fn map_email_conflict(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::EmailTaken,
        _ => AppError::from(e),
    }
}

/// User accounts, credentials and profiles.
pub struct AccountService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> AccountService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, AppError> {
        Ok(user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.conn)
            .await?)
    }

    async fn insert_user(
        &self,
        email: String,
        password: &str,
        name: String,
        role: Role,
    ) -> Result<user::Model, AppError> {
        user::ActiveModel {
            email: Set(email),
            password: Set(hash_or_internal(password)?),
            name: Set(name),
            role: Set(role),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.conn)
        .await
        .map_err(map_email_conflict)
    }

    /// Create an artist account and its (possibly empty) profile.
    pub async fn register(&self, payload: RegisterRequest) -> Result<user::Model, AppError> {
        let email = normalize_email(&payload.email);
        let user = self
            .insert_user(email, &payload.password, payload.name.trim().to_string(), Role::Artist)
            .await?;

        artist_profile::ActiveModel {
            user_id: Set(user.id),
            bio: Set(None),
            website: Set(None),
            country: Set(non_blank(payload.country)),
            social_links: Set(None),
            updated_at: Set(Utc::now()),
        }
        .insert(self.conn)
        .await?;

        tracing::info!(user_id = user.id, "Artist registered");
        Ok(user)
    }

    /// Check an email/password pair. The jury bootstrap credential is handled
    /// before the regular lookup.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<user::Model, AppError> {
        let email = normalize_email(email);
        if email == JURY_BOOTSTRAP_EMAIL && hash::secrets_match(password, JURY_BOOTSTRAP_PASSWORD) {
            return self.bootstrap_jury().await;
        }

        let Some(user) = self.find_by_email(&email).await? else {
            hash::verify_dummy(password);
            return Err(AppError::InvalidCredentials);
        };

        let is_valid = hash::verify_password(password, &user.password)
            .map_err(|e| AppError::Internal(format!("Password verify error: {e}")))?;
        if !is_valid {
            return Err(AppError::InvalidCredentials);
        }
        Ok(user)
    }

    /// Provision the shared jury account, or restore its jury role if it drifted.
    async fn bootstrap_jury(&self) -> Result<user::Model, AppError> {
        let mut user = match self.find_by_email(JURY_BOOTSTRAP_EMAIL).await? {
            Some(existing) => existing,
            None => self.provision_bootstrap_jury().await?,
        };

        if user.role != Role::Jury {
            tracing::info!(user_id = user.id, from = %user.role, "Restoring jury role on bootstrap account");
            let mut active: user::ActiveModel = user.into();
            active.role = Set(Role::Jury);
            user = active.update(self.conn).await?;
        }

        let profile = jury_profile::ActiveModel {
            user_id: Set(user.id),
            title: Set(Some(JURY_BOOTSTRAP_TITLE.to_string())),
            bio: Set(None),
            avatar_url: Set(None),
            active: Set(true),
        };
        let inserted = jury_profile::Entity::insert(profile)
            .on_conflict(
                OnConflict::column(jury_profile::Column::UserId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await;
        match inserted {
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e.into()),
        }

        Ok(user)
    }

    /// Insert the bootstrap user. A concurrent login may win the race, so the
    /// row is re-read either way.
    async fn provision_bootstrap_jury(&self) -> Result<user::Model, AppError> {
        let seed = user::ActiveModel {
            email: Set(JURY_BOOTSTRAP_EMAIL.to_string()),
            password: Set(hash_or_internal(JURY_BOOTSTRAP_PASSWORD)?),
            name: Set(JURY_BOOTSTRAP_NAME.to_string()),
            role: Set(Role::Jury),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let inserted = user::Entity::insert(seed)
            .on_conflict(OnConflict::column(user::Column::Email).do_nothing().to_owned())
            .exec_without_returning(self.conn)
            .await;
        match inserted {
            Ok(n) if n > 0 => tracing::info!("Jury bootstrap account provisioned"),
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e.into()),
        }

        self.find_by_email(JURY_BOOTSTRAP_EMAIL)
            .await?
            .ok_or_else(|| AppError::Internal("jury bootstrap account missing".into()))
    }

    /// Create a jury account with an active profile.
    pub async fn create_jury_member(
        &self,
        payload: CreateJuryRequest,
    ) -> Result<(user::Model, jury_profile::Model), AppError> {
        let user = self
            .insert_user(
                normalize_email(&payload.email),
                &payload.password,
                payload.name.trim().to_string(),
                Role::Jury,
            )
            .await?;

        let profile = jury_profile::ActiveModel {
            user_id: Set(user.id),
            title: Set(non_blank(payload.title)),
            bio: Set(None),
            avatar_url: Set(None),
            active: Set(true),
        }
        .insert(self.conn)
        .await?;

        tracing::info!(user_id = user.id, "Jury member created");
        Ok((user, profile))
    }

    pub async fn list_jury_members(
        &self,
    ) -> Result<Vec<(user::Model, Option<jury_profile::Model>)>, AppError> {
        let users = user::Entity::find()
            .filter(user::Column::Role.eq(Role::Jury))
            .order_by_asc(user::Column::Name)
            .all(self.conn)
            .await?;
        let ids: Vec<i32> = users.iter().map(|u| u.id).collect();
        let mut profiles: std::collections::HashMap<i32, jury_profile::Model> =
            jury_profile::Entity::find()
                .filter(jury_profile::Column::UserId.is_in(ids))
                .all(self.conn)
                .await?
                .into_iter()
                .map(|p| (p.user_id, p))
                .collect();

        Ok(users
            .into_iter()
            .map(|u| {
                let profile = profiles.remove(&u.id);
                (u, profile)
            })
            .collect())
    }

    pub async fn get_profile(
        &self,
        user_id: i32,
    ) -> Result<Option<artist_profile::Model>, AppError> {
        Ok(artist_profile::Entity::find_by_id(user_id)
            .one(self.conn)
            .await?)
    }

    /// Replace the artist profile, creating it if absent.
    pub async fn upsert_profile(
        &self,
        user_id: i32,
        payload: UpsertProfileRequest,
    ) -> Result<artist_profile::Model, AppError> {
        let model = artist_profile::ActiveModel {
            user_id: Set(user_id),
            bio: Set(non_blank(payload.bio)),
            website: Set(non_blank(payload.website)),
            country: Set(non_blank(payload.country)),
            social_links: Set(non_blank(payload.social_links)),
            updated_at: Set(Utc::now()),
        };

        artist_profile::Entity::insert(model)
            .on_conflict(
                OnConflict::column(artist_profile::Column::UserId)
                    .update_columns([
                        artist_profile::Column::Bio,
                        artist_profile::Column::Website,
                        artist_profile::Column::Country,
                        artist_profile::Column::SocialLinks,
                        artist_profile::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await?;

        self.get_profile(user_id)
            .await?
            .ok_or_else(|| AppError::Internal("artist profile missing after upsert".into()))
    }
}
