use std::collections::HashSet;

use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::LockType;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{event, news_item, partner};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::RequireAdmin;
use crate::extractors::json::AppJson;
use crate::models::cms::*;
use crate::models::shared::{non_blank, validate_reorder_ids};
use crate::state::AppState;
use crate::utils::upload::{ImagePolicy, store_image_field};

// ---------- Public reads ----------

#[utoipa::path(
    get,
    path = "/events",
    tag = "Content",
    operation_id = "listEvents",
    summary = "All events, soonest first",
    responses((status = 200, description = "Events", body = Vec<EventResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<EventResponse>>, AppError> {
    let now = Utc::now();
    let rows = event::Entity::find()
        .order_by_asc(event::Column::StartDate)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(|e| EventResponse::at(e, now)).collect()))
}

#[utoipa::path(
    get,
    path = "/events/upcoming",
    tag = "Content",
    operation_id = "listUpcomingEvents",
    summary = "Upcoming and ongoing events",
    responses((status = 200, description = "Events that are not past", body = Vec<EventResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_upcoming_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    let now = Utc::now();
    let rows = event::Entity::find()
        .order_by_asc(event::Column::StartDate)
        .all(&state.db)
        .await?;
    Ok(Json(
        rows.into_iter()
            .map(|e| EventResponse::at(e, now))
            .filter(|e| e.status.is_current_or_future())
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/news",
    tag = "Content",
    operation_id = "listNews",
    summary = "Published news, newest first",
    responses((status = 200, description = "Published news", body = Vec<NewsResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_news(State(state): State<AppState>) -> Result<Json<Vec<NewsResponse>>, AppError> {
    let rows = news_item::Entity::find()
        .filter(news_item::Column::Published.eq(true))
        .order_by_desc(news_item::Column::CreatedAt)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(NewsResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/partners",
    tag = "Content",
    operation_id = "listPartners",
    summary = "Partners in display order",
    responses((status = 200, description = "Partners", body = Vec<PartnerResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_partners(
    State(state): State<AppState>,
) -> Result<Json<Vec<PartnerResponse>>, AppError> {
    let rows = partner::Entity::find()
        .order_by_asc(partner::Column::SortOrder)
        .order_by_asc(partner::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(PartnerResponse::from).collect()))
}

// ---------- Events ----------

#[utoipa::path(
    post,
    path = "/events",
    tag = "Admin Content",
    operation_id = "createEvent",
    summary = "Create an event",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, _admin, payload), fields(title = %payload.title))]
pub async fn create_event(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_event(&payload)?;

    let now = Utc::now();
    let model = event::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description),
        location: Set(payload.location.trim().to_string()),
        start_date: Set(payload.start_date),
        end_date: Set(payload.end_date),
        image_url: Set(non_blank(payload.image_url)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(EventResponse::at(model, now))))
}

#[utoipa::path(
    patch,
    path = "/events/{id}",
    tag = "Admin Content",
    operation_id = "updateEvent",
    summary = "Partially update an event",
    description = "Only provided fields change. An empty payload returns the event unchanged.",
    params(("id" = i32, Path, description = "Event ID")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, _admin, payload), fields(id))]
pub async fn update_event(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateEventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    validate_update_event(&payload)?;
    let now = Utc::now();

    if payload == UpdateEventRequest::default() {
        let existing = find_event(&state.db, id).await?;
        return Ok(Json(EventResponse::at(existing, now)));
    }

    let txn = state.db.begin().await?;
    let existing = find_event(&txn, id).await?;
    let (start_date, end_date) = merged_event_dates(&existing, &payload)?;

    let mut active: event::ActiveModel = existing.into();
    if let Some(title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(location) = payload.location {
        active.location = Set(location.trim().to_string());
    }
    active.start_date = Set(start_date);
    active.end_date = Set(end_date);
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(non_blank(image_url));
    }
    active.updated_at = Set(now);

    let model = active.update(&txn).await?;
    txn.commit().await?;
    Ok(Json(EventResponse::at(model, now)))
}

#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "Admin Content",
    operation_id = "deleteEvent",
    summary = "Delete an event",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, _admin), fields(id))]
pub async fn delete_event(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let result = event::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Event not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------- News ----------

#[utoipa::path(
    post,
    path = "/news",
    tag = "Admin Content",
    operation_id = "createNews",
    summary = "Create a news item",
    request_body = CreateNewsRequest,
    responses(
        (status = 201, description = "News item created", body = NewsResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, _admin, payload), fields(title = %payload.title))]
pub async fn create_news(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateNewsRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_news(&payload)?;

    let now = Utc::now();
    let model = news_item::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        content: Set(payload.content),
        excerpt: Set(non_blank(payload.excerpt)),
        image_url: Set(non_blank(payload.image_url)),
        published: Set(payload.published),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(NewsResponse::from(model))))
}

#[utoipa::path(
    patch,
    path = "/news/{id}",
    tag = "Admin Content",
    operation_id = "updateNews",
    summary = "Partially update a news item",
    params(("id" = i32, Path, description = "News item ID")),
    request_body = UpdateNewsRequest,
    responses(
        (status = 200, description = "News item updated", body = NewsResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "News item not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, _admin, payload), fields(id))]
pub async fn update_news(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateNewsRequest>,
) -> Result<Json<NewsResponse>, AppError> {
    validate_update_news(&payload)?;

    if payload == UpdateNewsRequest::default() {
        let existing = find_news(&state.db, id).await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;
    let existing = find_news(&txn, id).await?;

    let mut active: news_item::ActiveModel = existing.into();
    if let Some(title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(content) = payload.content {
        active.content = Set(content);
    }
    if let Some(excerpt) = payload.excerpt {
        active.excerpt = Set(non_blank(excerpt));
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(non_blank(image_url));
    }
    if let Some(published) = payload.published {
        active.published = Set(published);
    }
    active.updated_at = Set(Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/news/{id}",
    tag = "Admin Content",
    operation_id = "deleteNews",
    summary = "Delete a news item",
    params(("id" = i32, Path, description = "News item ID")),
    responses(
        (status = 204, description = "News item deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "News item not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, _admin), fields(id))]
pub async fn delete_news(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let result = news_item::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("News item not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------- Partners ----------

#[utoipa::path(
    post,
    path = "/partners",
    tag = "Admin Content",
    operation_id = "createPartner",
    summary = "Create a partner",
    description = "Without an explicit order the partner is placed after the last one.",
    request_body = CreatePartnerRequest,
    responses(
        (status = 201, description = "Partner created", body = PartnerResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, _admin, payload), fields(name = %payload.name))]
pub async fn create_partner(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePartnerRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_partner(&payload)?;

    let txn = state.db.begin().await?;
    let sort_order = match payload.order {
        Some(order) => order,
        None => next_partner_order(&txn).await?,
    };

    let model = partner::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        category: Set(payload.category.trim().to_string()),
        logo_url: Set(non_blank(payload.logo_url)),
        website: Set(non_blank(payload.website)),
        sort_order: Set(sort_order),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(PartnerResponse::from(model))))
}

#[utoipa::path(
    patch,
    path = "/partners/{id}",
    tag = "Admin Content",
    operation_id = "updatePartner",
    summary = "Partially update a partner",
    params(("id" = i32, Path, description = "Partner ID")),
    request_body = UpdatePartnerRequest,
    responses(
        (status = 200, description = "Partner updated", body = PartnerResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Partner not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, _admin, payload), fields(id))]
pub async fn update_partner(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdatePartnerRequest>,
) -> Result<Json<PartnerResponse>, AppError> {
    validate_update_partner(&payload)?;

    if payload == UpdatePartnerRequest::default() {
        let existing = find_partner(&state.db, id).await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;
    let existing = find_partner(&txn, id).await?;

    let mut active: partner::ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(category) = payload.category {
        active.category = Set(category.trim().to_string());
    }
    if let Some(logo_url) = payload.logo_url {
        active.logo_url = Set(non_blank(logo_url));
    }
    if let Some(website) = payload.website {
        active.website = Set(non_blank(website));
    }
    if let Some(order) = payload.order {
        active.sort_order = Set(order);
    }

    let model = active.update(&txn).await?;
    txn.commit().await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/partners/{id}",
    tag = "Admin Content",
    operation_id = "deletePartner",
    summary = "Delete a partner",
    params(("id" = i32, Path, description = "Partner ID")),
    responses(
        (status = 204, description = "Partner deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Partner not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, _admin), fields(id))]
pub async fn delete_partner(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let result = partner::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Partner not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/partners/reorder",
    tag = "Admin Content",
    operation_id = "reorderPartners",
    summary = "Reorder all partners",
    description = "The ID array must contain exactly every partner. Orders are assigned 1..n by array position.",
    request_body = ReorderPartnersRequest,
    responses(
        (status = 204, description = "Partners reordered"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, _admin, payload))]
pub async fn reorder_partners(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ReorderPartnersRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_reorder_ids(&payload.partner_ids, "partner_id")?;

    let txn = state.db.begin().await?;

    let existing: HashSet<i32> = partner::Entity::find()
        .select_only()
        .column(partner::Column::Id)
        .lock(LockType::Update)
        .into_tuple::<i32>()
        .all(&txn)
        .await?
        .into_iter()
        .collect();
    let requested: HashSet<i32> = payload.partner_ids.iter().copied().collect();
    if existing != requested {
        return Err(AppError::Validation(
            "partner_ids must contain exactly the existing partners".into(),
        ));
    }

    for (i, &id) in payload.partner_ids.iter().enumerate() {
        let order = i32::try_from(i + 1)
            .map_err(|_| AppError::Validation("Too many partners to reorder".into()))?;
        partner::Entity::update_many()
            .filter(partner::Column::Id.eq(id))
            .col_expr(partner::Column::SortOrder, Expr::value(order))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------- Admin feed and uploads ----------

#[utoipa::path(
    get,
    path = "/content",
    tag = "Admin Content",
    operation_id = "listContent",
    summary = "Events and news in one feed, newest first",
    description = "Each entry carries a `kind` of `event` or `news`. Unpublished news is included.",
    responses(
        (status = 200, description = "Content feed", body = Vec<ContentItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, _admin))]
pub async fn list_content(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<ContentItem>>, AppError> {
    let now = Utc::now();
    let events = event::Entity::find().all(&state.db).await?;
    let news = news_item::Entity::find().all(&state.db).await?;

    let mut items: Vec<ContentItem> = events
        .into_iter()
        .map(|e| ContentItem::Event(EventResponse::at(e, now)))
        .chain(news.into_iter().map(|n| ContentItem::News(n.into())))
        .collect();
    items.sort_by_key(|item| std::cmp::Reverse(item.created_at()));
    Ok(Json(items))
}

/// Body limit for CMS image uploads.
pub fn cms_upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(8 * 1024 * 1024)
}

#[utoipa::path(
    post,
    path = "/uploads",
    tag = "Admin Content",
    operation_id = "uploadContentImage",
    summary = "Upload an image for events, news or partners",
    description = "Single `file` field; JPEG, PNG or WebP up to 5 MiB.",
    request_body(content_type = "multipart/form-data", description = "Image file"),
    responses(
        (status = 201, description = "Image stored", body = UploadResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, _admin, multipart))]
pub async fn upload_image(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let policy = ImagePolicy::cms(state.config.storage.max_cms_image_size);
    let mut stored = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() == Some("file") {
            stored = store_image_field(field, &*state.images, policy).await?;
        }
    }

    let image = stored.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;
    let filename = image.key.file_name();
    tracing::info!(file = %filename, size = image.size, "Content image uploaded");
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            url: state.config.storage.public_url(&filename),
            filename,
        }),
    ))
}

async fn find_event<C: ConnectionTrait>(db: &C, id: i32) -> Result<event::Model, AppError> {
    event::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".into()))
}

async fn find_news<C: ConnectionTrait>(db: &C, id: i32) -> Result<news_item::Model, AppError> {
    news_item::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("News item not found".into()))
}

async fn find_partner<C: ConnectionTrait>(db: &C, id: i32) -> Result<partner::Model, AppError> {
    partner::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Partner not found".into()))
}

/// Order for a new partner: one past the current maximum.
async fn next_partner_order<C: ConnectionTrait>(db: &C) -> Result<i32, AppError> {
    let max_order: Option<i32> = partner::Entity::find()
        .select_only()
        .column_as(partner::Column::SortOrder.max(), "max_order")
        .into_tuple::<Option<i32>>()
        .one(db)
        .await?
        .flatten();
    max_order
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| AppError::Validation("Order overflow".into()))
}
