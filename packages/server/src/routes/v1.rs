use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/submissions", submission_routes())
        .nest("/artist", artist_routes())
        .nest("/jury", jury_routes())
        .nest("/admin", admin_routes())
        .nest("/uploads", upload_routes())
        .merge(public_content_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::logout))
        .routes(routes!(handlers::auth::me))
}

fn submission_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::submission::list_gallery,
            handlers::submission::create_submission
        ))
        .routes(routes!(handlers::submission::create_public_submission))
        .layer(handlers::submission::submission_body_limit())
}

fn artist_routes() -> OpenApiRouter<AppState> {
    let submissions = OpenApiRouter::new()
        .routes(routes!(handlers::submission::artist_dashboard))
        .routes(routes!(
            handlers::submission::get_artist_submission,
            handlers::submission::update_artist_submission,
            handlers::submission::delete_artist_submission
        ));

    OpenApiRouter::new()
        .routes(routes!(
            handlers::profile::get_profile,
            handlers::profile::upsert_profile
        ))
        .nest("/submissions", submissions)
}

fn jury_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::jury::list_submissions))
        .routes(routes!(handlers::jury::list_scores))
        .routes(routes!(handlers::jury::submit_score))
        .routes(routes!(handlers::jury::stats))
}

fn admin_routes() -> OpenApiRouter<AppState> {
    let submissions = OpenApiRouter::new()
        .routes(routes!(handlers::submission::list_all_submissions))
        .routes(routes!(
            handlers::submission::get_submission,
            handlers::submission::update_submission_status,
            handlers::submission::delete_submission
        ));

    let uploads = OpenApiRouter::new()
        .routes(routes!(handlers::cms::upload_image))
        .layer(handlers::cms::cms_upload_body_limit());

    OpenApiRouter::new()
        .routes(routes!(handlers::auth::admin_login))
        .routes(routes!(handlers::auth::admin_logout))
        .routes(routes!(handlers::auth::admin_session))
        .nest("/submissions", submissions)
        .routes(routes!(handlers::jury::list_results))
        .routes(routes!(
            handlers::jury::list_jury_members,
            handlers::jury::create_jury_member
        ))
        .routes(routes!(handlers::cms::create_event))
        .routes(routes!(
            handlers::cms::update_event,
            handlers::cms::delete_event
        ))
        .routes(routes!(handlers::cms::create_news))
        .routes(routes!(handlers::cms::update_news, handlers::cms::delete_news))
        .routes(routes!(handlers::cms::create_partner))
        .routes(routes!(handlers::cms::reorder_partners))
        .routes(routes!(
            handlers::cms::update_partner,
            handlers::cms::delete_partner
        ))
        .routes(routes!(handlers::cms::list_content))
        .merge(uploads)
}

fn upload_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::uploads::get_upload))
}

fn public_content_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::cms::list_events))
        .routes(routes!(handlers::cms::list_upcoming_events))
        .routes(routes!(handlers::cms::list_news))
        .routes(routes!(handlers::cms::list_partners))
}
