use chrono::{Duration, Utc};
use serde_json::{Value, json};

use crate::common::{ImagePart, TestApp, routes};

async fn create_event(app: &TestApp, admin: &str, title: &str, start_in_days: i64) -> Value {
    let start = Utc::now() + Duration::days(start_in_days);
    let res = app
        .post(
            routes::ADMIN_EVENTS,
            &json!({
                "title": title,
                "description": "Opening night",
                "location": "Paris",
                "start_date": start,
                "end_date": start + Duration::hours(4),
            }),
            Some(admin),
        )
        .await;
    assert_eq!(res.status, 201, "create_event failed: {}", res.text);
    res.body
}

async fn create_partner(app: &TestApp, admin: &str, name: &str) -> i32 {
    let res = app
        .post(
            routes::ADMIN_PARTNERS,
            &json!({"name": name, "category": "Museum Partner"}),
            Some(admin),
        )
        .await;
    assert_eq!(res.status, 201, "create_partner failed: {}", res.text);
    res.id()
}

fn ids(body: &Value) -> Vec<i32> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_i64().unwrap() as i32)
        .collect()
}

mod events {
    use super::*;

    #[tokio::test]
    async fn event_status_follows_its_dates() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;

        let future = create_event(&app, &admin, "Future", 10).await;
        let past = create_event(&app, &admin, "Past", -10).await;
        assert_eq!(future["status"], "upcoming");
        assert_eq!(past["status"], "past");

        let all = app.get(routes::EVENTS, None).await;
        assert_eq!(all.status, 200);
        assert_eq!(all.body.as_array().unwrap().len(), 2);

        let upcoming = app.get(routes::UPCOMING_EVENTS, None).await;
        assert_eq!(ids(&upcoming.body), vec![future["id"].as_i64().unwrap() as i32]);
    }

    #[tokio::test]
    async fn end_before_start_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;
        let start = Utc::now();

        let res = app
            .post(
                routes::ADMIN_EVENTS,
                &json!({
                    "title": "Backwards",
                    "description": "",
                    "location": "Paris",
                    "start_date": start,
                    "end_date": start - Duration::days(1),
                }),
                Some(&admin),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn event_can_be_updated_and_deleted() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;
        let event = create_event(&app, &admin, "Draft", 5).await;
        let id = event["id"].as_i64().unwrap() as i32;

        let updated = app
            .patch(
                &routes::admin_event(id),
                &json!({"title": "Vernissage", "end_date": null}),
                Some(&admin),
            )
            .await;
        assert_eq!(updated.status, 200, "{}", updated.text);
        assert_eq!(updated.body["title"], "Vernissage");
        assert!(updated.body["end_date"].is_null());
        assert_eq!(updated.body["location"], "Paris");

        let deleted = app.delete(&routes::admin_event(id), Some(&admin)).await;
        assert_eq!(deleted.status, 204);

        let again = app
            .patch(&routes::admin_event(id), &json!({"title": "Ghost"}), Some(&admin))
            .await;
        assert_eq!(again.status, 404);
    }

    #[tokio::test]
    async fn artists_cannot_manage_events() {
        let app = TestApp::spawn().await;
        let artist = app.register_artist("jane@example.com", "Jane Doe").await;

        let res = app
            .post(
                routes::ADMIN_EVENTS,
                &json!({
                    "title": "Nope",
                    "description": "",
                    "location": "Paris",
                    "start_date": Utc::now(),
                }),
                Some(&artist),
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}

mod news {
    use super::*;

    #[tokio::test]
    async fn unpublished_news_is_hidden_from_the_public() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;

        let draft = app
            .post(
                routes::ADMIN_NEWS,
                &json!({"title": "Draft", "content": "Soon."}),
                Some(&admin),
            )
            .await;
        assert_eq!(draft.status, 201, "{}", draft.text);
        assert_eq!(draft.body["published"], false);

        let public = app.get(routes::NEWS, None).await;
        assert_eq!(public.body.as_array().unwrap().len(), 0);

        let published = app
            .patch(
                &routes::admin_news(draft.id()),
                &json!({"published": true}),
                Some(&admin),
            )
            .await;
        assert_eq!(published.status, 200, "{}", published.text);

        let public = app.get(routes::NEWS, None).await;
        assert_eq!(ids(&public.body), vec![draft.id()]);
    }

    #[tokio::test]
    async fn deleted_news_is_gone() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;
        let news = app
            .post(
                routes::ADMIN_NEWS,
                &json!({"title": "Results", "content": "Winners", "published": true}),
                Some(&admin),
            )
            .await;

        let res = app.delete(&routes::admin_news(news.id()), Some(&admin)).await;
        assert_eq!(res.status, 204);

        let again = app.delete(&routes::admin_news(news.id()), Some(&admin)).await;
        assert_eq!(again.status, 404);
    }
}

mod partners {
    use super::*;

    #[tokio::test]
    async fn partners_are_appended_in_order() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;

        let a = create_partner(&app, &admin, "Louvre").await;
        let b = create_partner(&app, &admin, "Tate").await;

        let res = app.get(routes::PARTNERS, None).await;
        assert_eq!(ids(&res.body), vec![a, b]);
        assert_eq!(res.body[0]["order"], 1);
        assert_eq!(res.body[1]["order"], 2);
    }

    #[tokio::test]
    async fn reorder_assigns_positions_from_the_array() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;

        let a = create_partner(&app, &admin, "Louvre").await;
        let b = create_partner(&app, &admin, "Tate").await;
        let c = create_partner(&app, &admin, "MoMA").await;

        let res = app
            .put(
                routes::ADMIN_PARTNERS_REORDER,
                &json!({"partner_ids": [c, a, b]}),
                Some(&admin),
            )
            .await;
        assert_eq!(res.status, 204, "{}", res.text);

        let list = app.get(routes::PARTNERS, None).await;
        assert_eq!(ids(&list.body), vec![c, a, b]);
        assert_eq!(list.body[0]["order"], 1);
        assert_eq!(list.body[2]["order"], 3);
    }

    #[tokio::test]
    async fn reorder_must_name_every_partner() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;

        let a = create_partner(&app, &admin, "Louvre").await;
        create_partner(&app, &admin, "Tate").await;

        let res = app
            .put(
                routes::ADMIN_PARTNERS_REORDER,
                &json!({"partner_ids": [a]}),
                Some(&admin),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn empty_reorder_is_a_no_op_only_without_partners() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;

        let empty = app
            .put(routes::ADMIN_PARTNERS_REORDER, &json!({"partner_ids": []}), Some(&admin))
            .await;
        assert_eq!(empty.status, 204, "{}", empty.text);

        create_partner(&app, &admin, "Louvre").await;
        let res = app
            .put(routes::ADMIN_PARTNERS_REORDER, &json!({"partner_ids": []}), Some(&admin))
            .await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn unknown_category_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;

        let res = app
            .post(
                routes::ADMIN_PARTNERS,
                &json!({"name": "Corner Shop", "category": "Snacks"}),
                Some(&admin),
            )
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn partner_can_be_updated_and_deleted() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;
        let id = create_partner(&app, &admin, "Louvre").await;

        let res = app
            .patch(
                &routes::admin_partner(id),
                &json!({"website": "https://louvre.fr", "category": "Sponsor"}),
                Some(&admin),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["website"], "https://louvre.fr");
        assert_eq!(res.body["category"], "Sponsor");

        let deleted = app.delete(&routes::admin_partner(id), Some(&admin)).await;
        assert_eq!(deleted.status, 204);
        let list = app.get(routes::PARTNERS, None).await;
        assert_eq!(list.body.as_array().unwrap().len(), 0);
    }
}

mod content_feed {
    use super::*;

    #[tokio::test]
    async fn feed_mixes_events_and_news_by_kind() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;

        create_event(&app, &admin, "Opening", 3).await;
        app.post(
            routes::ADMIN_NEWS,
            &json!({"title": "Draft", "content": "Soon."}),
            Some(&admin),
        )
        .await;

        let res = app.get(routes::ADMIN_CONTENT, Some(&admin)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let items = res.body.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["kind"], "news");
        assert_eq!(items[0]["published"], false);
        assert_eq!(items[1]["kind"], "event");
        assert_eq!(items[1]["title"], "Opening");
    }
}

mod uploads {
    use super::*;

    #[tokio::test]
    async fn uploaded_image_is_served_with_an_etag() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;

        let res = app
            .post_form(
                routes::ADMIN_UPLOADS,
                &[],
                vec![("file", ImagePart::png("logo"))],
                Some(&admin),
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        let url = res.body["url"].as_str().unwrap().to_string();
        let filename = res.body["filename"].as_str().unwrap();
        assert!(url.ends_with(filename));

        let image = app.get(&url, None).await;
        assert_eq!(image.status, 200);
        assert_eq!(image.headers["content-type"], "image/png");
        let etag = image.headers["etag"].to_str().unwrap().to_string();
        assert_eq!(etag, format!("\"{}\"", filename.trim_end_matches(".png")));

        let cached = app
            .client
            .get(app.url(&url))
            .header("If-None-Match", &etag)
            .send()
            .await
            .unwrap();
        assert_eq!(cached.status(), 304);
    }

    #[tokio::test]
    async fn gif_is_not_accepted_for_content_images() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;
        let gif = ImagePart {
            file_name: "loop.gif",
            mime: "image/gif",
            bytes: b"GIF89a".to_vec(),
        };

        let res = app
            .post_form(routes::ADMIN_UPLOADS, &[], vec![("file", gif)], Some(&admin))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn upload_without_file_field_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;

        let res = app
            .post_form(
                routes::ADMIN_UPLOADS,
                &[],
                vec![("image", ImagePart::png("wrong-field"))],
                Some(&admin),
            )
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn unknown_upload_is_not_found() {
        let app = TestApp::spawn().await;
        let missing = format!("/api/v1/uploads/{}.png", "ab".repeat(32));

        let res = app.get(&missing, None).await;
        assert_eq!(res.status, 404);

        let malformed = app.get("/api/v1/uploads/not-a-key.png", None).await;
        assert_eq!(malformed.status, 404);
    }
}
