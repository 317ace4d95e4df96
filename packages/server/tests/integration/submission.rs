use serde_json::json;

use crate::common::{ImagePart, TestApp, routes};

const FORM: &[(&str, &str)] = &[
    ("artistName", "Jane Doe"),
    ("email", "jane@example.com"),
    ("country", "France"),
    ("artworkTitle", "Blue Hour"),
];

mod create {
    use super::*;

    #[tokio::test]
    async fn artist_submission_starts_pending_with_stored_images() {
        let app = TestApp::spawn().await;
        let artist = app.register_artist("jane@example.com", "Jane Doe").await;

        let res = app
            .post_form(
                routes::SUBMISSIONS,
                FORM,
                vec![
                    ("images", ImagePart::png("front")),
                    ("images", ImagePart::png("detail")),
                ],
                Some(&artist),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["status"], "pending");
        assert!(res.body["anonymous_id"].is_null());
        assert_eq!(res.body["artwork_title"], "Blue Hour");
        assert!(res.body["artist_id"].is_number());

        let urls = res.body["image_urls"].as_array().unwrap();
        assert_eq!(urls.len(), 2);
        let first = urls[0].as_str().unwrap();
        assert!(first.starts_with("/api/v1/uploads/"), "{first}");
        assert!(first.ends_with(".png"), "{first}");

        let image = app.get(first, None).await;
        assert_eq!(image.status, 200);
        assert_eq!(image.headers["content-type"], "image/png");
        assert!(image.text.ends_with("front"));
    }

    #[tokio::test]
    async fn blank_title_falls_back_to_artist_name() {
        let app = TestApp::spawn().await;
        let artist = app.register_artist("jane@example.com", "Jane Doe").await;

        let res = app
            .post_form(
                routes::SUBMISSIONS,
                &[
                    ("artist_name", "Jane Doe"),
                    ("email", "jane@example.com"),
                    ("country", "France"),
                    ("artwork_title", "   "),
                ],
                vec![("images[]", ImagePart::png("untitled"))],
                Some(&artist),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["artwork_title"], "Jane Doe");
    }

    #[tokio::test]
    async fn submission_without_images_is_rejected() {
        let app = TestApp::spawn().await;
        let artist = app.register_artist("jane@example.com", "Jane Doe").await;

        let res = app
            .post_form(routes::SUBMISSIONS, FORM, vec![], Some(&artist))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn non_image_upload_is_rejected() {
        let app = TestApp::spawn().await;
        let artist = app.register_artist("jane@example.com", "Jane Doe").await;

        let pdf = ImagePart {
            file_name: "portfolio.pdf",
            mime: "application/pdf",
            bytes: b"%PDF-1.7".to_vec(),
        };
        let res = app
            .post_form(routes::SUBMISSIONS, FORM, vec![("images", pdf)], Some(&artist))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn missing_country_is_rejected() {
        let app = TestApp::spawn().await;
        let artist = app.register_artist("jane@example.com", "Jane Doe").await;

        let res = app
            .post_form(
                routes::SUBMISSIONS,
                &[("artistName", "Jane Doe"), ("email", "jane@example.com")],
                vec![("images", ImagePart::png("a"))],
                Some(&artist),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn public_submission_has_no_owner() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(
                routes::PUBLIC_SUBMISSIONS,
                FORM,
                vec![("image", ImagePart::png("walk-in"))],
                None,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["artist_id"].is_null());
        assert_eq!(res.body["status"], "pending");
    }

    #[tokio::test]
    async fn authenticated_endpoint_requires_a_session() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(
                routes::SUBMISSIONS,
                FORM,
                vec![("images", ImagePart::png("a"))],
                None,
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn jurors_cannot_submit_artwork() {
        let app = TestApp::spawn().await;
        let juror = app.login("jury@wakanexus.com", "waka2024").await;

        let res = app
            .post_form(
                routes::SUBMISSIONS,
                FORM,
                vec![("images", ImagePart::png("a"))],
                Some(&juror),
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}

mod gallery {
    use super::*;

    #[tokio::test]
    async fn gallery_lists_only_approved_work_without_emails() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;
        let artist = app.register_artist("jane@example.com", "Jane Doe").await;

        let approved = app.submit_artwork(&artist, "Approved").await;
        let pending = app.submit_artwork(&artist, "Pending").await;
        let rejected = app.submit_artwork(&artist, "Rejected").await;
        app.set_status(&admin, approved, "approved").await;
        app.set_status(&admin, rejected, "rejected").await;

        let res = app.get(routes::SUBMISSIONS, None).await;

        assert_eq!(res.status, 200);
        let items = res.body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], approved);
        assert_eq!(items[0]["artist_name"], "Jane Doe");
        assert!(items[0].get("email").is_none());
        assert!(items.iter().all(|i| i["id"] != pending));
    }
}

mod artist_dashboard {
    use super::*;

    #[tokio::test]
    async fn dashboard_counts_submissions_by_status() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;
        let artist = app.register_artist("jane@example.com", "Jane Doe").await;

        let a = app.submit_artwork(&artist, "One").await;
        app.submit_artwork(&artist, "Two").await;
        let c = app.submit_artwork(&artist, "Three").await;
        app.set_status(&admin, a, "approved").await;
        app.set_status(&admin, c, "rejected").await;

        let res = app.get(routes::ARTIST_SUBMISSIONS, Some(&artist)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["total"], 3);
        assert_eq!(res.body["pending"], 1);
        assert_eq!(res.body["approved"], 1);
        assert_eq!(res.body["rejected"], 1);
        assert!(res.body["overall_average"].is_null());
        assert_eq!(res.body["submissions"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn artists_only_see_their_own_submissions() {
        let app = TestApp::spawn().await;
        let jane = app.register_artist("jane@example.com", "Jane Doe").await;
        let john = app.register_artist("john@example.com", "John Roe").await;

        let id = app.submit_artwork(&jane, "Mine").await;

        let res = app.get(&routes::artist_submission(id), Some(&john)).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");

        let dashboard = app.get(routes::ARTIST_SUBMISSIONS, Some(&john)).await;
        assert_eq!(dashboard.body["total"], 0);
    }
}

mod artist_edit {
    use super::*;

    #[tokio::test]
    async fn pending_submission_can_be_edited() {
        let app = TestApp::spawn().await;
        let artist = app.register_artist("jane@example.com", "Jane Doe").await;
        let id = app.submit_artwork(&artist, "Draft").await;

        let res = app
            .patch(
                &routes::artist_submission(id),
                &json!({"artwork_title": "Final", "statement": null}),
                Some(&artist),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["artwork_title"], "Final");
        assert!(res.body["statement"].is_null());
        assert_eq!(res.body["artist_name"], "Jane Doe");
    }

    #[tokio::test]
    async fn approved_submission_is_locked_for_the_artist() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;
        let artist = app.register_artist("jane@example.com", "Jane Doe").await;
        let id = app.submit_artwork(&artist, "Locked").await;
        app.set_status(&admin, id, "approved").await;

        let edit = app
            .patch(
                &routes::artist_submission(id),
                &json!({"artwork_title": "Changed"}),
                Some(&artist),
            )
            .await;
        assert_eq!(edit.status, 409);
        assert_eq!(edit.body["code"], "INVALID_STATE");

        let delete = app
            .delete(&routes::artist_submission(id), Some(&artist))
            .await;
        assert_eq!(delete.status, 409);
        assert_eq!(delete.body["code"], "INVALID_STATE");

        let admin_delete = app
            .delete(&routes::admin_submission(id), Some(&admin))
            .await;
        assert_eq!(admin_delete.status, 204);

        let gone = app.get(&routes::admin_submission(id), Some(&admin)).await;
        assert_eq!(gone.status, 404);
    }

    #[tokio::test]
    async fn pending_submission_can_be_withdrawn() {
        let app = TestApp::spawn().await;
        let artist = app.register_artist("jane@example.com", "Jane Doe").await;
        let id = app.submit_artwork(&artist, "Withdrawn").await;

        let res = app
            .delete(&routes::artist_submission(id), Some(&artist))
            .await;
        assert_eq!(res.status, 204);

        let gone = app.get(&routes::artist_submission(id), Some(&artist)).await;
        assert_eq!(gone.status, 404);
    }
}

mod review {
    use super::*;

    #[tokio::test]
    async fn first_approval_assigns_a_stable_anonymous_id() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;
        let artist = app.register_artist("jane@example.com", "Jane Doe").await;

        let a = app.submit_artwork(&artist, "First").await;
        let b = app.submit_artwork(&artist, "Second").await;

        let a_id = app.set_status(&admin, a, "approved").await.body["anonymous_id"].clone();
        let b_id = app.set_status(&admin, b, "approved").await.body["anonymous_id"].clone();
        assert_eq!(a_id, 1);
        assert_eq!(b_id, 2);

        app.set_status(&admin, a, "rejected").await;
        let reset = app.set_status(&admin, a, "pending").await;
        assert_eq!(reset.body["anonymous_id"], a_id);

        let again = app.set_status(&admin, a, "approved").await;
        assert_eq!(again.body["anonymous_id"], a_id);
    }

    #[tokio::test]
    async fn anonymous_ids_are_not_reused_after_deletion() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;
        let artist = app.register_artist("jane@example.com", "Jane Doe").await;

        let a = app.submit_artwork(&artist, "Deleted").await;
        app.set_status(&admin, a, "approved").await;
        app.delete(&routes::admin_submission(a), Some(&admin)).await;

        let b = app.submit_artwork(&artist, "Next").await;
        let res = app.set_status(&admin, b, "approved").await;
        assert_eq!(res.body["anonymous_id"], 2);
    }

    #[tokio::test]
    async fn unknown_status_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;
        let artist = app.register_artist("jane@example.com", "Jane Doe").await;
        let id = app.submit_artwork(&artist, "Art").await;

        let res = app
            .patch(
                &routes::admin_submission(id),
                &json!({"status": "archived"}),
                Some(&admin),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn jurors_cannot_change_status() {
        let app = TestApp::spawn().await;
        let artist = app.register_artist("jane@example.com", "Jane Doe").await;
        let juror = app.login("jury@wakanexus.com", "waka2024").await;
        let id = app.submit_artwork(&artist, "Art").await;

        let res = app
            .patch(
                &routes::admin_submission(id),
                &json!({"status": "approved"}),
                Some(&juror),
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");

        let admin = app.admin_session().await;
        let unchanged = app.get(&routes::admin_submission(id), Some(&admin)).await;
        assert_eq!(unchanged.body["status"], "pending");
        assert!(unchanged.body["anonymous_id"].is_null());
    }

    #[tokio::test]
    async fn concurrent_approvals_draw_distinct_anonymous_ids() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;
        let artist = app.register_artist("jane@example.com", "Jane Doe").await;

        let a = app.submit_artwork(&artist, "A").await;
        let b = app.submit_artwork(&artist, "B").await;
        let c = app.submit_artwork(&artist, "C").await;
        let d = app.submit_artwork(&artist, "D").await;

        let (ra, rb, rc, rd) = tokio::join!(
            app.set_status(&admin, a, "approved"),
            app.set_status(&admin, b, "approved"),
            app.set_status(&admin, c, "approved"),
            app.set_status(&admin, d, "approved"),
        );

        let mut ids: Vec<i64> = [ra, rb, rc, rd]
            .iter()
            .map(|r| r.body["anonymous_id"].as_i64().unwrap())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn status_change_of_missing_submission_is_not_found() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;

        let res = app
            .patch(
                &routes::admin_submission(999),
                &json!({"status": "approved"}),
                Some(&admin),
            )
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn admin_list_filters_by_status() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;
        let artist = app.register_artist("jane@example.com", "Jane Doe").await;

        let a = app.submit_artwork(&artist, "A").await;
        app.submit_artwork(&artist, "B").await;
        app.set_status(&admin, a, "approved").await;

        let all = app.get(routes::ADMIN_SUBMISSIONS, Some(&admin)).await;
        assert_eq!(all.body.as_array().unwrap().len(), 2);
        assert_eq!(all.body[0]["email"], "jane@example.com");

        let pending = app
            .get(
                &format!("{}?status=pending", routes::ADMIN_SUBMISSIONS),
                Some(&admin),
            )
            .await;
        let items = pending.body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["status"], "pending");

        let bogus = app
            .get(
                &format!("{}?status=archived", routes::ADMIN_SUBMISSIONS),
                Some(&admin),
            )
            .await;
        assert_eq!(bogus.status, 400);
    }
}
