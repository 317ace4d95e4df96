use serde_json::json;

use crate::common::{ADMIN_PASSWORD, PASSWORD, TestApp, routes};

mod registration {
    use super::*;

    #[tokio::test]
    async fn new_artist_is_signed_in_after_registering() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::REGISTER,
                &json!({
                    "email": "Jane@Example.com",
                    "password": PASSWORD,
                    "name": "Jane Doe",
                    "country": "France",
                }),
                None,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["email"], "jane@example.com");
        assert_eq!(res.body["role"], "artist");
        assert!(res.body.get("password").is_none());

        let cookie = res.set_cookie("user_session").unwrap();
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
    }

    #[tokio::test]
    async fn registration_creates_an_artist_profile() {
        let app = TestApp::spawn().await;
        let artist = app.register_artist("jane@example.com", "Jane Doe").await;

        let res = app.get(routes::ARTIST_PROFILE, Some(&artist)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["country"], "France");
    }

    #[tokio::test]
    async fn cannot_register_an_email_twice_in_any_case() {
        let app = TestApp::spawn().await;
        app.register_artist("jane@example.com", "Jane Doe").await;

        let res = app
            .post(
                routes::REGISTER,
                &json!({"email": "JANE@example.com", "password": PASSWORD, "name": "Other"}),
                None,
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "EMAIL_TAKEN");
    }

    #[tokio::test]
    async fn cannot_register_with_a_short_password() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::REGISTER,
                &json!({"email": "jane@example.com", "password": "short", "name": "Jane"}),
                None,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post(routes::REGISTER, &json!({"email": "jane@example.com"}), None)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn artist_can_sign_in_and_read_their_principal() {
        let app = TestApp::spawn().await;
        app.register_artist("jane@example.com", "Jane Doe").await;

        let session = app.login("jane@example.com", PASSWORD).await;
        let res = app.get(routes::ME, Some(&session)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["email"], "jane@example.com");
        assert_eq!(res.body["name"], "Jane Doe");
        assert_eq!(res.body["role"], "artist");
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;
        app.register_artist("jane@example.com", "Jane Doe").await;

        let res = app
            .post(
                routes::LOGIN,
                &json!({"email": "jane@example.com", "password": "not-the-password"}),
                None,
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
        assert!(res.set_cookie("user_session").is_none());
    }

    #[tokio::test]
    async fn unknown_email_looks_like_a_wrong_password() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::LOGIN,
                &json!({"email": "nobody@example.com", "password": PASSWORD}),
                None,
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn missing_session_is_token_missing() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::ME, None).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn forged_session_is_token_invalid() {
        let app = TestApp::spawn().await;

        let res = app
            .get(routes::ME, Some("user_session=not.a.token"))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn logout_clears_the_cookie() {
        let app = TestApp::spawn().await;
        let session = app.register_artist("jane@example.com", "Jane Doe").await;

        let res = app.post(routes::LOGOUT, &json!({}), Some(&session)).await;

        assert_eq!(res.status, 204);
        let cleared = res.set_cookie("user_session").unwrap();
        assert!(cleared.contains("Max-Age=0"), "{cleared}");
    }
}

mod jury_bootstrap {
    use super::*;

    #[tokio::test]
    async fn bootstrap_credential_provisions_a_jury_account() {
        let app = TestApp::spawn().await;

        let session = app.login("jury@wakanexus.com", "waka2024").await;
        let me = app.get(routes::ME, Some(&session)).await;

        assert_eq!(me.status, 200);
        assert_eq!(me.body["role"], "jury");

        let list = app.get(routes::JURY_SUBMISSIONS, Some(&session)).await;
        assert_eq!(list.status, 200, "{}", list.text);
    }

    #[tokio::test]
    async fn repeated_bootstrap_logins_reuse_one_account() {
        let app = TestApp::spawn().await;

        let first = app.login("jury@wakanexus.com", "waka2024").await;
        let second = app.login("JURY@wakanexus.com", "waka2024").await;

        let a = app.get(routes::ME, Some(&first)).await;
        let b = app.get(routes::ME, Some(&second)).await;
        assert_eq!(a.body["id"], b.body["id"]);

        let admin = app.admin_session().await;
        let members = app.get(routes::ADMIN_JURY, Some(&admin)).await;
        assert_eq!(members.body.as_array().unwrap().len(), 1);
        assert_eq!(members.body[0]["email"], "jury@wakanexus.com");
    }

    #[tokio::test]
    async fn bootstrap_restores_jury_role_on_an_existing_account() {
        let app = TestApp::spawn().await;
        let artist = app.register_artist("jury@wakanexus.com", "Squatter").await;
        let before = app.get(routes::ME, Some(&artist)).await;
        assert_eq!(before.body["role"], "artist");

        let session = app.login("jury@wakanexus.com", "waka2024").await;
        let me = app.get(routes::ME, Some(&session)).await;
        assert_eq!(me.body["role"], "jury");
        assert_eq!(me.body["id"], before.body["id"]);

        let admin = app.admin_session().await;
        let members = app.get(routes::ADMIN_JURY, Some(&admin)).await;
        assert_eq!(members.body.as_array().unwrap().len(), 1);
        assert_eq!(members.body[0]["email"], "jury@wakanexus.com");
        assert_eq!(members.body[0]["title"], "Official Jury member");

        // The stored hash is left alone, so the account's own password still works.
        let own = app.login("jury@wakanexus.com", PASSWORD).await;
        let me = app.get(routes::ME, Some(&own)).await;
        assert_eq!(me.body["role"], "jury");
    }

    #[tokio::test]
    async fn bootstrap_email_with_wrong_password_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::LOGIN,
                &json!({"email": "jury@wakanexus.com", "password": "guess"}),
                None,
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }
}

mod admin {
    use super::*;

    #[tokio::test]
    async fn shared_password_opens_an_admin_session() {
        let app = TestApp::spawn().await;

        let before = app.get(routes::ADMIN_SESSION, None).await;
        assert_eq!(before.body["authenticated"], false);

        let admin = app.admin_session().await;
        let after = app.get(routes::ADMIN_SESSION, Some(&admin)).await;
        assert_eq!(after.body["authenticated"], true);
    }

    #[tokio::test]
    async fn wrong_admin_password_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::ADMIN_LOGIN,
                &json!({"password": format!("{ADMIN_PASSWORD}-nope")}),
                None,
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn admin_logout_clears_the_cookie() {
        let app = TestApp::spawn().await;
        let admin = app.admin_session().await;

        let res = app
            .post(routes::ADMIN_LOGOUT, &json!({}), Some(&admin))
            .await;

        assert_eq!(res.status, 204);
        assert!(res.set_cookie("admin_session").unwrap().contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn user_session_is_not_an_admin_session() {
        let app = TestApp::spawn().await;
        let artist = app.register_artist("jane@example.com", "Jane Doe").await;

        let res = app.get(routes::ADMIN_SUBMISSIONS, Some(&artist)).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn admin_routes_require_a_session() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::ADMIN_SUBMISSIONS, None).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}
