use serde_json::json;

use crate::common::{JWT_SECRET, TestApp, routes};

mod registration {
    use super::*;

    #[tokio::test]
    async fn new_user_can_register_with_valid_credentials() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "alice", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["message"], "User registered successfully");
        assert!(res.body["user"]["id"].is_number());
        assert_eq!(res.body["user"]["username"], "alice");
        assert!(res.body["user"].get("password").is_none());
    }

    #[tokio::test]
    async fn cannot_register_with_an_already_taken_username() {
        let app = TestApp::spawn().await;
        let body = json!({"username": "alice", "password": "securepass"});

        let first = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(first.status, 201, "First registration failed: {}", first.text);

        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "USERNAME_TAKEN");
    }

    #[tokio::test]
    async fn cannot_register_with_a_password_that_is_too_short() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "alice", "password": "short"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_register_with_an_invalid_username() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "no spaces!", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::REGISTER, &json!({"username": "alice"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn registered_user_receives_a_token() {
        let app = TestApp::spawn().await;
        let body = json!({"username": "alice", "password": "securepass"});
        app.post_without_token(routes::REGISTER, &body).await;

        let res = app.post_without_token(routes::LOGIN, &body).await;

        assert_eq!(res.status, 200);
        assert!(res.body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(res.body["user"]["username"], "alice");

        let claims = quote_server::utils::jwt::verify(
            res.body["token"].as_str().unwrap(),
            JWT_SECRET,
        )
        .unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(i64::from(claims.uid), res.body["user"]["id"].as_i64().unwrap());
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;
        app.post_without_token(
            routes::REGISTER,
            &json!({"username": "alice", "password": "securepass"}),
        )
        .await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "alice", "password": "wrongpass"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_user_is_rejected_the_same_way() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "nobody", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }
}

mod bearer {
    use super::*;

    #[tokio::test]
    async fn missing_token_is_reported_as_missing() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::QUOTES).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn garbage_token_is_reported_as_invalid() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::QUOTES, "not-a-jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn token_signed_with_another_secret_is_invalid() {
        let app = TestApp::spawn().await;
        let forged = quote_server::utils::jwt::sign(1, "mallory", "some-other-secret", 1).unwrap();

        let res = app.get_with_token(routes::QUOTES, &forged).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_invalid() {
        let app = TestApp::spawn().await;

        let res = app
            .get_with_authorization(routes::QUOTES, "Basic YWxpY2U6c2VjdXJlcGFzcw==")
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn health_needs_no_token() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::HEALTH).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "ok");
    }
}
