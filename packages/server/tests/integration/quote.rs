use sea_orm::EntityTrait;
use serde_json::json;

use quote_server::entity::quote;

use crate::common::{TestApp, routes};

mod crud {
    use super::*;

    #[tokio::test]
    async fn created_quote_is_returned_with_zero_votes() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .post_with_token(
                routes::QUOTES,
                &json!({"content": "  Know thyself.  ", "author": "Socrates"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["content"], "Know thyself.");
        assert_eq!(res.body["author"], "Socrates");
        assert_eq!(res.body["vote_count"], 0);
        assert!(res.body["created_at"].is_string());
        assert!(res.body["updated_at"].is_string());

        let fetched = app.get_with_token(&routes::quote(res.id()), &token).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body["content"], "Know thyself.");
    }

    #[tokio::test]
    async fn blank_or_oversized_fields_are_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let blank = app
            .post_with_token(
                routes::QUOTES,
                &json!({"content": "   ", "author": "Someone"}),
                &token,
            )
            .await;
        assert_eq!(blank.status, 400);
        assert_eq!(blank.body["code"], "VALIDATION_ERROR");

        let long = app
            .post_with_token(
                routes::QUOTES,
                &json!({"content": "x".repeat(2001), "author": "Someone"}),
                &token,
            )
            .await;
        assert_eq!(long.status, 400);
        assert_eq!(long.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn update_changes_only_the_given_fields() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        let id = app.create_quote(&token, "Old words", "Author").await;

        let res = app
            .put_with_token(&routes::quote(id), &json!({"author": "New Author"}), &token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["content"], "Old words");
        assert_eq!(res.body["author"], "New Author");
    }

    #[tokio::test]
    async fn update_of_missing_quote_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .put_with_token(&routes::quote(9999), &json!({"content": "x"}), &token)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "QUOTE_NOT_FOUND");
    }

    #[tokio::test]
    async fn delete_hides_the_quote_but_keeps_the_row() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        let id = app.create_quote(&token, "Ephemeral", "Someone").await;

        let res = app.delete_with_token(&routes::quote(id), &token).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["message"], "Quote deleted successfully");

        let fetched = app.get_with_token(&routes::quote(id), &token).await;
        assert_eq!(fetched.status, 404);
        assert_eq!(fetched.body["code"], "QUOTE_NOT_FOUND");

        let again = app.delete_with_token(&routes::quote(id), &token).await;
        assert_eq!(again.status, 404);

        let row = quote::Entity::find_by_id(id)
            .one(app.store.reader())
            .await
            .unwrap()
            .expect("soft-deleted row should remain");
        assert!(row.deleted_at.is_some());
    }

    #[tokio::test]
    async fn non_numeric_id_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        for path in ["/quotes/abc", "/quotes/-1", "/quotes/99999999999"] {
            let res = app.get_with_token(path, &token).await;
            assert_eq!(res.status, 400, "{path}");
            assert_eq!(res.body["code"], "VALIDATION_ERROR");
            assert_eq!(res.body["message"], "Invalid quote ID");
        }
    }

    #[tokio::test]
    async fn missing_token_wins_over_bad_id() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token("/quotes/abc").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}

mod listing {
    use super::*;

    async fn seeded() -> (TestApp, String) {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        app.create_quote(&token, "To be or not to be", "Shakespeare").await;
        app.create_quote(&token, "Brevity is the soul of wit", "Shakespeare").await;
        app.create_quote(&token, "I think, therefore I am", "Descartes").await;
        (app, token)
    }

    fn field(res: &crate::common::TestResponse, name: &str) -> Vec<String> {
        res.body
            .as_array()
            .expect("listing should be an array")
            .iter()
            .map(|q| q[name].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[tokio::test]
    async fn lists_every_quote_newest_first_by_default() {
        let (app, token) = seeded().await;

        let res = app.get_with_token(routes::QUOTES, &token).await;

        assert_eq!(res.status, 200);
        let ids: Vec<i64> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|q| q["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids.len(), 3);
        let mut sorted = ids.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn filters_by_exact_author() {
        let (app, token) = seeded().await;

        let res = app
            .get_with_token(&format!("{}?author=Descartes", routes::QUOTES), &token)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(field(&res, "author"), ["Descartes"]);
    }

    #[tokio::test]
    async fn search_matches_content_and_author_case_insensitively() {
        let (app, token) = seeded().await;

        let by_content = app
            .get_with_token(&format!("{}?search=BREVITY", routes::QUOTES), &token)
            .await;
        assert_eq!(field(&by_content, "content"), ["Brevity is the soul of wit"]);

        let by_author = app
            .get_with_token(&format!("{}?search=shakes&sortBy=id&order=asc", routes::QUOTES), &token)
            .await;
        assert_eq!(
            field(&by_author, "content"),
            ["To be or not to be", "Brevity is the soul of wit"]
        );
    }

    #[tokio::test]
    async fn sorts_by_allowed_columns() {
        let (app, token) = seeded().await;

        let res = app
            .get_with_token(&format!("{}?sortBy=content&order=asc", routes::QUOTES), &token)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(
            field(&res, "content"),
            [
                "Brevity is the soul of wit",
                "I think, therefore I am",
                "To be or not to be"
            ]
        );
    }

    #[tokio::test]
    async fn rejects_unknown_sort_column_and_order() {
        let (app, token) = seeded().await;

        let column = app
            .get_with_token(&format!("{}?sortBy=password", routes::QUOTES), &token)
            .await;
        assert_eq!(column.status, 400);
        assert_eq!(column.body["code"], "VALIDATION_ERROR");

        let order = app
            .get_with_token(&format!("{}?order=random", routes::QUOTES), &token)
            .await;
        assert_eq!(order.status, 400);
        assert_eq!(order.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn listing_reports_live_vote_counts() {
        let (app, token) = seeded().await;
        let target = app.create_quote(&token, "Counted", "Someone").await;

        let cast = app
            .post_with_token(&routes::vote(target), &json!({}), &token)
            .await;
        assert_eq!(cast.status, 201, "{}", cast.text);

        let res = app.get_with_token(routes::QUOTES, &token).await;
        for q in res.body.as_array().unwrap() {
            let expected = if q["id"].as_i64() == Some(i64::from(target)) { 1 } else { 0 };
            assert_eq!(q["vote_count"], expected, "quote {}", q["id"]);
        }
    }
}
