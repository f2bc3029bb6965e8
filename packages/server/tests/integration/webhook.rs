use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;
use uuid::Uuid;

use pet_server::entity::webhook_log;

use crate::common::{TestApp, routes};

mod preflight_and_auth {
    use super::*;

    #[tokio::test]
    async fn preflight_returns_cors_headers_only() {
        let app = TestApp::spawn().await;

        let res = app
            .client
            .request(reqwest::Method::OPTIONS, app.url(routes::PET_CREATED_WEBHOOK))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), 200);
        assert_eq!(res.headers()["access-control-allow-origin"], "*");
        assert_eq!(
            res.headers()["access-control-allow-headers"],
            "authorization, x-client-info, apikey, content-type"
        );
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized_and_writes_nothing() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::PET_CREATED_WEBHOOK, &json!({}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body, json!({"error": "Unauthorized"}));
        assert_eq!(res.header("access-control-allow-origin"), Some("*"));

        let rows = webhook_log::Entity::find().all(&app.db).await.unwrap();
        assert!(rows.is_empty());
    }
}

mod payload {
    use super::*;

    #[tokio::test]
    async fn malformed_pet_payload_is_a_500_failure() {
        let app = TestApp::spawn().await;
        let user = app.create_user("owner@example.com", "securepass").await;

        let res = app
            .post_with_token(routes::PET_CREATED_WEBHOOK, &json!({"name": 7}), &user.token)
            .await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["success"], false);
        assert!(res.body["error"].is_string());
    }
}

mod pet_created {
    use super::*;

    /// Create Max as U: owner is U, Max heads the list, and exactly one
    /// success row is logged for U.
    #[tokio::test]
    async fn create_then_notify_logs_one_success_row() {
        let app = TestApp::spawn().await;
        let user = app.create_user("owner@example.com", "securepass").await;

        let pet = app.create_pet(&user.token, "Max", "Dog").await;
        assert_eq!(pet["user_id"], user.id.as_str());

        let list = app.get_with_token(routes::PETS, &user.token).await;
        assert_eq!(list.body[0]["name"], "Max");

        let res = app
            .post_with_token(routes::PET_CREATED_WEBHOOK, &pet, &user.token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["success"], true);
        assert_eq!(
            res.body["message"],
            "Pet created webhook processed successfully"
        );
        assert_eq!(res.body["data"]["event"], "pet.created");
        assert_eq!(res.body["data"]["user"]["id"], user.id.as_str());
        assert_eq!(res.body["data"]["user"]["email"], "owner@example.com");
        assert_eq!(res.body["data"]["pet"]["id"], pet["id"]);
        assert!(res.body["data"]["pet"].get("user_id").is_none());

        let user_id: Uuid = user.id.parse().unwrap();
        let rows = webhook_log::Entity::find()
            .filter(webhook_log::Column::UserId.eq(user_id))
            .all(&app.db)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].event_type, "pet.created");
        assert_eq!(rows[0].status, "success");
        assert_eq!(rows[0].payload["pet"]["name"], "Max");

        let feed = app.get_with_token(routes::WEBHOOK_LOGS, &user.token).await;
        assert_eq!(feed.status, 200);
        assert_eq!(feed.body.as_array().unwrap().len(), 1);
        assert_eq!(feed.body[0]["status"], "success");
    }

    #[tokio::test]
    async fn log_feed_is_scoped_and_capped_at_ten() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice@example.com", "securepass").await;
        let bob = app.create_user("bob@example.com", "securepass").await;

        let pet = app.create_pet(&alice.token, "Max", "Dog").await;
        for _ in 0..12 {
            let res = app
                .post_with_token(routes::PET_CREATED_WEBHOOK, &pet, &alice.token)
                .await;
            assert_eq!(res.status, 200);
        }

        let feed = app.get_with_token(routes::WEBHOOK_LOGS, &alice.token).await;
        assert_eq!(feed.body.as_array().unwrap().len(), 10);

        let limited = app
            .get_with_token(&format!("{}?limit=3", routes::WEBHOOK_LOGS), &alice.token)
            .await;
        assert_eq!(limited.body.as_array().unwrap().len(), 3);

        let others = app.get_with_token(routes::WEBHOOK_LOGS, &bob.token).await;
        assert!(others.body.as_array().unwrap().is_empty());
    }
}
