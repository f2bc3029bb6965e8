use serde_json::json;
use uuid::Uuid;

use crate::common::{TestApp, pet_body, routes};

mod create {
    use super::*;

    #[tokio::test]
    async fn owner_is_stamped_from_the_session() {
        let app = TestApp::spawn().await;
        let user = app.create_user("owner@example.com", "securepass").await;

        let mut body = pet_body("Max", "Dog");
        body["user_id"] = json!(Uuid::now_v7().to_string());

        let res = app.post_with_token(routes::PETS, &body, &user.token).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["user_id"], user.id.as_str());
        assert_eq!(res.body["name"], "Max");
        assert_eq!(res.body["gender"], "male");
        assert_eq!(res.body["created_at"], res.body["updated_at"]);
    }

    #[tokio::test]
    async fn negative_age_is_rejected() {
        let app = TestApp::spawn().await;
        let user = app.create_user("owner@example.com", "securepass").await;

        let mut body = pet_body("Max", "Dog");
        body["age"] = json!(-1);

        let res = app.post_with_token(routes::PETS, &body, &user.token).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let app = TestApp::spawn().await;
        let user = app.create_user("owner@example.com", "securepass").await;

        let res = app
            .post_with_token(routes::PETS, &pet_body("   ", "Dog"), &user.token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn requires_a_token() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::PETS, &pet_body("Max", "Dog"))
            .await;

        assert_eq!(res.status, 401);
    }
}

mod image_url {
    use super::*;

    fn bucket_url(app: &TestApp, path: &str) -> String {
        app.url(&routes::public_object("pet-images", path))
    }

    #[tokio::test]
    async fn own_bucket_object_and_foreign_hosts_are_accepted() {
        let app = TestApp::spawn().await;
        let user = app.create_user("owner@example.com", "securepass").await;

        for url in [
            bucket_url(&app, &format!("{}/1700000000000.png", user.id)),
            "https://images.example.com/max.png?w=400".to_string(),
        ] {
            let mut body = pet_body("Max", "Dog");
            body["image_url"] = json!(url);
            let res = app.post_with_token(routes::PETS, &body, &user.token).await;
            assert_eq!(res.status, 201, "{url}: {}", res.text);
            assert_eq!(res.body["image_url"], url.as_str());
        }
    }

    #[tokio::test]
    async fn bucket_urls_that_cannot_be_removed_are_rejected_on_create() {
        let app = TestApp::spawn().await;
        let user = app.create_user("owner@example.com", "securepass").await;
        let other = app.create_user("other@example.com", "securepass").await;

        for url in [
            bucket_url(&app, &format!("{}/1.png?v=2", user.id)),
            bucket_url(&app, &format!("{}/my%20cat.png", user.id)),
            bucket_url(&app, &format!("{}/1.png", other.id)),
        ] {
            let mut body = pet_body("Max", "Dog");
            body["image_url"] = json!(url);
            let res = app.post_with_token(routes::PETS, &body, &user.token).await;
            assert_eq!(res.status, 400, "{url}: {}", res.text);
            assert_eq!(res.body["code"], "VALIDATION_ERROR");
        }

        let listed = app.get_with_token(routes::PETS, &user.token).await;
        assert_eq!(listed.body.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn bucket_urls_that_cannot_be_removed_are_rejected_on_update() {
        let app = TestApp::spawn().await;
        let user = app.create_user("owner@example.com", "securepass").await;
        let other = app.create_user("other@example.com", "securepass").await;
        let created = app.create_pet(&user.token, "Max", "Dog").await;
        let id: Uuid = created["id"].as_str().unwrap().parse().unwrap();

        let foreign = bucket_url(&app, &format!("{}/1.png", other.id));
        let res = app
            .patch_with_token(&routes::pet(id), &json!({"image_url": foreign}), &user.token)
            .await;
        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let cleared = app
            .patch_with_token(&routes::pet(id), &json!({"image_url": null}), &user.token)
            .await;
        assert_eq!(cleared.status, 200);

        let unchanged = app.get_with_token(&routes::pet(id), &user.token).await;
        assert!(unchanged.body["image_url"].is_null());
    }
}

mod list {
    use super::*;

    #[tokio::test]
    async fn lists_only_own_pets_newest_first() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice@example.com", "securepass").await;
        let bob = app.create_user("bob@example.com", "securepass").await;

        app.create_pet(&alice.token, "Max", "Dog").await;
        app.create_pet(&alice.token, "Luna", "Cat").await;
        app.create_pet(&bob.token, "Rex", "Dog").await;

        let res = app.get_with_token(routes::PETS, &alice.token).await;

        assert_eq!(res.status, 200);
        let names: Vec<&str> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Luna", "Max"]);
    }
}

mod get_update_delete {
    use super::*;

    #[tokio::test]
    async fn another_owners_pet_is_not_found() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice@example.com", "securepass").await;
        let bob = app.create_user("bob@example.com", "securepass").await;

        let pet = app.create_pet(&alice.token, "Max", "Dog").await;
        let id: Uuid = pet["id"].as_str().unwrap().parse().unwrap();

        let get = app.get_with_token(&routes::pet(id), &bob.token).await;
        assert_eq!(get.status, 404);
        assert_eq!(get.body["code"], "NOT_FOUND");

        let patch = app
            .patch_with_token(&routes::pet(id), &json!({"name": "Stolen"}), &bob.token)
            .await;
        assert_eq!(patch.status, 404);

        let delete = app.delete_with_token(&routes::pet(id), &bob.token).await;
        assert_eq!(delete.status, 404);

        let still_there = app.get_with_token(&routes::pet(id), &alice.token).await;
        assert_eq!(still_there.status, 200);
        assert_eq!(still_there.body["name"], "Max");
    }

    #[tokio::test]
    async fn patch_updates_fields_and_refreshes_timestamp() {
        let app = TestApp::spawn().await;
        let user = app.create_user("owner@example.com", "securepass").await;
        let mut body = pet_body("Max", "Dog");
        body["notes"] = json!("Loves walks");
        let created = app.post_with_token(routes::PETS, &body, &user.token).await;
        let id: Uuid = created.id().parse().unwrap();

        let res = app
            .patch_with_token(
                &routes::pet(id),
                &json!({"weight": 14.25, "notes": null}),
                &user.token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["weight"], 14.25);
        assert_eq!(res.body["name"], "Max");
        assert!(res.body["notes"].is_null());
        assert_eq!(res.body["created_at"], created.body["created_at"]);
        assert_ne!(res.body["updated_at"], created.body["updated_at"]);
    }

    #[tokio::test]
    async fn empty_patch_returns_record_unchanged() {
        let app = TestApp::spawn().await;
        let user = app.create_user("owner@example.com", "securepass").await;
        let created = app.create_pet(&user.token, "Max", "Dog").await;
        let id: Uuid = created["id"].as_str().unwrap().parse().unwrap();

        let res = app
            .patch_with_token(&routes::pet(id), &json!({}), &user.token)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, created);
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let app = TestApp::spawn().await;
        let user = app.create_user("owner@example.com", "securepass").await;
        let created = app.create_pet(&user.token, "Max", "Dog").await;
        let id: Uuid = created["id"].as_str().unwrap().parse().unwrap();

        let res = app.delete_with_token(&routes::pet(id), &user.token).await;
        assert_eq!(res.status, 204);

        let gone = app.get_with_token(&routes::pet(id), &user.token).await;
        assert_eq!(gone.status, 404);
    }
}
