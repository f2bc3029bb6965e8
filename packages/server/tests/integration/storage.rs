use serde_json::json;

use crate::common::{TestApp, routes};

const BUCKET: &str = "pet-images";

fn png_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.resize(len.max(8), 0);
    bytes
}

mod upload {
    use super::*;

    #[tokio::test]
    async fn upload_then_fetch_publicly() {
        let app = TestApp::spawn().await;
        let user = app.create_user("owner@example.com", "securepass").await;
        let path = format!("{}/1718000000000.png", user.id);

        let res = app
            .upload_bytes(&routes::upload(BUCKET, &path), png_bytes(64), "image/png", false, &user.token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["path"], path.as_str());
        assert_eq!(res.body["full_path"], format!("{BUCKET}/{path}"));
        let public_url = app.url(&routes::public_object(BUCKET, &path));
        assert_eq!(res.body["public_url"], public_url.as_str());

        let fetched = app
            .client
            .get(&public_url)
            .send()
            .await
            .unwrap();
        assert_eq!(fetched.status(), 200);
        assert_eq!(fetched.headers()["content-type"], "image/png");
        assert_eq!(fetched.headers()["cache-control"], "max-age=3600");
        let etag = fetched.headers()["etag"].to_str().unwrap().to_string();
        assert_eq!(fetched.bytes().await.unwrap().to_vec(), png_bytes(64));

        let revalidated = app
            .client
            .get(app.url(&routes::public_object(BUCKET, &path)))
            .header("If-None-Match", etag)
            .send()
            .await
            .unwrap();
        assert_eq!(revalidated.status(), 304);
    }

    #[tokio::test]
    async fn second_upload_without_upsert_conflicts() {
        let app = TestApp::spawn().await;
        let user = app.create_user("owner@example.com", "securepass").await;
        let url = routes::upload(BUCKET, &format!("{}/a.png", user.id));

        let first = app
            .upload_bytes(&url, png_bytes(16), "image/png", false, &user.token)
            .await;
        assert_eq!(first.status, 200);

        let second = app
            .upload_bytes(&url, png_bytes(32), "image/png", false, &user.token)
            .await;
        assert_eq!(second.status, 409);
        assert_eq!(second.body["code"], "CONFLICT");

        let upsert = app
            .upload_bytes(&url, png_bytes(32), "image/png", true, &user.token)
            .await;
        assert_eq!(upsert.status, 200);
    }

    #[tokio::test]
    async fn non_image_content_is_rejected() {
        let app = TestApp::spawn().await;
        let user = app.create_user("owner@example.com", "securepass").await;

        let res = app
            .upload_bytes(
                &routes::upload(BUCKET, &format!("{}/notes.txt", user.id)),
                b"hello".to_vec(),
                "text/plain",
                false,
                &user.token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let app = TestApp::spawn().await;
        let user = app.create_user("owner@example.com", "securepass").await;

        let res = app
            .upload_bytes(
                &routes::upload(BUCKET, &format!("{}/big.png", user.id)),
                png_bytes(5 * 1024 * 1024 + 1),
                "image/png",
                false,
                &user.token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_write_into_another_users_prefix() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice@example.com", "securepass").await;
        let bob = app.create_user("bob@example.com", "securepass").await;

        let res = app
            .upload_bytes(
                &routes::upload(BUCKET, &format!("{}/x.png", alice.id)),
                png_bytes(16),
                "image/png",
                false,
                &bob.token,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn unknown_bucket_is_not_found() {
        let app = TestApp::spawn().await;
        let user = app.create_user("owner@example.com", "securepass").await;

        let res = app
            .upload_bytes(
                &routes::upload("avatars", &format!("{}/x.png", user.id)),
                png_bytes(16),
                "image/png",
                false,
                &user.token,
            )
            .await;

        assert_eq!(res.status, 404);
    }
}

mod remove {
    use super::*;

    #[tokio::test]
    async fn remove_deletes_listed_objects_and_ignores_missing_ones() {
        let app = TestApp::spawn().await;
        let user = app.create_user("owner@example.com", "securepass").await;
        let path = format!("{}/gone.png", user.id);
        let missing = format!("{}/never.png", user.id);

        app.upload_bytes(&routes::upload(BUCKET, &path), png_bytes(16), "image/png", false, &user.token)
            .await;

        let res = app
            .delete_json_with_token(
                &routes::remove(BUCKET),
                &json!({"prefixes": [path, missing]}),
                &user.token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body, json!([{"path": path}]));

        let fetched = app
            .get_without_token(&routes::public_object(BUCKET, &path))
            .await;
        assert_eq!(fetched.status, 404);
    }

    #[tokio::test]
    async fn cannot_remove_another_users_objects() {
        let app = TestApp::spawn().await;
        let alice = app.create_user("alice@example.com", "securepass").await;
        let bob = app.create_user("bob@example.com", "securepass").await;
        let path = format!("{}/keep.png", alice.id);

        app.upload_bytes(&routes::upload(BUCKET, &path), png_bytes(16), "image/png", false, &alice.token)
            .await;

        let res = app
            .delete_json_with_token(&routes::remove(BUCKET), &json!({"prefixes": [path]}), &bob.token)
            .await;
        assert_eq!(res.status, 403);

        let fetched = app
            .get_without_token(&routes::public_object(BUCKET, &path))
            .await;
        assert_eq!(fetched.status, 200);
    }
}
