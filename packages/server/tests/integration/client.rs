use std::sync::Arc;

use ::common::auth::Credentials;
use ::common::pet::{Gender, NewPet};
use ::common::webhook::{LogStatus, PET_CREATED_EVENT};
use pet_client::backend::{
    BlobBucket, IdentityProvider, RecordStore, SideEffectFunction, UploadOptions,
};
use pet_client::notice;
use pet_client::upload::ImageFile;
use pet_client::{App, ClientConfig, ClientError, HttpBackend, Notice, Services, View};

use crate::common::TestApp;

fn png_bytes() -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.resize(64, 0);
    bytes
}

fn credentials() -> Credentials {
    Credentials {
        email: "owner@example.com".into(),
        password: "securepass".into(),
    }
}

fn max(image_url: Option<String>) -> NewPet {
    NewPet {
        name: "Max".into(),
        species: "Dog".into(),
        breed: "Golden Retriever".into(),
        age: 3.0,
        weight: 30.0,
        color: "Golden".into(),
        gender: Gender::Male,
        image_url,
        notes: None,
    }
}

/// An `App` talking HTTP to `app`, plus the services it was built from.
fn client_for(app: &TestApp) -> (App, Services) {
    let backend = HttpBackend::new(ClientConfig {
        base_url: format!("http://{}", app.addr),
        ..ClientConfig::default()
    })
    .unwrap();
    let services = Services::from_backend(Arc::new(backend));
    (App::new(services.clone()), services)
}

/// Sign up and in, leaving the app on the signed-in view.
async fn signed_in(app: &TestApp) -> (App, Services) {
    let (mut client, services) = client_for(app);
    client.load().await;
    assert_eq!(client.view(), &View::SignedOut);

    client.sign_up(&credentials()).await.unwrap();
    client.sign_in(&credentials()).await.unwrap();
    assert!(matches!(client.view(), View::SignedIn(_)));
    (client, services)
}

mod records_and_logs {
    use super::*;

    #[tokio::test]
    async fn created_pet_reaches_the_log_feed() {
        let app = TestApp::spawn().await;
        let (mut client, _) = signed_in(&app).await;

        let shown = client.save_pet(None, max(None)).await;
        let reports = client.settle_side_effects().await;

        assert_eq!(shown, Notice::success(notice::PET_ADDED));
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].outcome, Ok(()));

        let pet = &client.pets().pets()[0];
        let View::SignedIn(user) = client.view() else {
            panic!("expected a signed-in view");
        };
        assert_eq!(pet.user_id, user.id);

        let logs = client.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].event_type, PET_CREATED_EVENT);
        assert_eq!(logs[0].status, LogStatus::Success);
        assert_eq!(logs[0].user_id, user.id);
    }

    #[tokio::test]
    async fn function_response_decodes_with_the_envelope() {
        let app = TestApp::spawn().await;
        let (mut client, services) = signed_in(&app).await;
        client.save_pet(None, max(None)).await;
        client.settle_side_effects().await;

        let session = services.identity.subscribe().current().unwrap();
        let pet = client.pets().pets()[0].clone();
        let response = services.functions.pet_created(&session, &pet).await.unwrap();

        assert!(response.success);
        assert_eq!(response.data.pet.id, pet.id);
        assert_eq!(response.data.user.id, session.user_id());
    }

    #[tokio::test]
    async fn server_validation_errors_keep_their_code() {
        let app = TestApp::spawn().await;
        let (_, services) = signed_in(&app).await;
        let session = services.identity.subscribe().current().unwrap();

        let mut form = max(None);
        form.age = -1.0;
        let err = services.records.insert_pet(&session, &form).await.unwrap_err();

        assert!(matches!(
            err,
            ClientError::Service { status: 400, ref code, .. } if code == "VALIDATION_ERROR"
        ));
    }
}

mod images {
    use super::*;

    #[tokio::test]
    async fn uploaded_image_is_public_and_removed_with_its_pet() {
        let app = TestApp::spawn().await;
        let (mut client, _) = signed_in(&app).await;

        let file = ImageFile::new("max.png", "image/png", png_bytes());
        let url = client.images().upload(&file).await.unwrap();

        let fetched = app.client.get(&url).send().await.unwrap();
        assert_eq!(fetched.status(), 200);
        assert_eq!(fetched.headers()["cache-control"], "max-age=3600");
        assert_eq!(fetched.bytes().await.unwrap().as_ref(), png_bytes().as_slice());

        let shown = client.save_pet(None, max(Some(url.clone()))).await;
        assert_eq!(shown, Notice::success(notice::PET_ADDED));
        client.settle_side_effects().await;
        let id = client.pets().pets()[0].id;

        let shown = client.delete_pet(id).await;

        assert_eq!(shown, Notice::success(notice::PET_DELETED));
        assert!(client.pets().pets().is_empty());
        let gone = app.client.get(&url).send().await.unwrap();
        assert_eq!(gone.status(), 404);
    }

    #[tokio::test]
    async fn reupload_without_upsert_conflicts() {
        let app = TestApp::spawn().await;
        let (_, services) = signed_in(&app).await;
        let session = services.identity.subscribe().current().unwrap();
        let path = format!("{}/1700000000000.png", session.user_id());
        let file = ImageFile::new("max.png", "image/png", png_bytes());

        let stored = services
            .blobs
            .upload(&session, &path, &file, UploadOptions::default())
            .await
            .unwrap();
        assert_eq!(stored, path);

        let again = services
            .blobs
            .upload(&session, &path, &file, UploadOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(again, ClientError::Service { status: 409, .. }));

        let upsert = UploadOptions {
            upsert: true,
            ..UploadOptions::default()
        };
        services
            .blobs
            .upload(&session, &path, &file, upsert)
            .await
            .unwrap();

        let removed = services.blobs.remove(&session, &[path.clone()]).await.unwrap();
        assert_eq!(removed, vec![path]);
    }
}
