use std::sync::Arc;
use std::time::Duration;

use foodable::application::Foodable;
use foodable::application::error::AppError;
use foodable::config::Settings;
use foodable::infra::token_store::MemoryTokenStore;
use foodable_api_types::NewGrocery;
use httpmock::MockServer;
use tempfile::TempDir;

/// Long stale time so only invalidation can trigger a refetch.
fn app(server: &MockServer, dir: &TempDir) -> Foodable {
    let mut settings = Settings::for_api(&server.base_url()).expect("settings");
    settings.cache.stale_time = Duration::from_secs(300);
    settings.storage.data_dir = dir.path().to_path_buf();
    Foodable::with_token_store(&settings, Arc::new(MemoryTokenStore::with_token("tok")))
        .expect("app")
}

#[tokio::test]
async fn created_grocery_shows_up_in_refetched_list() -> Result<(), AppError> {
    let server = MockServer::start();
    let dir = TempDir::new().expect("tmp dir");
    let app = app(&server, &dir);

    let mut empty_list = server.mock(|when, then| {
        when.method("GET").path("/groceries/");
        then.status(200)
            .header("content-type", "application/json")
            .body("[]");
    });
    assert!(app.groceries().await.into_result()?.is_empty());

    let new = NewGrocery {
        name: "Greek yogurt".into(),
        category: Some("dairy".into()),
        calories: Some(97.0),
        protein: Some(9.0),
    };
    let create = server.mock(|when, then| {
        when.method("POST")
            .path("/groceries/")
            .json_body_includes(r#"{"name":"Greek yogurt","category":"dairy"}"#);
        then.status(201)
            .header("content-type", "application/json")
            .body(r#"{"id":21,"name":"Greek yogurt","category":"dairy","calories":97.0,"protein":9.0}"#);
    });
    let created = app.add_grocery(&new).await?;
    assert!(created.matches(&new));
    create.assert();

    empty_list.assert_calls(1);
    empty_list.delete();
    let full_list = server.mock(|when, then| {
        when.method("GET").path("/groceries/");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"[{"id":21,"name":"Greek yogurt","category":"dairy","calories":97.0,"protein":9.0}]"#);
    });

    let list = app.groceries().await.into_result()?;
    assert!(list.iter().any(|grocery| grocery.matches(&new)));
    full_list.assert_calls(1);
    Ok(())
}

#[tokio::test]
async fn delete_refreshes_list_and_failed_delete_keeps_it() -> Result<(), AppError> {
    let server = MockServer::start();
    let dir = TempDir::new().expect("tmp dir");
    let app = app(&server, &dir);

    let mut two = server.mock(|when, then| {
        when.method("GET").path("/groceries/");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"[{"id":1,"name":"Rice"},{"id":2,"name":"Beans"}]"#);
    });
    assert_eq!(app.groceries().await.into_result()?.len(), 2);

    let forbidden = server.mock(|when, then| {
        when.method("DELETE").path("/groceries/2");
        then.status(403).body(r#"{"detail":"Not yours"}"#);
    });
    let err = app.delete_grocery(2).await.expect_err("forbidden");
    assert_eq!(err.presentation_message(), "You are not allowed to do that");
    forbidden.assert();

    // Still fresh: the failed write invalidated nothing.
    assert_eq!(app.groceries().await.into_result()?.len(), 2);
    two.assert_calls(1);

    let deleted = server.mock(|when, then| {
        when.method("DELETE").path("/groceries/1");
        then.status(204);
    });
    app.delete_grocery(1).await?;
    deleted.assert();

    two.delete();
    let one = server.mock(|when, then| {
        when.method("GET").path("/groceries/");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"[{"id":2,"name":"Beans"}]"#);
    });
    let list = app.groceries().await.into_result()?;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].name, "Beans");
    one.assert_calls(1);
    Ok(())
}

#[tokio::test]
async fn invalid_grocery_id_never_reaches_the_server() {
    let server = MockServer::start();
    let dir = TempDir::new().expect("tmp dir");
    let app = app(&server, &dir);
    let any = server.mock(|when, then| {
        when.path_includes("/groceries");
        then.status(200).body("{}");
    });

    let entry = app.grocery(0).await;
    assert!(entry.data.is_none());
    assert!(app.delete_grocery(-3).await.is_err());
    any.assert_calls(0);
}
