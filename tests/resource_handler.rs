use serde_json::{json, Value};
use std::sync::Arc;

use blog_api::{
    core::ObjectId,
    ent_framework::FieldMap,
    entities::{Author, Comment, Page},
    handlers::ResourceHandler,
    infrastructure::{DatabaseInterface, FieldFilter, SqliteDatabase},
    AppError,
};

async fn database() -> Arc<dyn DatabaseInterface> {
    Arc::new(SqliteDatabase::new_in_memory().await.unwrap())
}

fn fields(value: Value) -> FieldMap {
    match value {
        Value::Object(m) => m,
        _ => panic!("expected an object"),
    }
}

#[tokio::test]
async fn test_create_then_get_returns_submitted_values() {
    let authors = ResourceHandler::<Author>::new(database().await);

    let created = authors
        .create(&fields(json!({"name": "Jane", "login": "jane", "password": "pw"})))
        .await
        .unwrap();
    let id = created.id.unwrap();

    let fetched = authors.get(id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.login, "jane");
}

#[tokio::test]
async fn test_delete_then_get_is_none() {
    let pages = ResourceHandler::<Page>::new(database().await);
    let page = pages
        .create(&fields(json!({"title": "T", "body": "B"})))
        .await
        .unwrap();
    let id = page.id.unwrap();

    pages.delete(id).await.unwrap();
    assert!(pages.get(id).await.unwrap().is_none());

    // deleting again is quietly accepted
    pages.delete(id).await.unwrap();
}

#[tokio::test]
async fn test_patch_partial_touches_only_submitted_fields() {
    let authors = ResourceHandler::<Author>::new(database().await);
    let jane = authors
        .create(&fields(json!({"name": "Jane", "login": "jane", "password": "pw"})))
        .await
        .unwrap();

    let patched = authors
        .patch_partial(jane.clone(), &fields(json!({"name": "Jane2"})))
        .await
        .unwrap();

    assert_eq!(patched.id, jane.id);
    assert_eq!(patched.name, "Jane2");
    assert_eq!(patched.login, jane.login);
    assert_eq!(patched.password, jane.password);
}

#[tokio::test]
async fn test_invalid_patch_keeps_stored_values() {
    let authors = ResourceHandler::<Author>::new(database().await);
    let jane = authors
        .create(&fields(json!({"name": "Jane", "login": "jane", "password": "pw"})))
        .await
        .unwrap();
    let id = jane.id.unwrap();

    let result = authors.patch_partial(jane, &fields(json!({"name": ""}))).await;
    match result {
        Err(AppError::Validation(errors)) => {
            assert_eq!(errors.get("name").unwrap(), ["This value should not be blank."]);
        }
        other => panic!("expected validation failure, got {:?}", other),
    }

    let stored = authors.get(id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Jane");
}

#[tokio::test]
async fn test_replace_clears_unsubmitted_optional_fields() {
    let db = database().await;
    let authors = ResourceHandler::<Author>::new(Arc::clone(&db));
    let pages = ResourceHandler::<Page>::new(db);

    let author = authors
        .create(&fields(json!({"name": "A", "login": "a", "password": "pw"})))
        .await
        .unwrap();
    let page = pages
        .create(&fields(json!({"title": "T", "body": "B", "author_id": author.id})))
        .await
        .unwrap();
    assert_eq!(page.author_id, author.id);

    let replaced = pages
        .replace(page.clone(), &fields(json!({"title": "T2", "body": "B2"})))
        .await
        .unwrap();
    assert_eq!(replaced.id, page.id);
    assert_eq!(replaced.author_id, None);
}

#[tokio::test]
async fn test_list_respects_limit_and_offset() {
    let authors = ResourceHandler::<Author>::new(database().await);
    assert!(authors.list(5, 0, Vec::new()).await.unwrap().is_empty());

    for i in 0..8 {
        authors
            .create(&fields(json!({"name": format!("n{}", i), "login": format!("l{}", i), "password": "pw"})))
            .await
            .unwrap();
    }

    let first = authors.list(5, 0, Vec::new()).await.unwrap();
    assert_eq!(first.len(), 5);
    assert!(first.windows(2).all(|w| w[0].id < w[1].id));

    let rest = authors.list(5, 5, Vec::new()).await.unwrap();
    assert_eq!(rest.len(), 3);
    assert_eq!(rest[0].name, "n5");
}

#[tokio::test]
async fn test_invalid_create_persists_nothing() {
    let authors = ResourceHandler::<Author>::new(database().await);

    let result = authors
        .create(&fields(json!({"login": "bad login!", "password": "pw"})))
        .await;

    match result {
        Err(AppError::Validation(errors)) => {
            assert!(errors.contains("name"));
            assert_eq!(errors.get("login").unwrap(), ["This value is not valid."]);
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
    assert!(authors.list(5, 0, Vec::new()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_filters_comments_by_page() {
    let comments = ResourceHandler::<Comment>::new(database().await);
    for (page, body) in [(1, "a"), (2, "b"), (1, "c")] {
        comments
            .create(&fields(json!({"page_id": page, "body": body})))
            .await
            .unwrap();
    }

    let on_first = comments
        .list(5, 0, vec![FieldFilter::eq("page_id", 1)])
        .await
        .unwrap();
    let bodies: Vec<&str> = on_first.iter().map(|c| c.body.as_str()).collect();
    assert_eq!(bodies, ["a", "c"]);
    assert!(on_first.iter().all(|c| c.belongs_to(ObjectId(1))));
}

#[tokio::test]
async fn test_numeric_strings_are_coerced_for_ids() {
    let comments = ResourceHandler::<Comment>::new(database().await);
    let comment = comments
        .create(&fields(json!({"page_id": "4", "body": "hi", "author_id": ""})))
        .await
        .unwrap();
    assert_eq!(comment.page_id, ObjectId(4));
    assert_eq!(comment.author_id, None);
}
