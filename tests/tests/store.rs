use docket::{Casing, DocumentStore, Flavor, Query};
use pretty_assertions::assert_eq;
use tests::{models::*, setup_with};

#[tokio::test]
async fn connect_by_url() {
    let store = DocumentStore::builder()
        .connect("sqlite::memory:")
        .await
        .unwrap();
    assert_eq!(store.flavor(), Flavor::Sqlite);

    let mut session = store.session();
    let alice = User::new("Alice", 30);
    session.insert(&alice).unwrap();
    session.save_changes().await.unwrap();
    assert_eq!(session.load::<User>(alice.id).await.unwrap(), Some(alice));
}

#[tokio::test]
async fn rejects_unusable_urls() {
    let err = DocumentStore::builder()
        .connect("not a url")
        .await
        .unwrap_err();
    assert!(err.is_invalid_connection_url());

    let err = DocumentStore::builder()
        .connect("postgres://localhost/db")
        .await
        .unwrap_err();
    assert!(err.is_invalid_connection_url());
}

#[tokio::test]
async fn table_naming_follows_the_store_options() {
    let fx = setup_with(|builder| {
        builder.table_name_prefix("app_").schema_name("sales");
    })
    .await;
    let session = fx.store.session();

    let command = Query::<Order>::new().to_command(&session).unwrap();
    assert!(command.sql.contains("FROM \"app_purchase_order\""));
}

#[tokio::test]
async fn casing_controls_json_paths() {
    let fx = setup_with(|builder| {
        builder.casing(Casing::SnakeCase);
    })
    .await;
    let session = fx.store.session();

    let command = Query::<Invoice>::new()
        .order_by(docket::stmt::field::<chrono::DateTime<chrono::Utc>>("issued_at").asc())
        .to_command(&session)
        .unwrap();
    assert!(command.sql.contains("'$.issued_at'"), "{}", command.sql);
}

#[tokio::test]
async fn tables_are_created_once() {
    let fx = setup_with(|_| {}).await;
    let mut session = fx.store.session();

    Query::<User>::new().to_list(&mut session).await.unwrap();
    let after_first = fx.log.executes();
    assert!(after_first > 0);

    Query::<User>::new().to_list(&mut session).await.unwrap();
    session.insert(&User::new("Alice", 30)).unwrap();
    session.save_changes().await.unwrap();

    // Only the insert itself
    assert_eq!(fx.log.executes(), after_first + 1);
}
