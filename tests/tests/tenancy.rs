use docket::Query;
use pretty_assertions::assert_eq;
use tests::{models::*, setup, setup_with};

#[tokio::test]
async fn tenants_see_only_their_documents() {
    let fx = setup().await;
    let mut red = fx.store.session_for_tenant("red").unwrap();
    let mut blue = fx.store.session_for_tenant("blue").unwrap();
    assert_eq!(red.tenant(), "red");

    let shared = User::new("Shared", 1);
    red.insert(&shared).unwrap();
    red.insert(&User::new("Red", 2)).unwrap();
    red.save_changes().await.unwrap();

    // The key is (tenant, id), so another tenant may reuse the id
    blue.insert(&User { name: "Blue".into(), ..shared.clone() }).unwrap();
    blue.save_changes().await.unwrap();

    assert_eq!(Query::<User>::new().count(&mut red).await.unwrap(), 2);
    assert_eq!(Query::<User>::new().count(&mut blue).await.unwrap(), 1);
    assert_eq!(
        blue.load::<User>(shared.id).await.unwrap().map(|user| user.name),
        Some("Blue".to_string())
    );
    assert_eq!(
        red.load::<User>(shared.id).await.unwrap().map(|user| user.name),
        Some("Shared".to_string())
    );

    let everyone = Query::<User>::new().any_tenant().count(&mut red).await.unwrap();
    assert_eq!(everyone, 3);
}

#[tokio::test]
async fn writes_do_not_cross_tenants() {
    let fx = setup().await;
    let mut red = fx.store.session_for_tenant("red").unwrap();
    let mut blue = fx.store.session_for_tenant("blue").unwrap();

    let alice = User::new("Alice", 30);
    red.insert(&alice).unwrap();
    red.save_changes().await.unwrap();

    blue.delete(&alice);
    blue.save_changes().await.unwrap();

    blue.update(&alice).unwrap();
    assert!(blue.save_changes().await.unwrap_err().is_document_not_found());

    assert!(red.load::<User>(alice.id).await.unwrap().is_some());
}

#[tokio::test]
async fn unknown_tenants_are_rejected() {
    let fx = setup_with(|builder| {
        builder.tenants(["red"]);
    })
    .await;

    assert!(fx.store.session_for_tenant("red").is_ok());

    let err = fx.store.session_for_tenant("green").unwrap_err();
    assert!(err.is_unknown_tenant());
    assert!(err.to_string().contains("green"));
}
