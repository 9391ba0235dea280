use docket::{stmt::field, Query};
use pretty_assertions::assert_eq;
use tests::{models::*, setup, DriverOp};

#[tokio::test]
async fn batch_reads_in_one_round_trip() {
    let fx = setup().await;
    let mut session = fx.store.session();

    let alice = User::new("Alice", 30);
    let bob = User::new("Bob", 40);
    session.insert(&alice).unwrap();
    session.insert(&bob).unwrap();
    session.insert(&Invoice::new("INV-1", 12.5)).unwrap();
    session.save_changes().await.unwrap();

    let older = Query::<User>::new().filter(field::<i32>("age").gt(35));
    let by_name = Query::<User>::new().order_by(field::<String>("name").desc());
    let invoices = Query::<Invoice>::new();
    let names = Query::<User>::new()
        .order_by(field::<i32>("age").asc())
        .select(field::<String>("name"));

    let expected_older = older.to_list(&mut session).await.unwrap();
    let expected_first = by_name.first(&mut session).await.unwrap();
    let expected_count = invoices.count(&mut session).await.unwrap();

    fx.log.clear();

    let mut batch = session.batch();
    let loaded = batch.load::<User>(alice.id);
    let missing = batch.load::<User>(uuid::Uuid::new_v4());
    let older_list = batch.list(&older).unwrap();
    let first = batch.first(&by_name).unwrap();
    let count = batch.count(&invoices).unwrap();
    let any = batch.any(&older).unwrap();
    let name_list = batch.values(&names).unwrap();
    assert_eq!(batch.len(), 7);

    // Nothing runs until the batch executes
    assert!(fx.log.is_empty());
    batch.execute().await.unwrap();

    assert_eq!(fx.log.len(), 1);
    assert!(matches!(
        fx.log.pop(),
        Some(DriverOp::Query { result_sets: 7, .. })
    ));

    assert_eq!(loaded.await.unwrap(), Some(alice));
    assert_eq!(missing.await.unwrap(), None);
    assert_eq!(older_list.await.unwrap(), expected_older);
    assert_eq!(first.await.unwrap(), expected_first);
    assert_eq!(count.await.unwrap(), expected_count);
    assert!(any.await.unwrap());
    assert_eq!(name_list.await.unwrap(), ["Alice", "Bob"]);
}

#[tokio::test]
async fn empty_batch_executes_nothing() {
    let fx = setup().await;
    let mut session = fx.store.session();

    let batch = session.batch();
    assert!(batch.is_empty());
    batch.execute().await.unwrap();

    assert!(fx.log.is_empty());
}

#[tokio::test]
async fn one_failing_item_does_not_hide_the_others() {
    let fx = setup().await;
    let mut session = fx.store.session();
    session.insert(&User::new("Alice", 30)).unwrap();
    session.insert(&User::new("Bob", 30)).unwrap();
    session.save_changes().await.unwrap();

    let thirty = Query::<User>::new().filter(field::<i32>("age").eq(30));

    let mut batch = session.batch();
    let single = batch.single(&thirty).unwrap();
    let count = batch.count(&thirty).unwrap();
    let first = batch.first_or_default(&thirty).unwrap();
    batch.execute().await.unwrap();

    assert!(single.await.unwrap_err().is_more_than_one_element());
    assert_eq!(count.await.unwrap(), 2);
    assert!(first.await.unwrap().is_some());
}

#[tokio::test]
async fn batched_loads_apply_the_same_scopes() {
    let fx = setup().await;

    let mut other = fx.store.session_for_tenant("other").unwrap();
    let foreign = User::new("Foreign", 20);
    other.insert(&foreign).unwrap();
    other.save_changes().await.unwrap();

    let mut session = fx.store.session();
    session.insert(&Invoice::new("INV-1", 10.0)).unwrap();
    session.insert(&Invoice::new("INV-2", 20.0)).unwrap();
    session.save_changes().await.unwrap();
    session.delete_by_id::<Invoice>("INV-1".to_string());
    session.save_changes().await.unwrap();

    let mut batch = session.batch();
    let deleted = batch.load::<Invoice>("INV-1".to_string());
    let live = batch.load::<Invoice>("INV-2".to_string());
    let not_ours = batch.load::<User>(foreign.id);
    batch.execute().await.unwrap();

    assert_eq!(deleted.await.unwrap(), None);
    assert_eq!(live.await.unwrap().map(|invoice| invoice.amount), Some(20.0));
    assert_eq!(not_ours.await.unwrap(), None);

    // Same answers without the batch
    assert_eq!(session.load::<Invoice>("INV-1".to_string()).await.unwrap(), None);
    assert_eq!(session.load::<User>(foreign.id).await.unwrap(), None);
}

#[tokio::test]
async fn translation_errors_surface_when_adding_items() {
    let fx = setup().await;
    let mut session = fx.store.session();

    let age = field::<i32>("age");
    let mut batch = session.batch();
    let list = batch.list(&Query::<User>::new()).unwrap();
    // Comparing two members has no constant side
    let bad = batch.list(&Query::<User>::new().filter(age.eq(age.clone())));
    assert!(bad.unwrap_err().is_unsupported_expression());
    assert_eq!(batch.len(), 1);
    batch.execute().await.unwrap();

    assert!(list.await.unwrap().is_empty());
}
