use chrono::{Duration, Utc};
use docket::{stmt::field, Query, Session};
use pretty_assertions::assert_eq;
use tests::{models::*, setup};

async fn numbers(session: &mut Session, query: Query<Invoice>) -> Vec<String> {
    let mut invoices = query.to_list(session).await.unwrap();
    invoices.sort_by(|a, b| a.number.cmp(&b.number));
    invoices.into_iter().map(|invoice| invoice.number).collect()
}

async fn seeded() -> (tests::Fixture, Session) {
    let fx = setup().await;
    let mut session = fx.store.session();
    for (number, amount) in [("A", 10.0), ("B", 20.0), ("C", 30.0)] {
        session.insert(&Invoice::new(number, amount)).unwrap();
    }
    session.save_changes().await.unwrap();

    session.delete_by_id::<Invoice>("B".to_string());
    session.save_changes().await.unwrap();

    (fx, session)
}

#[tokio::test]
async fn deleted_documents_are_hidden_by_default() {
    let (_fx, mut session) = seeded().await;

    assert_eq!(numbers(&mut session, Query::new()).await, ["A", "C"]);
    assert_eq!(Query::<Invoice>::new().count(&mut session).await.unwrap(), 2);
    assert_eq!(session.load::<Invoice>("B".to_string()).await.unwrap(), None);
}

#[tokio::test]
async fn deleted_filters() {
    let (_fx, mut session) = seeded().await;

    assert_eq!(
        numbers(&mut session, Query::new().maybe_deleted()).await,
        ["A", "B", "C"]
    );
    assert_eq!(numbers(&mut session, Query::new().is_deleted()).await, ["B"]);

    let an_hour_ago = Utc::now() - Duration::hours(1);
    let in_an_hour = Utc::now() + Duration::hours(1);
    assert_eq!(
        numbers(&mut session, Query::new().deleted_since(an_hour_ago)).await,
        ["B"]
    );
    assert!(numbers(&mut session, Query::new().deleted_since(in_an_hour))
        .await
        .is_empty());
    assert_eq!(
        numbers(&mut session, Query::new().deleted_before(in_an_hour)).await,
        ["B"]
    );
    assert!(numbers(&mut session, Query::new().deleted_before(an_hour_ago))
        .await
        .is_empty());
}

#[tokio::test]
async fn undelete_by_predicate() {
    let (_fx, mut session) = seeded().await;

    session
        .undelete_where::<Invoice>(field::<String>("number").eq("B"))
        .unwrap();
    session.save_changes().await.unwrap();

    assert_eq!(numbers(&mut session, Query::new()).await, ["A", "B", "C"]);
    assert!(numbers(&mut session, Query::new().is_deleted()).await.is_empty());
}

#[tokio::test]
async fn undelete_needs_a_soft_deleted_type() {
    let fx = setup().await;
    let mut session = fx.store.session();

    let err = session
        .undelete_where::<User>(field::<i32>("age").gt(1))
        .unwrap_err();
    assert!(err.is_unsupported_feature());
    assert_eq!(session.pending_changes(), 0);
}

#[tokio::test]
async fn delete_where_flags_rows() {
    let (_fx, mut session) = seeded().await;

    session
        .delete_where::<Invoice>(field::<f64>("amount").ge(25.0))
        .unwrap();
    session.save_changes().await.unwrap();

    assert_eq!(numbers(&mut session, Query::new()).await, ["A"]);
    assert_eq!(
        numbers(&mut session, Query::new().is_deleted()).await,
        ["B", "C"]
    );
}

#[tokio::test]
async fn hard_delete_removes_the_row() {
    let (_fx, mut session) = seeded().await;

    session.hard_delete::<Invoice>("A".to_string());
    session.hard_delete::<Invoice>("B".to_string());
    session.save_changes().await.unwrap();

    assert_eq!(
        numbers(&mut session, Query::new().maybe_deleted()).await,
        ["C"]
    );
}

#[tokio::test]
async fn storing_a_deleted_document_revives_it() {
    let (_fx, mut session) = seeded().await;

    session.store(&Invoice::new("B", 99.0)).unwrap();
    session.save_changes().await.unwrap();

    let revived = session.load::<Invoice>("B".to_string()).await.unwrap().unwrap();
    assert_eq!(revived.amount, 99.0);
    assert!(numbers(&mut session, Query::new().is_deleted()).await.is_empty());
}
