use docket::{
    stmt::{field, object, Expr, Value},
    EnumStorage, Query, Session,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use tests::{models::*, setup, setup_with};

async fn seed<T: docket::Document>(session: &mut Session, docs: &[T]) {
    for doc in docs {
        session.insert(doc).unwrap();
    }
    session.save_changes().await.unwrap();
}

fn names(users: &[User]) -> Vec<&str> {
    users.iter().map(|user| &user.name[..]).collect()
}

fn by_age() -> Query<User> {
    Query::new().order_by(field::<i32>("age").asc())
}

#[tokio::test]
async fn equality_matches_only_that_value() {
    let fx = setup().await;
    let mut session = fx.store.session();
    seed(&mut session, &[User::new("Alice", 30), User::new("Bob", 40)]).await;

    let found = session
        .query::<User>()
        .filter(field::<i32>("age").eq(30))
        .to_list(&mut session)
        .await
        .unwrap();
    assert_eq!(names(&found), ["Alice"]);

    let found = session
        .query::<User>()
        .filter(field::<String>("name").eq("Bob"))
        .to_list(&mut session)
        .await
        .unwrap();
    assert_eq!(names(&found), ["Bob"]);
}

#[tokio::test]
async fn identity_member_compares_the_key_column() {
    let fx = setup().await;
    let mut session = fx.store.session();
    let alice = User::new("Alice", 30);
    seed(&mut session, &[alice.clone(), User::new("Bob", 40)]).await;

    let found = session
        .query::<User>()
        .filter(field::<uuid::Uuid>("id").eq(alice.id))
        .single(&mut session)
        .await
        .unwrap();
    assert_eq!(found, alice);
}

#[tokio::test]
async fn count_agrees_with_list_length() {
    let fx = setup().await;
    let mut session = fx.store.session();
    seed(
        &mut session,
        &[
            User::new("Alice", 30),
            User::new("Bob", 40),
            User::new("Carol", 50),
            User::new("Dave", 20),
        ],
    )
    .await;

    let predicates = [
        field::<i32>("age").gt(25),
        field::<i32>("age").le(20),
        field::<String>("name").starts_with("C"),
        field::<i32>("age").ne(40).and(field::<i32>("age").lt(45)),
    ];

    for predicate in predicates {
        let query = session.query::<User>().filter(predicate);
        let count = query.count(&mut session).await.unwrap();
        let list = query.to_list(&mut session).await.unwrap();
        assert_eq!(count, list.len() as u64);
    }

    // Paged counts see the page
    let page = by_age().skip(1).take(2);
    assert_eq!(page.count(&mut session).await.unwrap(), 2);
}

#[tokio::test]
async fn take_and_skip_return_a_slice() {
    let fx = setup().await;
    let mut session = fx.store.session();
    let users = (1..=5)
        .map(|i| User::new(&format!("user{i}"), i * 10))
        .collect::<Vec<_>>();
    seed(&mut session, &users).await;

    let page = by_age()
        .take(2)
        .skip(1)
        .to_list(&mut session)
        .await
        .unwrap();
    assert_eq!(names(&page), ["user2", "user3"]);

    let page = by_age()
        .skip(1)
        .take(2)
        .to_list(&mut session)
        .await
        .unwrap();
    assert_eq!(names(&page), ["user2", "user3"]);

    let tail = by_age()
        .skip(4)
        .take(2)
        .to_list(&mut session)
        .await
        .unwrap();
    assert_eq!(names(&tail), ["user5"]);

    let past_end = by_age()
        .skip(10)
        .take(2)
        .to_list(&mut session)
        .await
        .unwrap();
    assert!(past_end.is_empty());

    let newest = session
        .query::<User>()
        .order_by(field::<i32>("age").desc())
        .first(&mut session)
        .await
        .unwrap();
    assert_eq!(newest.name, "user5");
}

#[tokio::test]
async fn cardinality_is_enforced() {
    let fx = setup().await;
    let mut session = fx.store.session();
    seed(&mut session, &[User::new("Alice", 30), User::new("Bob", 30)]).await;

    let thirty = session.query::<User>().filter(field::<i32>("age").eq(30));
    let nobody = session.query::<User>().filter(field::<i32>("age").eq(99));

    assert!(thirty.single(&mut session).await.unwrap_err().is_more_than_one_element());
    assert!(thirty
        .single_or_default(&mut session)
        .await
        .unwrap_err()
        .is_more_than_one_element());
    assert!(nobody.first(&mut session).await.unwrap_err().is_no_elements());
    assert!(nobody.single(&mut session).await.unwrap_err().is_no_elements());
    assert_eq!(nobody.first_or_default(&mut session).await.unwrap(), None);
    assert_eq!(nobody.single_or_default(&mut session).await.unwrap(), None);
    assert!(thirty.first(&mut session).await.is_ok());

    assert!(thirty.any(&mut session).await.unwrap());
    assert!(!nobody.any(&mut session).await.unwrap());
}

#[tokio::test]
async fn boolean_members() {
    let fx = setup().await;
    let mut session = fx.store.session();
    let mut retired = User::new("Retired", 70);
    retired.active = false;
    seed(&mut session, &[User::new("Alice", 30), retired]).await;

    let active = session
        .query::<User>()
        .filter(field::<bool>("active"))
        .to_list(&mut session)
        .await
        .unwrap();
    assert_eq!(names(&active), ["Alice"]);

    let inactive = session
        .query::<User>()
        .filter(!field::<bool>("active").eq(true))
        .to_list(&mut session)
        .await
        .unwrap();
    assert_eq!(names(&inactive), ["Retired"]);

    let inactive = session
        .query::<User>()
        .filter(field::<bool>("active").eq(false))
        .to_list(&mut session)
        .await
        .unwrap();
    assert_eq!(names(&inactive), ["Retired"]);
}

#[tokio::test]
async fn text_methods_escape_wildcards() {
    let fx = setup().await;
    let mut session = fx.store.session();
    seed(
        &mut session,
        &[
            User::new("100% cotton", 1),
            User::new("1000 cotton", 2),
            User::new("snake_case", 3),
            User::new("snakeXcase", 4),
        ],
    )
    .await;

    async fn matching(session: &mut Session, filter: docket::stmt::Expr<bool>) -> Vec<String> {
        let mut users = session
            .query::<User>()
            .filter(filter)
            .to_list(session)
            .await
            .unwrap();
        users.sort_by_key(|user| user.age);
        users.into_iter().map(|user| user.name).collect()
    }

    let name = field::<String>("name");
    assert_eq!(
        matching(&mut session, name.contains("0%")).await,
        ["100% cotton"]
    );
    assert_eq!(
        matching(&mut session, name.starts_with("snake_")).await,
        ["snake_case"]
    );
    assert_eq!(
        matching(&mut session, name.ends_with("cotton")).await,
        ["100% cotton", "1000 cotton"]
    );
    assert!(matching(&mut session, name.contains("COTTON")).await.is_empty());
}

#[tokio::test]
async fn case_insensitive_equality() {
    let fx = setup().await;
    let mut session = fx.store.session();
    seed(&mut session, &[User::new("ALICE", 30), User::new("Bob", 40)]).await;

    let found = session
        .query::<User>()
        .filter(field::<String>("name").eq_ignore_case("alice"))
        .single(&mut session)
        .await
        .unwrap();
    assert_eq!(found.name, "ALICE");
}

#[tokio::test]
async fn null_and_blank_checks() {
    let fx = setup().await;
    let mut session = fx.store.session();

    let missing = User::new("missing", 1);
    let mut empty = User::new("empty", 2);
    empty.email = Some(String::new());
    let mut blank = User::new("blank", 3);
    blank.email = Some("   ".into());
    let mut set = User::new("set", 4);
    set.email = Some("set@example.com".into());
    seed(&mut session, &[missing, empty, blank, set]).await;

    let email = field::<Option<String>>("email");
    let cases = [
        (email.is_null(), vec!["missing"]),
        (email.is_not_null(), vec!["empty", "blank", "set"]),
        (email.is_null_or_empty(), vec!["missing", "empty"]),
        (email.is_null_or_whitespace(), vec!["missing", "empty", "blank"]),
    ];

    for (filter, expected) in cases {
        let found = by_age().filter(filter).to_list(&mut session).await.unwrap();
        assert_eq!(names(&found), expected);
    }
}

#[tokio::test]
async fn nested_members() {
    let fx = setup().await;
    let mut session = fx.store.session();
    seed(
        &mut session,
        &[
            User::new("Alice", 30).in_city("Oslo"),
            User::new("Bob", 40).in_city("Lima"),
        ],
    )
    .await;

    let found = session
        .query::<User>()
        .filter(object::<Address>("address").field::<String>("city").eq("Lima"))
        .to_list(&mut session)
        .await
        .unwrap();
    assert_eq!(names(&found), ["Bob"]);
}

#[tokio::test]
async fn membership_matches_in_memory_filtering() {
    let fx = setup().await;
    let mut session = fx.store.session();
    let users = vec![
        User::new("Alice", 30).tagged(&["admin", "ops"]),
        User::new("Bob", 40).tagged(&["ops"]),
        User::new("Carol", 50),
    ];
    seed(&mut session, &users).await;

    let admins = by_age()
        .filter(field::<Vec<String>>("tags").contains("admin"))
        .to_list(&mut session)
        .await
        .unwrap();
    let expected = users
        .iter()
        .filter(|user| user.tags.iter().any(|tag| tag == "admin"))
        .cloned()
        .collect::<Vec<_>>();
    assert_eq!(admins, expected);

    let wanted = [users[0].id, users[2].id];
    let picked = by_age()
        .filter(field::<uuid::Uuid>("id").in_list(wanted))
        .to_list(&mut session)
        .await
        .unwrap();
    let expected = users
        .iter()
        .filter(|user| wanted.contains(&user.id))
        .cloned()
        .collect::<Vec<_>>();
    assert_eq!(picked, expected);

    let ages = by_age()
        .filter(field::<i32>("age").in_list([40, 50]))
        .to_list(&mut session)
        .await
        .unwrap();
    assert_eq!(names(&ages), ["Bob", "Carol"]);

    let none = session
        .query::<User>()
        .filter(field::<i32>("age").in_list(Vec::<i32>::new()))
        .to_list(&mut session)
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn connectives() {
    let fx = setup().await;
    let mut session = fx.store.session();
    seed(
        &mut session,
        &[
            User::new("Alice", 30),
            User::new("Bob", 40),
            User::new("Carol", 50),
        ],
    )
    .await;

    let age = field::<i32>("age");
    let found = by_age()
        .filter(age.eq(30).or(age.eq(50)))
        .to_list(&mut session)
        .await
        .unwrap();
    assert_eq!(names(&found), ["Alice", "Carol"]);

    let found = by_age()
        .filter(!(age.eq(30).or(age.eq(50))))
        .to_list(&mut session)
        .await
        .unwrap();
    assert_eq!(names(&found), ["Bob"]);

    // Successive filters are combined with AND
    let found = by_age()
        .filter(age.gt(30))
        .filter(age.lt(50))
        .to_list(&mut session)
        .await
        .unwrap();
    assert_eq!(names(&found), ["Bob"]);
}

#[tokio::test]
async fn aggregates() {
    let fx = setup().await;
    let mut session = fx.store.session();
    seed(
        &mut session,
        &[
            User::new("Alice", 30),
            User::new("Bob", 40),
            User::new("Carol", 50),
        ],
    )
    .await;

    let age = field::<i32>("age");
    let all = session.query::<User>();
    assert_eq!(all.sum(&mut session, &age).await.unwrap(), 120);
    assert_eq!(all.min(&mut session, &age).await.unwrap(), Some(30));
    assert_eq!(all.max(&mut session, &age).await.unwrap(), Some(50));
    assert_eq!(all.average(&mut session, &age).await.unwrap(), Some(40.0));

    // Aggregates over a page only see the page
    let youngest_two = by_age().take(2);
    assert_eq!(youngest_two.sum(&mut session, &age).await.unwrap(), 70);

    let nobody = session.query::<User>().filter(age.gt(100));
    assert_eq!(nobody.sum(&mut session, &age).await.unwrap(), 0);
    assert_eq!(nobody.min(&mut session, &age).await.unwrap(), None);
    assert_eq!(nobody.average(&mut session, &age).await.unwrap(), None);
}

#[tokio::test]
async fn projections() {
    let fx = setup().await;
    let mut session = fx.store.session();
    seed(
        &mut session,
        &[
            User::new("Alice", 30),
            User::new("Bob", 30),
            User::new("Carol", 50),
        ],
    )
    .await;

    let ages = by_age()
        .select(field::<i32>("age"))
        .to_list(&mut session)
        .await
        .unwrap();
    assert_eq!(ages, [30, 30, 50]);

    let mut distinct = session
        .query::<User>()
        .select(field::<i32>("age"))
        .distinct()
        .to_list(&mut session)
        .await
        .unwrap();
    distinct.sort();
    assert_eq!(distinct, [30, 50]);

    let greetings = by_age()
        .filter(field::<i32>("age").lt(40))
        .map(&mut session, |user| format!("hello {}", user.name))
        .await
        .unwrap();
    assert_eq!(greetings, ["hello Alice", "hello Bob"]);
}

#[tokio::test]
async fn enums_stored_as_strings() {
    let fx = setup_with(|builder| {
        builder.enum_storage(EnumStorage::AsString);
    })
    .await;
    let mut session = fx.store.session();
    let orders = [
        Order {
            id: 1,
            status: Status::Pending,
            total: 10.5,
            quantity: 1,
        },
        Order {
            id: 2,
            status: Status::Shipped,
            total: 99.0,
            quantity: 3,
        },
    ];
    seed(&mut session, &orders).await;

    let shipped = session
        .query::<Order>()
        .filter(field::<Status>("status").eq(Status::Shipped))
        .single(&mut session)
        .await
        .unwrap();
    assert_eq!(shipped.id, 2);

    let statuses = session
        .query::<Order>()
        .order_by(field::<f64>("total").desc())
        .select(field::<Status>("status"))
        .to_list(&mut session)
        .await
        .unwrap();
    assert_eq!(statuses, [Status::Shipped, Status::Pending]);
}

#[tokio::test]
async fn compiled_command_is_inspectable() {
    let fx = setup().await;
    let session = fx.store.session();

    let command = session
        .query::<User>()
        .filter(field::<i32>("age").ge(18))
        .order_by(field::<String>("name").asc())
        .take(10)
        .to_command(&session)
        .unwrap();

    assert_eq!(
        command.sql,
        "SELECT data, version FROM \"doc_user\" \
         WHERE CAST(json_extract(data, '$.age') AS INTEGER) >= ?1 AND tenant_id = ?2 \
         ORDER BY json_extract(data, '$.name') ASC LIMIT 10;"
    );
    assert_eq!(
        command.values().cloned().collect::<Vec<_>>(),
        [Value::I32(18), Value::from("*DEFAULT*")]
    );

    // Nothing ran
    assert!(fx.log.is_empty());
}

#[tokio::test]
async fn enums_compare_by_discriminant_by_default() {
    let fx = setup().await;
    let session = fx.store.session();

    let command = session
        .query::<Order>()
        .filter(field::<Status>("status").eq(Status::Delivered))
        .any_tenant()
        .to_command(&session)
        .unwrap();

    assert_eq!(
        command.sql,
        "SELECT data, version FROM \"doc_purchase_order\" \
         WHERE CAST(json_extract(data, '$.status') AS INTEGER) = ?1;"
    );
    assert_eq!(
        command.values().cloned().collect::<Vec<_>>(),
        [Value::I64(2)]
    );
}

#[tokio::test]
async fn unregistered_methods_fail_translation() {
    let fx = setup().await;
    let mut session = fx.store.session();

    let err = session
        .query::<User>()
        .filter(field::<String>("name").call::<bool>("sounds_like", [Value::from("Alyce")]))
        .to_list(&mut session)
        .await
        .unwrap_err();

    assert!(err.is_unsupported_expression());
    assert!(err.to_string().contains("sounds_like"));

    // Translation fails before any I/O
    assert_eq!(fx.log.queries(), 0);
}

/// Two products whose every member differs; the first restock time has a
/// sub-millisecond remainder that rounds up.
async fn seeded_products(session: &mut Session) -> (Product, Product) {
    let restocked_at = chrono::DateTime::parse_from_rfc3339("2024-03-01T12:30:45.227695389Z")
        .unwrap()
        .with_timezone(&chrono::Utc);

    let light = Product {
        sku: "light".into(),
        price: Decimal::new(1250, 2),
        stock: 5_000_000_000,
        weight: 1.5,
        restocked_at,
    };
    let heavy = Product {
        sku: "heavy".into(),
        price: Decimal::new(725, 2),
        stock: 7,
        weight: 2.25,
        restocked_at: restocked_at + chrono::Duration::seconds(1),
    };
    seed(session, &[light.clone(), heavy.clone()]).await;
    (light, heavy)
}

async fn skus(session: &mut Session, filter: Expr<bool>) -> Vec<String> {
    let mut found = Query::<Product>::new()
        .filter(filter)
        .to_list(session)
        .await
        .unwrap();
    found.sort_by(|a, b| a.sku.cmp(&b.sku));
    found.into_iter().map(|product| product.sku).collect()
}

#[tokio::test]
async fn timestamps_round_trip() {
    let fx = setup().await;
    let mut session = fx.store.session();
    let (light, heavy) = seeded_products(&mut session).await;
    let at = field::<chrono::DateTime<chrono::Utc>>("restockedAt");

    assert_eq!(skus(&mut session, at.eq(light.restocked_at)).await, ["light"]);
    assert_eq!(skus(&mut session, at.eq(heavy.restocked_at)).await, ["heavy"]);
    assert_eq!(skus(&mut session, at.gt(light.restocked_at)).await, ["heavy"]);
    assert_eq!(skus(&mut session, at.ge(light.restocked_at)).await, ["heavy", "light"]);
    let nearby = light.restocked_at + chrono::Duration::milliseconds(1);
    assert!(skus(&mut session, at.eq(nearby)).await.is_empty());
}

#[tokio::test]
async fn decimals_round_trip() {
    let fx = setup().await;
    let mut session = fx.store.session();
    let (light, _) = seeded_products(&mut session).await;
    let price = field::<Decimal>("price");

    assert_eq!(skus(&mut session, price.eq(light.price)).await, ["light"]);
    assert_eq!(skus(&mut session, price.lt(light.price)).await, ["heavy"]);
    assert!(skus(&mut session, price.eq(Decimal::new(999, 2))).await.is_empty());
}

#[tokio::test]
async fn wide_integers_round_trip() {
    let fx = setup().await;
    let mut session = fx.store.session();
    let (light, _) = seeded_products(&mut session).await;
    let stock = field::<i64>("stock");

    assert_eq!(skus(&mut session, stock.eq(light.stock)).await, ["light"]);
    assert_eq!(skus(&mut session, stock.ne(light.stock)).await, ["heavy"]);
    assert!(skus(&mut session, stock.eq(5_000_000_001)).await.is_empty());
}

#[tokio::test]
async fn floats_round_trip() {
    let fx = setup().await;
    let mut session = fx.store.session();
    let (light, _) = seeded_products(&mut session).await;
    let weight = field::<f64>("weight");

    assert_eq!(skus(&mut session, weight.eq(light.weight)).await, ["light"]);
    assert_eq!(skus(&mut session, weight.gt(light.weight)).await, ["heavy"]);
    assert!(skus(&mut session, weight.eq(3.0)).await.is_empty());
}

#[tokio::test]
async fn distinct_projections_order_by_their_own_member() {
    let fx = setup().await;
    let mut session = fx.store.session();
    seed(&mut session, &[User::new("Alice", 30), User::new("Bob", 30)]).await;

    let err = Query::<User>::new()
        .order_by(field::<String>("name").asc())
        .select(field::<i32>("age"))
        .distinct()
        .to_list(&mut session)
        .await
        .unwrap_err();
    assert!(err.is_unsupported_feature());

    let ages = Query::<User>::new()
        .order_by(field::<i32>("age").asc())
        .select(field::<i32>("age"))
        .distinct()
        .to_list(&mut session)
        .await
        .unwrap();
    assert_eq!(ages, [30]);
}
