use docket::{
    stmt::{field, ExprCall, Value},
    Fragment, MethodContext, MethodTranslator, Query, Result, TemplatePart,
};
use pretty_assertions::assert_eq;
use tests::{models::*, setup_with};

/// `age.between(lo, hi)`, inclusive.
struct Between;

impl MethodTranslator for Between {
    fn matches(&self, call: &ExprCall) -> bool {
        call.method == "between" && call.args.len() == 2
    }

    fn translate(&self, call: &ExprCall, cx: &MethodContext<'_>) -> Result<Fragment> {
        let target = call
            .target
            .as_deref()
            .ok_or_else(|| docket::err!("`between` needs a member"))?;
        let member = cx.member(target)?;
        let lo = member.to_param(cx.constant(&call.args[0])?.clone())?;
        let hi = member.to_param(cx.constant(&call.args[1])?.clone())?;

        Ok(Fragment::template(vec![
            TemplatePart::Locator(member.typed().clone()),
            TemplatePart::text(" BETWEEN "),
            TemplatePart::Param(lo),
            TemplatePart::text(" AND "),
            TemplatePart::Param(hi),
        ]))
    }
}

/// Overrides the built-in `starts_with` with an exact match.
struct ExactPrefix;

impl MethodTranslator for ExactPrefix {
    fn matches(&self, call: &ExprCall) -> bool {
        call.method == "starts_with" && call.args.len() == 1
    }

    fn translate(&self, call: &ExprCall, cx: &MethodContext<'_>) -> Result<Fragment> {
        let target = call
            .target
            .as_deref()
            .ok_or_else(|| docket::err!("`starts_with` needs a member"))?;
        let member = cx.member(target)?;
        let value = cx.constant(&call.args[0])?.clone();
        Ok(Fragment::template(vec![
            TemplatePart::Locator(member.raw().clone()),
            TemplatePart::text(" = "),
            TemplatePart::Param(value),
        ]))
    }
}

#[tokio::test]
async fn registered_translators_extend_the_predicate_language() {
    let fx = setup_with(|builder| {
        builder.register_method(Between);
    })
    .await;
    let mut session = fx.store.session();
    for (name, age) in [("Kid", 8), ("Teen", 15), ("Adult", 40)] {
        session.insert(&User::new(name, age)).unwrap();
    }
    session.save_changes().await.unwrap();

    let age = field::<i32>("age");
    let found = Query::<User>::new()
        .filter(age.call::<bool>("between", [Value::I32(10), Value::I32(50)]))
        .order_by(age.asc())
        .to_list(&mut session)
        .await
        .unwrap();

    assert_eq!(
        found.iter().map(|user| &user.name[..]).collect::<Vec<_>>(),
        ["Teen", "Adult"]
    );
}

#[tokio::test]
async fn registered_translators_win_over_built_ins() {
    let fx = setup_with(|builder| {
        builder.register_method(ExactPrefix);
    })
    .await;
    let mut session = fx.store.session();
    session.insert(&User::new("Bo", 1)).unwrap();
    session.insert(&User::new("Bob", 2)).unwrap();
    session.save_changes().await.unwrap();

    let found = Query::<User>::new()
        .filter(field::<String>("name").starts_with("Bo"))
        .single(&mut session)
        .await
        .unwrap();
    assert_eq!(found.name, "Bo");
}
