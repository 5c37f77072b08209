use super::*;
use crate::descriptor::{ClassDescriptor, Member, MemberKey};
use crate::engine::desugar;
use crate::instance::Instance;
use classdown_common::Symbol;
use std::cell::RefCell;
use std::rc::Rc;

fn eval(members: &[Member], scope: &Scope) -> Result<Vec<PropertyKey>> {
    evaluate_keys(members, scope, DesugarOptions::default())
}

#[test]
fn test_literal_keys_pass_through() {
    let members = [
        Member::method("a", |_| Ok(Value::Undefined)),
        Member::field("b", None),
    ];
    let keys = eval(&members, &Scope::root()).unwrap();
    assert_eq!(keys, [PropertyKey::from("a"), PropertyKey::from("b")]);
}

#[test]
fn test_computed_keys_run_once_in_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let member = |tag: &'static str, log: &Rc<RefCell<Vec<&'static str>>>| {
        let log = Rc::clone(log);
        Member::method(
            MemberKey::computed(move |_| {
                log.borrow_mut().push(tag);
                Ok(Value::from(tag))
            }),
            |_| Ok(Value::Undefined),
        )
    };
    let members = [member("first", &log), member("second", &log), member("third", &log)];

    let keys = eval(&members, &Scope::root()).unwrap();
    assert_eq!(*log.borrow(), ["first", "second", "third"]);
    assert_eq!(keys[1], PropertyKey::from("second"));
}

#[test]
fn test_later_keys_see_earlier_side_effects() {
    let scope = Scope::root();
    scope.declare("i", 0);
    let bump = || {
        Member::method(
            MemberKey::computed(|cx| {
                let next = cx.resolve("i")?.as_number().unwrap_or(0.0) + 1.0;
                cx.assign("i", next)?;
                Ok(Value::from(format!("m{next}")))
            }),
            |_| Ok(Value::Undefined),
        )
    };
    let keys = eval(&[bump(), bump()], &scope).unwrap();
    assert_eq!(keys, [PropertyKey::from("m1"), PropertyKey::from("m2")]);
    assert_eq!(scope.resolve("i").unwrap(), Value::from(2));
}

#[test]
fn test_failure_reports_member_index_and_stops() {
    let scope = Scope::root();
    scope.declare("ran", false);
    let members = [
        Member::method("ok", |_| Ok(Value::Undefined)),
        Member::method(
            MemberKey::computed(|_| Err(crate::activation::throw("bad key"))),
            |_| Ok(Value::Undefined),
        ),
        Member::method(
            MemberKey::computed(|cx| {
                cx.assign("ran", true)?;
                Ok(Value::from("late"))
            }),
            |_| Ok(Value::Undefined),
        ),
    ];
    let err = eval(&members, &scope).unwrap_err();
    match err {
        RuntimeError::KeyEvaluation { index, cause } => {
            assert_eq!(index, 1);
            assert_eq!(cause.thrown_value(), Some(&Value::from("bad key")));
        }
        other => panic!("expected a key evaluation error, got {other:?}"),
    }
    assert_eq!(scope.resolve("ran").unwrap(), Value::from(false));
}

#[test]
fn test_to_property_key_conversions() {
    let sym = Symbol::new(Some("s"));
    assert_eq!(
        to_property_key(&Value::from(sym.clone()), 1).unwrap(),
        PropertyKey::Symbol(sym)
    );
    assert_eq!(to_property_key(&Value::from(1), 1).unwrap(), PropertyKey::from("1"));
    assert_eq!(to_property_key(&Value::from(1.5), 1).unwrap(), PropertyKey::from("1.5"));
    assert_eq!(to_property_key(&Value::Number(f64::NAN), 1).unwrap(), PropertyKey::from("NaN"));
    assert_eq!(to_property_key(&Value::from(true), 1).unwrap(), PropertyKey::from("true"));
    assert_eq!(to_property_key(&Value::Null, 1).unwrap(), PropertyKey::from("null"));
    assert_eq!(
        to_property_key(&Value::Undefined, 1).unwrap(),
        PropertyKey::from("undefined")
    );
    assert_eq!(
        to_property_key(&Value::from(Instance::plain()), 1).unwrap(),
        PropertyKey::from("[object Object]")
    );
}

#[test]
fn test_extreme_number_keys_use_exponent_spelling() {
    let class = desugar(
        ClassDescriptor::builder(None)
            .method(MemberKey::computed(|_| Ok(Value::from(1e21))), |_| Ok(Value::Undefined))
            .method(MemberKey::computed(|_| Ok(Value::from(1e-7))), |_| Ok(Value::Undefined))
            .build(),
    )
    .unwrap();
    let table = class.method_table();
    assert!(table.contains(&PropertyKey::from("1e+21")));
    assert!(table.contains(&PropertyKey::from("1e-7")));
    assert!(!table.contains(&PropertyKey::from("1000000000000000000000")));
}

#[test]
fn test_to_property_key_uses_to_string_method() {
    let class = desugar(
        ClassDescriptor::builder(Some("Tag"))
            .method("toString", |cx| {
                let id = cx.this_get("id")?;
                Ok(Value::from(format!("tag-{id}")))
            })
            .field("id", |_| Ok(Value::from(7)))
            .build(),
    )
    .unwrap();
    let tag = class.instantiate(&[]).unwrap();
    assert_eq!(to_property_key(&tag, 1).unwrap(), PropertyKey::from("tag-7"));
}
