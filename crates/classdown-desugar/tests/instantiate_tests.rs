use super::*;
use crate::activation::throw;
use crate::descriptor::ClassDescriptor;
use crate::engine::{DesugarOptions, Desugarer, desugar};
use crate::scope::Scope;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_fields_run_in_order_before_constructor() {
    let log: Rc<RefCell<Vec<String>>> = Rc::default();
    let (l1, l2, l3) = (Rc::clone(&log), Rc::clone(&log), Rc::clone(&log));
    let class = desugar(
        ClassDescriptor::builder(Some("Ordered"))
            .field("a", move |_| {
                l1.borrow_mut().push("a".into());
                Ok(Value::from(1))
            })
            .constructor(&[], move |cx| {
                let a = cx.this_get("a")?;
                let b = cx.this_get("b")?;
                l2.borrow_mut().push(format!("ctor a={a} b={b}"));
                Ok(Value::Undefined)
            })
            .field("b", move |cx| {
                // Earlier fields are visible.
                let a = cx.this_get("a")?.as_number().unwrap_or(0.0);
                l3.borrow_mut().push("b".into());
                Ok(Value::from(a + 1.0))
            })
            .build(),
    )
    .unwrap();

    let obj = instantiate(&class, &[]).unwrap();
    assert_eq!(*log.borrow(), ["a", "b", "ctor a=1 b=2"]);
    let obj = obj.as_instance().unwrap();
    assert_eq!(obj.field("b"), Some(Value::from(2)));
}

#[test]
fn test_bare_field_starts_undefined() {
    let class = desugar(ClassDescriptor::builder(None).bare_field("x").build()).unwrap();
    let obj = class.instantiate(&[]).unwrap();
    let obj = obj.as_instance().unwrap();
    assert!(obj.has_field("x"));
    assert_eq!(obj.field("x"), Some(Value::Undefined));
}

#[test]
fn test_constructor_receives_arguments() {
    let class = desugar(
        ClassDescriptor::builder(Some("Pair"))
            .constructor(&["left", "right"], |cx| {
                cx.this_set("left", cx.arg(0))?;
                cx.this_set("right", cx.arg(1))?;
                Ok(Value::Undefined)
            })
            .build(),
    )
    .unwrap();
    let obj = class.instantiate(&[Value::from("l")]).unwrap();
    let obj = obj.as_instance().unwrap();
    assert_eq!(obj.field("left"), Some(Value::from("l")));
    assert_eq!(obj.field("right"), Some(Value::Undefined));
    assert_eq!(class.length(), 2);
}

#[test]
fn test_composite_return_replaces_instance() {
    let replacement = Instance::plain();
    replacement.set("replaced", true).unwrap();
    let returned = replacement.clone();
    let class = desugar(
        ClassDescriptor::builder(Some("Factory"))
            .constructor(&[], move |_| Ok(Value::from(returned.clone())))
            .build(),
    )
    .unwrap();

    let obj = class.instantiate(&[]).unwrap();
    assert!(obj.as_instance().unwrap().ptr_eq(&replacement));
}

#[test]
fn test_primitive_return_is_ignored() {
    let class = desugar(
        ClassDescriptor::builder(Some("Stubborn"))
            .constructor(&[], |_| Ok(Value::from(42)))
            .build(),
    )
    .unwrap();
    let obj = class.instantiate(&[]).unwrap();
    let obj = obj.as_instance().unwrap();
    assert!(obj.class().unwrap().ptr_eq(&class));
}

#[test]
fn test_errors_propagate_unmodified() {
    let from_field = desugar(
        ClassDescriptor::builder(Some("BadField"))
            .field("x", |_| Err(throw("field failed")))
            .build(),
    )
    .unwrap();
    let err = from_field.instantiate(&[]).unwrap_err();
    assert_eq!(err.thrown_value(), Some(&Value::from("field failed")));

    let from_ctor = desugar(
        ClassDescriptor::builder(Some("BadCtor"))
            .constructor(&[], |_| Err(throw("ctor failed")))
            .build(),
    )
    .unwrap();
    let err = from_ctor.instantiate(&[]).unwrap_err();
    assert_eq!(err.thrown_value(), Some(&Value::from("ctor failed")));
    // The class stays usable.
    assert!(from_ctor.instantiate(&[]).is_err());
}

#[test]
fn test_instances_share_table_not_fields() {
    let class = desugar(
        ClassDescriptor::builder(Some("Counter"))
            .field("n", |_| Ok(Value::from(0)))
            .method("inc", |cx| {
                let n = cx.this_get("n")?.as_number().unwrap_or(0.0);
                cx.this_set("n", n + 1.0)?;
                Ok(Value::Undefined)
            })
            .build(),
    )
    .unwrap();
    let a = class.instantiate(&[]).unwrap();
    let b = class.instantiate(&[]).unwrap();
    let (a, b) = (a.as_instance().unwrap(), b.as_instance().unwrap());

    a.invoke("inc", &[]).unwrap();
    a.invoke("inc", &[]).unwrap();
    assert_eq!(a.field("n"), Some(Value::from(2)));
    assert_eq!(b.field("n"), Some(Value::from(0)));
    assert!(Rc::ptr_eq(
        &a.method_table().unwrap(),
        &b.method_table().unwrap()
    ));
    assert!(Rc::ptr_eq(&a.method_table().unwrap(), class.method_table()));
}

#[test]
fn test_recursive_construction_hits_depth_limit() {
    let scope = Scope::root();
    let options = DesugarOptions::default().with_max_call_depth(16);
    let class = Desugarer::new(options)
        .build(
            ClassDescriptor::builder(Some("Nested"))
                .in_scope(&scope)
                .constructor(&[], |cx| {
                    let me = cx.resolve("Nested")?;
                    cx.construct(&me, &[])
                })
                .build(),
        )
        .unwrap();
    let err = class.instantiate(&[]).unwrap_err();
    assert!(matches!(err, RuntimeError::CallDepthExceeded { limit: 16 }));
}
