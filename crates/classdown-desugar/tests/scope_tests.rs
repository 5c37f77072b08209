use super::*;

#[test]
fn test_resolve_walks_parent_chain() {
    let outer = Scope::root();
    outer.declare("x", 1);
    let inner = outer.child();
    inner.declare("y", 2);

    assert_eq!(inner.resolve("x").unwrap(), Value::from(1));
    assert_eq!(inner.resolve("y").unwrap(), Value::from(2));
    assert!(inner.is_bound("x"));
    assert!(!inner.has_own("x"));
    assert!(matches!(
        outer.resolve("y"),
        Err(RuntimeError::Reference { name }) if name == "y"
    ));
}

#[test]
fn test_inner_binding_shadows_outer() {
    let outer = Scope::root();
    outer.declare("x", "outer");
    let inner = outer.child();
    inner.declare("x", "inner");

    assert_eq!(inner.resolve("x").unwrap(), Value::from("inner"));
    assert_eq!(outer.resolve("x").unwrap(), Value::from("outer"));
}

#[test]
fn test_assign_updates_nearest_binding() {
    let outer = Scope::root();
    outer.declare("count", 0);
    let inner = outer.child();

    inner.assign("count", Value::from(5)).unwrap();
    assert_eq!(outer.resolve("count").unwrap(), Value::from(5));
}

#[test]
fn test_const_and_missing_assignments_fail() {
    let scope = Scope::root();
    scope.declare_const("k", 1);

    assert!(matches!(
        scope.assign("k", Value::from(2)),
        Err(RuntimeError::ConstAssignment { name }) if name == "k"
    ));
    assert!(matches!(
        scope.assign("nope", Value::from(2)),
        Err(RuntimeError::Reference { .. })
    ));
    assert_eq!(scope.resolve("k").unwrap(), Value::from(1));
}

#[test]
fn test_uninitialized_binding_shadows_outer_and_rejects_access() {
    let outer = Scope::root();
    outer.declare("Person", "outer value");
    let inner = outer.child();
    inner.declare_uninitialized("Person");

    assert!(matches!(
        inner.resolve("Person"),
        Err(RuntimeError::Uninitialized { name }) if name == "Person"
    ));
    assert!(matches!(
        inner.assign("Person", Value::Null),
        Err(RuntimeError::Uninitialized { .. })
    ));
    assert_eq!(outer.resolve("Person").unwrap(), Value::from("outer value"));
}

#[test]
fn test_dead_class_reference_is_reported_as_undefined_name() {
    let scope = Scope::root();
    scope.initialize_class("Gone", std::rc::Weak::new());
    assert!(matches!(
        scope.resolve("Gone"),
        Err(RuntimeError::Reference { .. })
    ));
}

#[test]
fn test_child_keeps_parent_identity() {
    let outer = Scope::root();
    let inner = outer.child();
    assert!(inner.parent().unwrap().ptr_eq(&outer));
    assert!(outer.parent().is_none());
}
