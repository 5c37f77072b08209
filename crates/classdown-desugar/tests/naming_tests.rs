use super::*;
use crate::class::Constructible;
use crate::descriptor::ClassDescriptor;
use crate::engine::desugar;
use crate::error::RuntimeError;
use crate::value::Value;
use std::rc::Rc;

#[test]
fn test_class_scope_is_child_of_enclosing() {
    let enclosing = Scope::root();
    let scope = enter_class_scope(&enclosing, Some("Person"));
    assert!(scope.parent().unwrap().ptr_eq(&enclosing));
    assert!(scope.has_own("Person"));
    assert!(!enclosing.is_bound("Person"));
}

#[test]
fn test_internal_name_is_uninitialized_until_bound() {
    let scope = enter_class_scope(&Scope::root(), Some("Person"));
    assert!(matches!(
        scope.resolve("Person"),
        Err(RuntimeError::Uninitialized { .. })
    ));
}

#[test]
fn test_anonymous_class_scope_has_no_bindings() {
    let scope = enter_class_scope(&Scope::root(), None);
    assert!(!scope.is_bound("Person"));
}

#[test]
fn test_bound_name_resolves_to_class_and_is_read_only() {
    let class = desugar(ClassDescriptor::builder(Some("Person")).build()).unwrap();
    let scope = enter_class_scope(&Scope::root(), Some("Alias"));
    bind_internal_name(&scope, "Alias", Rc::downgrade(&class.0));

    let resolved = scope.resolve("Alias").unwrap();
    assert!(resolved.as_class().is_some_and(|c| c.ptr_eq(&class)));
    assert!(matches!(
        scope.assign("Alias", Value::Null),
        Err(RuntimeError::ConstAssignment { .. })
    ));
}

#[test]
fn test_instance_keeps_internal_name_resolvable_after_handle_drops() {
    let instance = {
        let class: Constructible = desugar(
            ClassDescriptor::builder(Some("MyClass"))
                .method("whoAmI", |cx| cx.resolve("MyClass"))
                .build(),
        )
        .unwrap();
        class.instantiate(&[]).unwrap()
    };
    let instance = instance.as_instance().unwrap();

    let class = instance.class().unwrap();
    assert_eq!(class.name(), "MyClass");
    let ctor = instance.get("constructor").unwrap();
    assert!(ctor.as_class().is_some_and(|c| c.ptr_eq(&class)));
    let me = instance.invoke("whoAmI", &[]).unwrap();
    assert!(me.as_class().is_some_and(|c| c.ptr_eq(&class)));
}
