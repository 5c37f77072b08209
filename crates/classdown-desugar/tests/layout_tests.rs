use super::*;
use crate::descriptor::ClassDescriptor;
use crate::engine::desugar;
use crate::value::Value;

fn sample() -> Constructible {
    desugar(
        ClassDescriptor::builder(Some("Sample"))
            .constructor(&["a", "b"], |_| Ok(Value::Undefined))
            .field("count", |_| Ok(Value::from(0)))
            .bare_field("label")
            .method("run", |_| Ok(Value::Undefined))
            .generator("items", |_| Ok(Value::Undefined))
            .getter("size", |_| Ok(Value::Undefined))
            .build(),
    )
    .unwrap()
}

#[test]
fn test_layout_summarizes_class() {
    let layout = ClassLayout::of(&sample());
    assert_eq!(layout.name, "Sample");
    assert_eq!(layout.internal_name.as_deref(), Some("Sample"));
    assert_eq!(layout.constructor_params, ["a", "b"]);
    assert_eq!(
        layout.fields,
        [
            FieldLayout {
                key: PropertyKey::from("count"),
                has_initializer: true,
            },
            FieldLayout {
                key: PropertyKey::from("label"),
                has_initializer: false,
            },
        ]
    );

    let kinds: Vec<MemberLayoutKind> = layout.members.iter().map(|m| m.kind).collect();
    assert_eq!(
        kinds,
        [
            MemberLayoutKind::Constructor,
            MemberLayoutKind::Method,
            MemberLayoutKind::Generator,
            MemberLayoutKind::Accessor {
                get: true,
                set: false
            },
        ]
    );
    assert!(layout.members.iter().all(|m| !m.enumerable));
    assert!(!layout.members[3].writable);
}

#[test]
fn test_layout_json_shape() {
    let json = ClassLayout::of(&sample()).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["name"], "Sample");
    assert_eq!(value["members"][0]["kind"], "constructor");
    assert_eq!(value["members"][1]["key"], "run");
    assert_eq!(value["members"][3]["kind"]["accessor"]["get"], true);
    assert_eq!(value["fields"][1]["has_initializer"], false);
}

#[test]
fn test_anonymous_layout_omits_internal_name() {
    let class = desugar(ClassDescriptor::builder(None).build()).unwrap();
    let json = ClassLayout::of(&class).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value.get("internal_name").is_none());
    assert_eq!(value["name"], "");
}
