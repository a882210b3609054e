//! Integration tests for classification and the custom type registry

use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use strong_typeof::*;

fn duck_type(value: &Value) -> Option<CustomType> {
    value
        .get("duck")
        .filter(|duck| duck.is_string())
        .map(|_| CustomType::new("duckType"))
}

#[test]
fn test_builtin_classification_scenarios() {
    let registry = TypeRegistry::new();
    assert_eq!(registry.type_of(&Value::from(json!([]))), TypeTag::from("array"));
    assert_eq!(registry.type_of(&Value::set([])), TypeTag::from("iterable"));
    assert_eq!(registry.type_of(&Value::Null), TypeTag::from("null"));
    assert_eq!(
        registry.type_of(&Value::from(Callable::from_async_fn("f", |_| async {
            anyhow::Ok(Value::Undefined)
        }))),
        TypeTag::from("asyncfunction")
    );
    assert!(registry.is_type(&Value::Array(vec![]), ["iterable"]));
}

#[test]
fn test_builtin_types_list() {
    let names: Vec<&str> = builtin_types().into_iter().map(PrimitiveType::as_str).collect();
    assert_eq!(
        names,
        vec![
            "object",
            "array",
            "null",
            "string",
            "number",
            "bigint",
            "boolean",
            "symbol",
            "undefined",
            "function",
            "asyncfunction",
            "promise",
            "iterable",
        ]
    );
}

#[test]
fn test_duck_type_on_default_registry() {
    let _ = env_logger::builder().is_test(true).try_init();
    add_custom_type(PrimitiveType::Object, "duckType", duck_type);

    assert!(enable_custom_types(None));
    assert!(is_type(&Value::from(json!({"duck": "x"})), ["duckType"]));
    assert!(!is_type(&Value::from(json!({})), ["duckType"]));
    assert!(!is_type(&Value::from(json!({"duck": 1})), ["duckType"]));
    assert!(get_custom_types(PrimitiveType::Object).contains_key("duckType"));
}

#[test]
fn test_registration_is_idempotent() {
    let once = TypeRegistry::new();
    once.add_custom_type(PrimitiveType::Object, "duckType", duck_type);

    let twice = TypeRegistry::new();
    twice.add_custom_type(PrimitiveType::Object, "duckType", duck_type);
    twice.add_custom_type(PrimitiveType::Object, "duckType", duck_type);

    assert_eq!(twice.get_custom_types(PrimitiveType::Object).len(), 1);

    for value in [json!({"duck": "x"}), json!({}), json!({"duck": null})] {
        let value = Value::from(value);
        assert_eq!(once.type_of(&value), twice.type_of(&value));
    }
}

#[test]
fn test_registries_are_isolated() {
    let first = TypeRegistry::new();
    let second = TypeRegistry::new();
    first.add_custom_type(PrimitiveType::Object, "duckType", duck_type);

    let duck = Value::from(json!({"duck": "x"}));
    assert_eq!(first.type_of(&duck), TypeTag::from("duckType"));
    assert_eq!(second.type_of(&duck), TypeTag::from("object"));
    assert!(!second.custom_types_enabled());
}

#[test]
fn test_custom_types_in_guards() {
    let registry = Arc::new(TypeRegistry::new());
    registry.add_custom_type(PrimitiveType::Object, "duckType", duck_type);

    let quack = registry
        .strong_function(
            ["duckType"],
            Callable::from_fn("quack", |args| {
                Ok(args[0].get("duck").cloned().unwrap_or_default())
            }),
        )
        .unwrap();

    assert_eq!(
        quack.call(&[Value::from(json!({"duck": "quack!"}))]).unwrap(),
        Value::from("quack!")
    );

    let err = quack.call(&[Value::from(json!({"goose": "honk"}))]).unwrap_err();
    match err {
        GuardError::ArgumentTypeMismatch { actual, .. } => {
            assert_eq!(actual, TypeTag::Primitive(PrimitiveType::Object));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_custom_type_reusing_builtin_name_in_guards() {
    let registry = Arc::new(TypeRegistry::new());
    registry.add_custom_type(PrimitiveType::Object, "array", |_| Some("array".into()));

    let first = registry
        .strong_function(["array"], Callable::from_fn("first", |args| Ok(args[0].clone())))
        .unwrap();

    let object = Value::from(json!({"a": 1}));
    assert_eq!(first.call(std::slice::from_ref(&object)).unwrap(), object);

    let tag = registry.type_of(&object);
    let json = serde_json::to_string(&tag).unwrap();
    assert_eq!(json, r#""array""#);
    assert_eq!(serde_json::from_str::<TypeTag>(&json).unwrap(), tag);
}

#[test]
fn test_custom_classifier_trait_object() {
    struct Even;

    impl CustomClassifier for Even {
        fn classify(&self, value: &Value) -> Option<CustomType> {
            value
                .as_f64()
                .filter(|n| n % 2.0 == 0.0)
                .map(|_| CustomType::new("even"))
        }
    }

    let registry = TypeRegistry::new();
    registry.add_custom_classifier(PrimitiveType::Number, "even", Arc::new(Even));

    assert_eq!(registry.type_of(&Value::from(4)), TypeTag::from("even"));
    assert_eq!(registry.type_of(&Value::from(3)), TypeTag::from("number"));
}

#[test]
fn test_bulk_registration_preserves_order() {
    let registry = TypeRegistry::new();
    registry.set_custom_types(
        PrimitiveType::String,
        [
            (
                "email",
                type_check(|v| v.as_str().filter(|s| s.contains('@')).map(|_| "email".into())),
            ),
            (
                "url",
                type_check(|v| v.as_str().filter(|s| s.contains("://")).map(|_| "url".into())),
            ),
        ],
    );

    let order: Vec<String> = registry
        .get_custom_types(PrimitiveType::String)
        .keys()
        .map(|k| k.to_string())
        .collect();
    assert_eq!(order, vec!["email", "url"]);

    // Both checks match; the first registered wins
    assert_eq!(
        registry.type_of(&Value::from("mailto://a@b")),
        TypeTag::from("email")
    );
    assert_eq!(registry.type_of(&Value::from("https://x")), TypeTag::from("url"));
}
