//! Argument checks behind strict and loose guards

use crate::error::{GuardError, Result};
use crate::model::{TypeSpec, Value};
use crate::registry::TypeRegistry;

/// Check arguments position by position against `types`
///
/// Supplying more arguments than declared fails at the first undeclared position,
/// before any type is checked. Declared positions without an argument are not checked.
pub fn constrain_types(registry: &TypeRegistry, types: &[TypeSpec], args: &[Value]) -> Result<()> {
    if args.len() > types.len() {
        return Err(GuardError::ArgumentOutOfBounds {
            position: types.len(),
        });
    }

    for (position, (value, spec)) in args.iter().zip(types).enumerate() {
        check_one(registry, spec, position, value)?;
    }

    Ok(())
}

/// Check every argument against the same specification, whatever their number
pub fn loose_types(registry: &TypeRegistry, spec: &TypeSpec, args: &[Value]) -> Result<()> {
    for (position, value) in args.iter().enumerate() {
        check_one(registry, spec, position, value)?;
    }

    Ok(())
}

fn check_one(
    registry: &TypeRegistry,
    spec: &TypeSpec,
    position: usize,
    value: &Value,
) -> Result<()> {
    let actual = registry.type_of(value);
    if TypeRegistry::tag_satisfies(&actual, spec.tags()) {
        Ok(())
    } else {
        Err(GuardError::ArgumentTypeMismatch {
            position,
            expected: spec.clone(),
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PrimitiveType, TypeTag};
    use serde_json::json;

    fn specs(tags: &[&str]) -> Vec<TypeSpec> {
        tags.iter().map(|t| TypeSpec::from(*t)).collect()
    }

    #[test]
    fn test_strict_accepts_matching_and_partial_calls() {
        let registry = TypeRegistry::new();
        let types = specs(&["string", "number"]);
        assert!(constrain_types(&registry, &types, &[Value::from("x"), Value::from(1)]).is_ok());
        assert!(constrain_types(&registry, &types, &[Value::from("x")]).is_ok());
        assert!(constrain_types(&registry, &types, &[]).is_ok());
    }

    #[test]
    fn test_strict_mismatch_reports_first_position() {
        let registry = TypeRegistry::new();
        let types = specs(&["string", "number"]);
        let err =
            constrain_types(&registry, &types, &[Value::from(1), Value::from("x")]).unwrap_err();
        match err {
            GuardError::ArgumentTypeMismatch {
                position,
                expected,
                actual,
            } => {
                assert_eq!(position, 0);
                assert_eq!(expected, TypeSpec::from("string"));
                assert_eq!(actual, TypeTag::Primitive(PrimitiveType::Number));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_strict_out_of_bounds_wins_over_mismatch() {
        let registry = TypeRegistry::new();
        let types = specs(&["string", "number"]);
        let args = [Value::from(1), Value::from(1), Value::from(2)];
        let err = constrain_types(&registry, &types, &args).unwrap_err();
        assert!(matches!(err, GuardError::ArgumentOutOfBounds { position: 2 }));
    }

    #[test]
    fn test_strict_with_alternatives() {
        let registry = TypeRegistry::new();
        let types = vec![TypeSpec::from(["string", "null"])];
        assert!(constrain_types(&registry, &types, &[Value::Null]).is_ok());
        assert!(constrain_types(&registry, &types, &[Value::from(false)]).is_err());
    }

    #[test]
    fn test_loose_checks_every_argument() {
        let registry = TypeRegistry::new();
        let spec = TypeSpec::from("object");
        let ok = [Value::from(json!({})), Value::from(json!({"a": 1}))];
        assert!(loose_types(&registry, &spec, &ok).is_ok());
        assert!(loose_types(&registry, &spec, &[]).is_ok());

        let bad = [Value::from(json!({})), Value::from(json!([]))];
        let err = loose_types(&registry, &spec, &bad).unwrap_err();
        assert_eq!(err.position(), Some(1));
    }
}
