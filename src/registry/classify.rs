//! Value classification against built-in and custom types

use smallvec::SmallVec;

use super::custom_types::TypeRegistry;
use crate::model::{PrimitiveType, TypeSpec, TypeTag, Value};

impl TypeRegistry {
    /// Classify a value
    ///
    /// The built-in type is refined by the first custom type registered under it whose
    /// check returns its own tag.
    pub fn type_of(&self, value: &Value) -> TypeTag {
        let primitive = value.primitive_type();

        // Snapshot first: checks run without holding the registry lock
        for (custom_type, check) in self.get_custom_types(primitive) {
            if check.classify(value).as_ref() == Some(&custom_type) {
                return TypeTag::Custom(custom_type);
            }
        }

        TypeTag::Primitive(primitive)
    }

    /// Check a value against one or more types
    ///
    /// An `array` also satisfies `iterable`.
    pub fn is_type<I, T>(&self, value: &Value, types: I) -> bool
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeTag>,
    {
        let types: SmallVec<[TypeTag; 4]> = types.into_iter().map(Into::into).collect();
        self.is_any_of(value, &types)
    }

    /// Check a value against a slice of candidate tags
    pub fn is_any_of(&self, value: &Value, types: &[TypeTag]) -> bool {
        let actual = self.type_of(value);
        Self::tag_satisfies(&actual, types)
    }

    /// Check a value against a type specification
    pub fn matches_spec(&self, value: &Value, spec: &TypeSpec) -> bool {
        self.is_any_of(value, spec.tags())
    }

    /// Check an already computed classification against candidate tags
    pub(crate) fn tag_satisfies(actual: &TypeTag, types: &[TypeTag]) -> bool {
        if *actual == PrimitiveType::Array && types.iter().any(|t| *t == PrimitiveType::Iterable) {
            return true;
        }

        types.contains(actual)
    }
}
