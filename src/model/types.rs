//! Type tags and type specifications

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

/// Built-in classification of a raw value
///
/// This is a closed set: every [`Value`](crate::Value) maps to exactly one of these
/// before any custom type refinement takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    /// Plain object
    Object,
    /// Ordered, indexable array
    Array,
    /// The null value
    Null,
    /// String value
    String,
    /// Double precision number
    Number,
    /// Arbitrary size integer
    BigInt,
    /// Boolean value
    Boolean,
    /// Unique symbol
    Symbol,
    /// Absent value
    Undefined,
    /// Synchronous callable
    Function,
    /// Callable returning a deferred result
    AsyncFunction,
    /// Deferred result, computed when first awaited
    Promise,
    /// Non-array value that can produce a sequence
    Iterable,
}

impl PrimitiveType {
    /// All built-in types in declaration order
    pub const ALL: [PrimitiveType; 13] = [
        PrimitiveType::Object,
        PrimitiveType::Array,
        PrimitiveType::Null,
        PrimitiveType::String,
        PrimitiveType::Number,
        PrimitiveType::BigInt,
        PrimitiveType::Boolean,
        PrimitiveType::Symbol,
        PrimitiveType::Undefined,
        PrimitiveType::Function,
        PrimitiveType::AsyncFunction,
        PrimitiveType::Promise,
        PrimitiveType::Iterable,
    ];

    /// Canonical lowercase name of the type
    pub const fn as_str(self) -> &'static str {
        match self {
            PrimitiveType::Object => "object",
            PrimitiveType::Array => "array",
            PrimitiveType::Null => "null",
            PrimitiveType::String => "string",
            PrimitiveType::Number => "number",
            PrimitiveType::BigInt => "bigint",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Symbol => "symbol",
            PrimitiveType::Undefined => "undefined",
            PrimitiveType::Function => "function",
            PrimitiveType::AsyncFunction => "asyncfunction",
            PrimitiveType::Promise => "promise",
            PrimitiveType::Iterable => "iterable",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a built-in type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown built-in type '{0}'")]
pub struct UnknownPrimitiveType(pub String);

impl FromStr for PrimitiveType {
    type Err = UnknownPrimitiveType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrimitiveType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownPrimitiveType(s.to_string()))
    }
}

/// Open-ended identifier for a registered semantic refinement of a built-in type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CustomType(Arc<str>);

impl CustomType {
    /// Create a custom type tag
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Name of the tag
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::borrow::Borrow<str> for CustomType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CustomType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for CustomType {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

/// Result of classifying a value: a built-in type or a custom refinement of one
///
/// Tags compare and hash by name, so a custom type named like a built-in type is
/// the same tag as that built-in type.
#[derive(Debug, Clone)]
pub enum TypeTag {
    /// One of the thirteen built-in types
    Primitive(PrimitiveType),
    /// A registered custom type
    Custom(CustomType),
}

impl TypeTag {
    /// Name of the tag
    pub fn as_str(&self) -> &str {
        match self {
            TypeTag::Primitive(p) => p.as_str(),
            TypeTag::Custom(c) => c.as_str(),
        }
    }

    /// The built-in type, if this is not a custom tag
    pub fn primitive(&self) -> Option<PrimitiveType> {
        match self {
            TypeTag::Primitive(p) => Some(*p),
            TypeTag::Custom(_) => None,
        }
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &TypeTag) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<PrimitiveType> for TypeTag {
    fn eq(&self, other: &PrimitiveType) -> bool {
        self.as_str() == other.as_str()
    }
}

impl PartialEq<str> for TypeTag {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for TypeTag {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl From<PrimitiveType> for TypeTag {
    fn from(p: PrimitiveType) -> Self {
        TypeTag::Primitive(p)
    }
}

impl From<CustomType> for TypeTag {
    fn from(c: CustomType) -> Self {
        TypeTag::Custom(c)
    }
}

impl From<&str> for TypeTag {
    fn from(name: &str) -> Self {
        match name.parse::<PrimitiveType>() {
            Ok(p) => TypeTag::Primitive(p),
            Err(_) => TypeTag::Custom(CustomType::new(name)),
        }
    }
}

impl From<String> for TypeTag {
    fn from(name: String) -> Self {
        match name.parse::<PrimitiveType>() {
            Ok(p) => TypeTag::Primitive(p),
            Err(_) => TypeTag::Custom(CustomType::from(name)),
        }
    }
}

impl From<&TypeTag> for TypeTag {
    fn from(tag: &TypeTag) -> Self {
        tag.clone()
    }
}

impl Serialize for TypeTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TypeTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(TypeTag::from)
    }
}

/// Declared expectation an argument is checked against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    /// Exactly this tag
    Single(TypeTag),
    /// Any one of these tags
    AnyOf(SmallVec<[TypeTag; 4]>),
}

impl TypeSpec {
    /// Create a specification accepting any of the given tags
    pub fn any_of<I, T>(tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeTag>,
    {
        TypeSpec::AnyOf(tags.into_iter().map(Into::into).collect())
    }

    /// Tags allowed by this specification
    pub fn tags(&self) -> &[TypeTag] {
        match self {
            TypeSpec::Single(tag) => std::slice::from_ref(tag),
            TypeSpec::AnyOf(tags) => tags,
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Single(tag) => write!(f, "{tag}"),
            TypeSpec::AnyOf(tags) => {
                for (i, tag) in tags.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{tag}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<TypeTag> for TypeSpec {
    fn from(tag: TypeTag) -> Self {
        TypeSpec::Single(tag)
    }
}

impl From<PrimitiveType> for TypeSpec {
    fn from(p: PrimitiveType) -> Self {
        TypeSpec::Single(p.into())
    }
}

impl From<CustomType> for TypeSpec {
    fn from(c: CustomType) -> Self {
        TypeSpec::Single(c.into())
    }
}

impl From<&str> for TypeSpec {
    fn from(name: &str) -> Self {
        TypeSpec::Single(name.into())
    }
}

impl<T: Into<TypeTag>> From<Vec<T>> for TypeSpec {
    fn from(tags: Vec<T>) -> Self {
        TypeSpec::any_of(tags)
    }
}

impl<T: Into<TypeTag>, const N: usize> From<[T; N]> for TypeSpec {
    fn from(tags: [T; N]) -> Self {
        TypeSpec::any_of(tags)
    }
}
