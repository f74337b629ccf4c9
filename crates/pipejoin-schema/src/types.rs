//! Field types.
//!
//! Nullability is modelled as a wrapper around a base type rather than a flag
//! on the field: a [`FieldType`] is either `Required(DataType)` or
//! `Nullable(DataType)`, and [`DataType`] itself has no nullable variant. A
//! single unwrap therefore always yields the base type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::Schema;

/// Base data types a record field can hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// The null type (a field that only ever holds null).
    Null,
    /// Boolean type.
    Boolean,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 32-bit floating point.
    Float,
    /// 64-bit floating point.
    Double,
    /// Binary data.
    Bytes,
    /// UTF-8 string.
    String,
    /// Enumeration with its symbols.
    Enum(Vec<String>),
    /// Array of another type.
    Array(Box<FieldType>),
    /// Map from key type to value type.
    Map {
        /// Key type.
        key: Box<FieldType>,
        /// Value type.
        value: Box<FieldType>,
    },
    /// Nested record.
    Record(Schema),
}

impl DataType {
    /// Creates an array type with the given element type.
    #[must_use]
    pub fn array(element: impl Into<FieldType>) -> Self {
        Self::Array(Box::new(element.into()))
    }

    /// Creates a map type with the given key and value types.
    #[must_use]
    pub fn map(key: impl Into<FieldType>, value: impl Into<FieldType>) -> Self {
        Self::Map { key: Box::new(key.into()), value: Box::new(value.into()) }
    }

    /// Returns the type tag of this type.
    ///
    /// Two types with the same kind are treated as the same base type by
    /// schema compatibility checks, whatever their element or field types.
    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::Null => TypeKind::Null,
            Self::Boolean => TypeKind::Boolean,
            Self::Int => TypeKind::Int,
            Self::Long => TypeKind::Long,
            Self::Float => TypeKind::Float,
            Self::Double => TypeKind::Double,
            Self::Bytes => TypeKind::Bytes,
            Self::String => TypeKind::String,
            Self::Enum(_) => TypeKind::Enum,
            Self::Array(_) => TypeKind::Array,
            Self::Map { .. } => TypeKind::Map,
            Self::Record(_) => TypeKind::Record,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enum(symbols) => write!(f, "enum<{}>", symbols.join(", ")),
            Self::Array(element) => write!(f, "array<{element}>"),
            Self::Map { key, value } => write!(f, "map<{key}, {value}>"),
            Self::Record(schema) => write!(f, "record<{}>", schema.name()),
            other => write!(f, "{}", other.kind()),
        }
    }
}

/// A base type together with its nullability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// The field always holds a value.
    Required(DataType),
    /// The field may hold null.
    Nullable(DataType),
}

impl FieldType {
    /// Creates a non-nullable field type.
    #[must_use]
    pub const fn required(data_type: DataType) -> Self {
        Self::Required(data_type)
    }

    /// Creates a nullable field type.
    #[must_use]
    pub const fn nullable_of(data_type: DataType) -> Self {
        Self::Nullable(data_type)
    }

    /// Returns true if the field may hold null.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_))
    }

    /// Returns the base type with nullability stripped.
    #[must_use]
    pub const fn non_nullable(&self) -> &DataType {
        match self {
            Self::Required(data_type) | Self::Nullable(data_type) => data_type,
        }
    }

    /// Wraps this type as nullable. Already nullable types are returned as is.
    #[must_use]
    pub fn into_nullable(self) -> Self {
        match self {
            Self::Required(data_type) => Self::Nullable(data_type),
            nullable @ Self::Nullable(_) => nullable,
        }
    }

    /// Returns the type tag of the base type.
    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        self.non_nullable().kind()
    }
}

impl From<DataType> for FieldType {
    fn from(data_type: DataType) -> Self {
        Self::Required(data_type)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required(data_type) => write!(f, "{data_type}"),
            Self::Nullable(data_type) => write!(f, "nullable {data_type}"),
        }
    }
}

/// Type tags, one per [`DataType`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// See [`DataType::Null`].
    Null,
    /// See [`DataType::Boolean`].
    Boolean,
    /// See [`DataType::Int`].
    Int,
    /// See [`DataType::Long`].
    Long,
    /// See [`DataType::Float`].
    Float,
    /// See [`DataType::Double`].
    Double,
    /// See [`DataType::Bytes`].
    Bytes,
    /// See [`DataType::String`].
    String,
    /// See [`DataType::Enum`].
    Enum,
    /// See [`DataType::Array`].
    Array,
    /// See [`DataType::Map`].
    Map,
    /// See [`DataType::Record`].
    Record,
}

impl TypeKind {
    /// Returns the lowercase display name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Bytes => "bytes",
            Self::String => "string",
            Self::Enum => "enum",
            Self::Array => "array",
            Self::Map => "map",
            Self::Record => "record",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
