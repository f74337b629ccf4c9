//! Record schemas.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, SchemaResult};
use crate::types::FieldType;

/// A named, typed field of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Field type, including nullability.
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl Field {
    /// Creates a new field.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: impl Into<FieldType>) -> Self {
        Self { name: name.into(), field_type: field_type.into() }
    }

    /// Returns true if the field may hold null.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.field_type.is_nullable()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.field_type)
    }
}

/// A named record schema: an ordered list of uniquely named fields.
///
/// Field order is significant and preserved. Construction through
/// [`Schema::record`] or deserialization rejects duplicate field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecordRepr")]
pub struct Schema {
    name: String,
    fields: Vec<Field>,
}

/// Unvalidated wire form of a [`Schema`].
#[derive(Deserialize)]
struct RecordRepr {
    name: String,
    fields: Vec<Field>,
}

impl TryFrom<RecordRepr> for Schema {
    type Error = SchemaError;

    fn try_from(repr: RecordRepr) -> SchemaResult<Self> {
        Self::record(repr.name, repr.fields)
    }
}

impl Schema {
    /// Creates a record schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptyName`] if `name` is empty and
    /// [`SchemaError::DuplicateField`] if two fields share a name.
    pub fn record(name: impl Into<String>, fields: Vec<Field>) -> SchemaResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::EmptyName);
        }

        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField { record: name, field: field.name.clone() });
            }
        }

        Ok(Self { name, fields })
    }

    /// Parses a schema from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or describes an invalid record.
    pub fn from_json(json: &str) -> SchemaResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Renders this schema as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> SchemaResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Returns the record name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the fields in order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns true if the record has a field with the given name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Returns the field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{field}")?;
        }
        write!(f, ")")
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    fn users() -> Schema {
        Schema::record(
            "users",
            vec![
                Field::new("id", DataType::Long),
                Field::new("name", DataType::String),
                Field::new("email", FieldType::nullable_of(DataType::String)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_schema_basic() {
        let schema = users();

        assert_eq!(schema.name(), "users");
        assert_eq!(schema.len(), 3);
        assert!(!schema.is_empty());
        assert!(schema.contains("id"));
        assert!(!schema.contains("age"));
        assert_eq!(schema.field_names().collect::<Vec<_>>(), vec!["id", "name", "email"]);

        let email = schema.field("email").unwrap();
        assert!(email.is_nullable());
        assert_eq!(email.field_type.non_nullable(), &DataType::String);
    }

    #[test]
    fn test_schema_rejects_duplicate_fields() {
        let err = Schema::record(
            "users",
            vec![Field::new("id", DataType::Long), Field::new("id", DataType::Int)],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            SchemaError::DuplicateField { ref record, ref field } if record == "users" && field == "id"
        ));
    }

    #[test]
    fn test_schema_rejects_empty_name() {
        let err = Schema::record("", vec![Field::new("id", DataType::Long)]).unwrap_err();
        assert!(matches!(err, SchemaError::EmptyName));
    }

    #[test]
    fn test_schema_display() {
        assert_eq!(users().to_string(), "users(id: long, name: string, email: nullable string)");
    }

    #[test]
    fn test_schema_json() {
        let schema = users();
        let json = schema.to_json().unwrap();
        assert_eq!(Schema::from_json(&json).unwrap(), schema);

        let parsed = Schema::from_json(
            r#"{"name":"t","fields":[{"name":"tags","type":{"nullable":{"array":{"required":"string"}}}}]}"#,
        )
        .unwrap();
        assert_eq!(
            parsed.field("tags").unwrap().field_type,
            FieldType::nullable_of(DataType::array(DataType::String))
        );
    }

    #[test]
    fn test_schema_json_revalidates_fields() {
        let err = Schema::from_json(
            r#"{"name":"t","fields":[{"name":"a","type":{"required":"int"}},{"name":"a","type":{"required":"long"}}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::Json(_)));
        assert!(err.to_string().contains("duplicate field 'a'"));
    }
}
