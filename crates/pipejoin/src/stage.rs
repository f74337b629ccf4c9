//! Join inputs and selected fields.

use std::fmt;

use pipejoin_schema::Schema;
use serde::{Deserialize, Serialize};

/// One input of a join.
///
/// A stage whose schema is `None` has a schema that is not known yet, for
/// example because it depends on pipeline parameters that are only
/// substituted at run time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinStage {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schema: Option<Schema>,
    #[serde(default = "default_required")]
    required: bool,
    #[serde(default)]
    broadcast: bool,
}

const fn default_required() -> bool {
    true
}

impl JoinStage {
    /// Creates a required, non-broadcast stage with an unknown schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), schema: None, required: true, broadcast: false }
    }

    /// Sets the stage's schema.
    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Sets whether the stage must have a match for a record to be emitted.
    ///
    /// Fields selected from a stage that is not required are nullable in the
    /// join output.
    #[must_use]
    pub const fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets whether the stage is small enough to be broadcast to every worker.
    #[must_use]
    pub const fn with_broadcast(mut self, broadcast: bool) -> Self {
        self.broadcast = broadcast;
        self
    }

    /// Returns the stage name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stage schema, if known.
    #[must_use]
    pub const fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    /// Returns true if the stage takes part in the join inner-style.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns true if the stage is broadcast.
    #[must_use]
    pub const fn is_broadcast(&self) -> bool {
        self.broadcast
    }
}

/// A field selected into the join output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JoinField {
    stage_name: String,
    field_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
}

impl JoinField {
    /// Selects `field_name` from `stage_name` under its own name.
    #[must_use]
    pub fn new(stage_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self { stage_name: stage_name.into(), field_name: field_name.into(), alias: None }
    }

    /// Renames the field in the join output.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Returns the name of the stage the field comes from.
    #[must_use]
    pub fn stage_name(&self) -> &str {
        &self.stage_name
    }

    /// Returns the field name within the stage.
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Returns the output alias, if any.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Returns the name of the field in the join output.
    #[must_use]
    pub fn output_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.field_name)
    }
}

impl fmt::Display for JoinField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.stage_name, self.field_name)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }
        Ok(())
    }
}
