//! Join conditions.
//!
//! A [`JoinCondition`] relates the input stages of a join. The join
//! definition only needs one thing from it: [`JoinCondition::validate`],
//! which checks the condition against the stages it is applied to.
//!
//! Two kinds of condition are supported:
//!
//! - [`OnKeys`]: equality of one or more key fields across every stage
//! - [`OnExpression`]: a free-form predicate over exactly two stages

use std::collections::{BTreeMap, HashMap, HashSet};

use pipejoin_schema::TypeKind;
use serde::{Deserialize, Serialize};

use crate::error::ConditionError;
use crate::stage::JoinStage;

/// The condition records of the input stages are joined on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum JoinCondition {
    /// Key equality across stages.
    OnKeys(OnKeys),
    /// A predicate expression over two stages.
    OnExpression(OnExpression),
}

impl JoinCondition {
    /// Creates a key equality condition.
    #[must_use]
    pub fn on_keys(keys: Vec<JoinKey>) -> Self {
        Self::OnKeys(OnKeys::new(keys))
    }

    /// Creates an expression condition without dataset aliases.
    #[must_use]
    pub fn on_expression(expression: impl Into<String>) -> Self {
        Self::OnExpression(OnExpression::new(expression))
    }

    /// Checks the condition against the join's input stages.
    ///
    /// # Errors
    ///
    /// Returns a [`ConditionError`] describing the first problem found.
    pub fn validate(&self, stages: &[JoinStage]) -> Result<(), ConditionError> {
        match self {
            Self::OnKeys(on_keys) => on_keys.validate(stages),
            Self::OnExpression(on_expression) => on_expression.validate(stages),
        }
    }
}

impl From<OnKeys> for JoinCondition {
    fn from(on_keys: OnKeys) -> Self {
        Self::OnKeys(on_keys)
    }
}

impl From<OnExpression> for JoinCondition {
    fn from(on_expression: OnExpression) -> Self {
        Self::OnExpression(on_expression)
    }
}

/// The key fields of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinKey {
    stage_name: String,
    fields: Vec<String>,
}

impl JoinKey {
    /// Creates a key over `fields` of `stage_name`.
    #[must_use]
    pub fn new<I, S>(stage_name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { stage_name: stage_name.into(), fields: fields.into_iter().map(Into::into).collect() }
    }

    /// Returns the stage the key belongs to.
    #[must_use]
    pub fn stage_name(&self) -> &str {
        &self.stage_name
    }

    /// Returns the key fields in order.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

/// Equality of key fields across all input stages.
///
/// Keys are compared position by position: the first field of every key is
/// compared with the first field of every other key, and so on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnKeys {
    keys: Vec<JoinKey>,
    #[serde(default)]
    null_safe: bool,
}

impl OnKeys {
    /// Creates a key equality condition where null keys never match.
    #[must_use]
    pub fn new(keys: Vec<JoinKey>) -> Self {
        Self { keys, null_safe: false }
    }

    /// Sets whether null keys compare equal to each other.
    #[must_use]
    pub const fn with_null_safe(mut self, null_safe: bool) -> Self {
        self.null_safe = null_safe;
        self
    }

    /// Returns the keys.
    #[must_use]
    pub fn keys(&self) -> &[JoinKey] {
        &self.keys
    }

    /// Returns true if null keys compare equal to each other.
    #[must_use]
    pub const fn is_null_safe(&self) -> bool {
        self.null_safe
    }

    fn validate(&self, stages: &[JoinStage]) -> Result<(), ConditionError> {
        if self.keys.is_empty() {
            return Err(ConditionError::NoKeys);
        }

        let by_name: HashMap<&str, &JoinStage> = stages.iter().map(|s| (s.name(), s)).collect();
        // First known key field at each position: (stage, field, kind)
        let mut reference: Vec<Option<(&str, &str, TypeKind)>> = Vec::new();

        for key in &self.keys {
            let stage = by_name.get(key.stage_name()).ok_or_else(|| {
                ConditionError::UnknownKeyStage { stage: key.stage_name.clone() }
            })?;

            if key.fields.is_empty() {
                return Err(ConditionError::EmptyKey { stage: key.stage_name.clone() });
            }

            if reference.is_empty() {
                reference.resize(key.fields.len(), None);
            } else if reference.len() != key.fields.len() {
                return Err(ConditionError::KeyArityMismatch {
                    stage: key.stage_name.clone(),
                    expected: reference.len(),
                    found: key.fields.len(),
                });
            }

            // Field checks need the schema; unknown schemas are checked later
            let Some(schema) = stage.schema() else {
                continue;
            };

            for (slot, field_name) in reference.iter_mut().zip(&key.fields) {
                let field = schema.field(field_name).ok_or_else(|| {
                    ConditionError::UnknownKeyField {
                        stage: key.stage_name.clone(),
                        field: field_name.clone(),
                    }
                })?;
                let kind = field.field_type.kind();

                match slot {
                    None => *slot = Some((key.stage_name(), field_name.as_str(), kind)),
                    Some((left_stage, left_field, left_type)) if *left_type != kind => {
                        return Err(ConditionError::KeyTypeMismatch {
                            left_stage: (*left_stage).to_string(),
                            left_field: (*left_field).to_string(),
                            left_type: *left_type,
                            right_stage: key.stage_name.clone(),
                            right_field: field_name.clone(),
                            right_type: kind,
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        let keyed: HashSet<&str> = self.keys.iter().map(JoinKey::stage_name).collect();
        if let Some(stage) = stages.iter().find(|s| !keyed.contains(s.name())) {
            return Err(ConditionError::MissingKey { stage: stage.name().to_string() });
        }

        Ok(())
    }
}

/// A predicate expression joining two stages.
///
/// Stages may be given aliases so the expression can refer to them by a
/// shorter or more convenient name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnExpression {
    expression: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    dataset_aliases: BTreeMap<String, String>,
}

impl OnExpression {
    /// Creates an expression condition.
    #[must_use]
    pub fn new(expression: impl Into<String>) -> Self {
        Self { expression: expression.into(), dataset_aliases: BTreeMap::new() }
    }

    /// Gives `stage_name` the alias `alias` within the expression.
    #[must_use]
    pub fn with_alias(mut self, stage_name: impl Into<String>, alias: impl Into<String>) -> Self {
        self.dataset_aliases.insert(stage_name.into(), alias.into());
        self
    }

    /// Returns the expression.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Returns the stage aliases, keyed by stage name.
    #[must_use]
    pub const fn dataset_aliases(&self) -> &BTreeMap<String, String> {
        &self.dataset_aliases
    }

    fn validate(&self, stages: &[JoinStage]) -> Result<(), ConditionError> {
        if stages.len() != 2 {
            return Err(ConditionError::ExpressionStageCount { count: stages.len() });
        }

        if self.expression.trim().is_empty() {
            return Err(ConditionError::EmptyExpression);
        }

        let mut aliases = HashSet::with_capacity(self.dataset_aliases.len());
        for (stage, alias) in &self.dataset_aliases {
            if !stages.iter().any(|s| s.name() == stage) {
                return Err(ConditionError::UnknownAliasStage {
                    stage: stage.clone(),
                    alias: alias.clone(),
                });
            }
            if !aliases.insert(alias.as_str()) {
                return Err(ConditionError::DuplicateAlias { alias: alias.clone() });
            }
        }

        Ok(())
    }
}
