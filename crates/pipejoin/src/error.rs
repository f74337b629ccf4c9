//! Error types for join definitions.

use pipejoin_schema::{SchemaError, TypeKind};
use thiserror::Error;

/// Errors reported by a join condition when it is checked against the
/// join's input stages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    /// A key equality condition without keys.
    #[error("join keys must be specified")]
    NoKeys,

    /// A join key refers to a stage that is not an input of the join.
    #[error("join key for stage '{stage}' is invalid: stage '{stage}' is not an input")]
    UnknownKeyStage {
        /// The stage named by the key.
        stage: String,
    },

    /// A join key without fields.
    #[error("join key for stage '{stage}' must contain at least one field")]
    EmptyKey {
        /// The stage named by the key.
        stage: String,
    },

    /// An input stage without a join key.
    #[error("stage '{stage}' must have a join key")]
    MissingKey {
        /// The stage without a key.
        stage: String,
    },

    /// A join key field that does not exist in the stage's schema.
    #[error("join key for stage '{stage}' is invalid: field '{field}' does not exist in the stage")]
    UnknownKeyField {
        /// The stage named by the key.
        stage: String,
        /// The missing field.
        field: String,
    },

    /// Join keys with different numbers of fields.
    #[error(
        "join key for stage '{stage}' has {found} fields, but other keys have {expected}; \
         all keys must have the same number of fields"
    )]
    KeyArityMismatch {
        /// The stage whose key differs.
        stage: String,
        /// Number of fields of the first key.
        expected: usize,
        /// Number of fields of this key.
        found: usize,
    },

    /// Key fields at the same position whose types differ.
    #[error(
        "join key field '{left_stage}'.'{left_field}' is of type '{left_type}' but \
         '{right_stage}'.'{right_field}' is of type '{right_type}'"
    )]
    KeyTypeMismatch {
        /// Stage of the first key field.
        left_stage: String,
        /// The first key field.
        left_field: String,
        /// Base type of the first key field.
        left_type: TypeKind,
        /// Stage of the conflicting key field.
        right_stage: String,
        /// The conflicting key field.
        right_field: String,
        /// Base type of the conflicting key field.
        right_type: TypeKind,
    },

    /// An expression condition used with other than two inputs.
    #[error("expression join conditions require exactly two input stages, found {count}")]
    ExpressionStageCount {
        /// Number of input stages.
        count: usize,
    },

    /// An expression condition with a blank expression.
    #[error("join expression must not be empty")]
    EmptyExpression,

    /// A dataset alias for a stage that is not an input of the join.
    #[error("alias '{alias}' is defined for stage '{stage}', which is not an input")]
    UnknownAliasStage {
        /// The aliased stage.
        stage: String,
        /// The alias.
        alias: String,
    },

    /// The same alias given to more than one stage.
    #[error("alias '{alias}' is used for more than one stage")]
    DuplicateAlias {
        /// The repeated alias.
        alias: String,
    },
}

/// Errors that make a join definition invalid.
#[derive(Debug, Error)]
pub enum JoinError {
    /// No fields were selected.
    #[error("at least one field must be selected")]
    EmptySelection,

    /// Fewer than two input stages.
    #[error("at least two stages must be specified, found {count}")]
    InsufficientStages {
        /// Number of stages given.
        count: usize,
    },

    /// Every input stage is marked for broadcast.
    #[error("cannot broadcast all stages")]
    AllBroadcast,

    /// No join condition was set.
    #[error("a join condition must be specified")]
    MissingCondition,

    /// The join condition rejected the input stages.
    #[error(transparent)]
    Condition(#[from] ConditionError),

    /// Two input stages share a name.
    #[error("stage '{stage}' is specified more than once")]
    DuplicateStage {
        /// The repeated stage name.
        stage: String,
    },

    /// A selected field refers to a stage that is not an input.
    #[error(
        "selected field '{stage}'.'{field}' is invalid because stage '{stage}' is not part of the join"
    )]
    UnknownStage {
        /// The stage named by the selector.
        stage: String,
        /// The field named by the selector.
        field: String,
    },

    /// A selected field does not exist in its stage's schema.
    #[error(
        "selected field '{stage}'.'{field}' is invalid because stage '{stage}' does not contain field '{field}'"
    )]
    UnknownField {
        /// The stage named by the selector.
        stage: String,
        /// The missing field.
        field: String,
    },

    /// Two selected fields produce the same output name.
    #[error("field '{field}' from stage '{stage}' is a duplicate; set an alias to make it unique")]
    DuplicateOutputField {
        /// The stage of the later selector.
        stage: String,
        /// The colliding output name.
        field: String,
    },

    /// The provided output schema lacks fields the join produces.
    #[error("provided schema is missing fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// The provided output schema has fields the join does not produce.
    #[error("provided schema has extra fields: {}", .0.join(", "))]
    ExtraFields(Vec<String>),

    /// A provided field's base type differs from the produced one.
    #[error(
        "provided schema does not match expected schema: field '{field}' is a '{provided}' \
         but is expected to be a '{expected}'"
    )]
    TypeMismatch {
        /// The field name.
        field: String,
        /// Display name of the provided type.
        provided: String,
        /// Display name of the expected type.
        expected: String,
    },

    /// A provided field is not nullable but the produced one is.
    #[error("provided schema does not match expected schema: field '{field}' should be nullable")]
    NullabilityMismatch {
        /// The field name.
        field: String,
    },

    /// The synthesized output record could not be created.
    #[error("invalid output schema: {0}")]
    Schema(#[from] SchemaError),
}

/// Result type for join definition operations.
pub type JoinResult<T> = Result<T, JoinError>;
