//! Output schema inference.
//!
//! The output of a join has one field per selected field, in selection order.
//! Each output field takes the type of the field it was selected from; fields
//! selected from a stage that is not required become nullable, since a
//! record without a match in that stage carries no value for them.

use std::collections::{HashMap, HashSet};

use pipejoin_schema::{Field, Schema};
use tracing::debug;

use crate::error::{JoinError, JoinResult};
use crate::stage::{JoinField, JoinStage};

/// Infers the output schema of a join.
///
/// Returns `Ok(None)` when a selected field comes from a stage whose schema
/// is not known yet; the output schema then has to be resolved later.
///
/// # Errors
///
/// Returns an error if two stages share a name, a selected field refers to
/// an unknown stage or field, two selected fields produce the same output
/// name, or `schema_name` is empty.
pub fn infer_output_schema(
    selected: &[JoinField],
    stages: &[JoinStage],
    schema_name: &str,
) -> JoinResult<Option<Schema>> {
    let by_name = index_stages(stages)?;
    let mut output_names = HashSet::with_capacity(selected.len());
    let mut fields = Vec::with_capacity(selected.len());

    for selector in selected {
        let stage = by_name.get(selector.stage_name()).ok_or_else(|| JoinError::UnknownStage {
            stage: selector.stage_name().to_string(),
            field: selector.field_name().to_string(),
        })?;

        let Some(stage_schema) = stage.schema() else {
            debug!(stage = stage.name(), "stage schema unknown, deferring output schema");
            return Ok(None);
        };

        let field =
            stage_schema.field(selector.field_name()).ok_or_else(|| JoinError::UnknownField {
                stage: selector.stage_name().to_string(),
                field: selector.field_name().to_string(),
            })?;

        let output_name = selector.output_name();
        if !output_names.insert(output_name) {
            return Err(JoinError::DuplicateOutputField {
                stage: selector.stage_name().to_string(),
                field: output_name.to_string(),
            });
        }

        let field_type = if stage.is_required() {
            field.field_type.clone()
        } else {
            field.field_type.clone().into_nullable()
        };
        fields.push(Field::new(output_name, field_type));
    }

    Ok(Some(Schema::record(schema_name, fields)?))
}

/// Indexes stages by name, rejecting duplicates.
fn index_stages(stages: &[JoinStage]) -> JoinResult<HashMap<&str, &JoinStage>> {
    let mut by_name = HashMap::with_capacity(stages.len());
    for stage in stages {
        if by_name.insert(stage.name(), stage).is_some() {
            return Err(JoinError::DuplicateStage { stage: stage.name().to_string() });
        }
    }
    Ok(by_name)
}
