//! Join definitions.
//!
//! A [`JoinDefinition`] is the validated description of a join: which stages
//! take part, which fields are selected, the condition the stages are joined
//! on, and the schema of the records the join produces. It is created by
//! [`JoinDefinitionBuilder::build`] and cannot be changed afterwards.

use pipejoin_schema::Schema;
use serde::Serialize;
use tracing::{debug, warn};

use crate::compat::check_compatibility;
use crate::condition::JoinCondition;
use crate::error::{JoinError, JoinResult};
use crate::infer::infer_output_schema;
use crate::options::JoinOptions;
use crate::stage::{JoinField, JoinStage};

/// A validated join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinDefinition {
    selected_fields: Vec<JoinField>,
    stages: Vec<JoinStage>,
    condition: JoinCondition,
    output_schema: Option<Schema>,
}

impl JoinDefinition {
    /// Returns a builder for a join definition.
    #[must_use]
    pub fn builder() -> JoinDefinitionBuilder {
        JoinDefinitionBuilder::new()
    }

    /// Returns the selected fields, in output order.
    #[must_use]
    pub fn selected_fields(&self) -> &[JoinField] {
        &self.selected_fields
    }

    /// Returns the input stages.
    #[must_use]
    pub fn stages(&self) -> &[JoinStage] {
        &self.stages
    }

    /// Returns the join condition.
    #[must_use]
    pub const fn condition(&self) -> &JoinCondition {
        &self.condition
    }

    /// Returns the output schema.
    ///
    /// This is `None` when no schema was supplied and some input stage schema
    /// is not known yet.
    #[must_use]
    pub const fn output_schema(&self) -> Option<&Schema> {
        self.output_schema.as_ref()
    }

    /// Returns true if the output schema is known.
    #[must_use]
    pub const fn is_schema_resolved(&self) -> bool {
        self.output_schema.is_some()
    }

    /// Looks up an input stage by name.
    #[must_use]
    pub fn stage(&self, name: &str) -> Option<&JoinStage> {
        self.stages.iter().find(|s| s.name() == name)
    }

    /// Returns the stages that take part inner-style.
    pub fn required_stages(&self) -> impl Iterator<Item = &JoinStage> {
        self.stages.iter().filter(|s| s.is_required())
    }

    /// Returns the stages marked for broadcast.
    pub fn broadcast_stages(&self) -> impl Iterator<Item = &JoinStage> {
        self.stages.iter().filter(|s| s.is_broadcast())
    }

    /// Renders the definition as JSON for the pipeline planner.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Accumulates the parts of a join definition.
///
/// Each setter replaces whatever was set before, so a builder can be
/// reconfigured freely until [`build`](Self::build) is called. Clone the
/// builder to build more than one definition from it.
#[derive(Debug, Clone, Default)]
pub struct JoinDefinitionBuilder {
    selected_fields: Vec<JoinField>,
    stages: Vec<JoinStage>,
    condition: Option<JoinCondition>,
    schema_name: Option<String>,
    output_schema: Option<Schema>,
    options: JoinOptions,
}

impl JoinDefinitionBuilder {
    /// Creates an empty builder with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the builder options.
    #[must_use]
    pub fn with_options(mut self, options: JoinOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the selected fields. Their order is the output field order.
    #[must_use]
    pub fn select(mut self, fields: impl IntoIterator<Item = JoinField>) -> Self {
        self.selected_fields = fields.into_iter().collect();
        self
    }

    /// Sets the input stages.
    #[must_use]
    pub fn from(mut self, stages: impl IntoIterator<Item = JoinStage>) -> Self {
        self.stages = stages.into_iter().collect();
        self
    }

    /// Sets the join condition.
    #[must_use]
    pub fn on(mut self, condition: impl Into<JoinCondition>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Sets the record name of an inferred output schema.
    ///
    /// Ignored when an output schema is set with
    /// [`set_output_schema`](Self::set_output_schema).
    #[must_use]
    pub fn set_output_schema_name(mut self, name: Option<String>) -> Self {
        self.schema_name = name;
        self
    }

    /// Sets the output schema explicitly.
    ///
    /// This is meant for joins whose input schemas are not known when the
    /// pipeline is defined. If they are known, the join's inferred output
    /// schema must be compatible with this one or the build fails.
    #[must_use]
    pub fn set_output_schema(mut self, schema: Schema) -> Self {
        self.output_schema = Some(schema);
        self
    }

    /// Validates the accumulated parts and creates the join definition.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    ///
    /// 1. at least one field is selected
    /// 2. there are at least two stages
    /// 3. not every stage is broadcast
    /// 4. a condition is set and accepts the stages
    /// 5. the output schema is inferred, unless a stage schema is unknown
    /// 6. an explicit output schema is compatible with the inferred one
    ///
    /// # Errors
    ///
    /// Returns a [`JoinError`] describing why the join is invalid.
    pub fn build(self) -> JoinResult<JoinDefinition> {
        debug!(
            stages = self.stages.len(),
            selected_fields = self.selected_fields.len(),
            explicit_schema = self.output_schema.is_some(),
            "building join definition"
        );

        if self.selected_fields.is_empty() {
            return Err(JoinError::EmptySelection);
        }

        if self.stages.len() < 2 {
            return Err(JoinError::InsufficientStages { count: self.stages.len() });
        }

        if self.stages.iter().all(JoinStage::is_broadcast) {
            return Err(JoinError::AllBroadcast);
        }

        let condition = self.condition.ok_or(JoinError::MissingCondition)?;
        condition.validate(&self.stages)?;

        // An explicit schema is compared under its own name
        let schema_name = match (&self.output_schema, &self.schema_name) {
            (Some(provided), configured) => {
                if let Some(configured) = configured {
                    debug!(
                        schema_name = configured.as_str(),
                        "output schema supplied explicitly, ignoring configured schema name"
                    );
                }
                provided.name()
            }
            (None, Some(configured)) => configured.as_str(),
            (None, None) => self.options.default_schema_name.as_str(),
        };

        let inferred = infer_output_schema(&self.selected_fields, &self.stages, schema_name)?;

        let output_schema = match (inferred, self.output_schema) {
            (Some(expected), Some(provided)) => {
                if let Err(e) =
                    check_compatibility(&expected, &provided, self.options.extra_fields_report)
                {
                    warn!(expected = %expected, provided = %provided, "incompatible output schema: {e}");
                    return Err(e);
                }
                Some(provided)
            }
            (None, provided) => provided,
            (inferred, None) => inferred,
        };

        debug!(resolved = output_schema.is_some(), "join definition built");

        Ok(JoinDefinition {
            selected_fields: self.selected_fields,
            stages: self.stages,
            condition,
            output_schema,
        })
    }
}

#[cfg(test)]
mod tests {
    use pipejoin_schema::{DataType, Field, FieldType, SchemaError};

    use super::*;
    use crate::condition::JoinKey;
    use crate::error::ConditionError;
    use crate::options::ExtraFieldsReport;

    fn customers() -> JoinStage {
        JoinStage::new("customers").with_schema(
            Schema::record(
                "customer",
                vec![Field::new("id", DataType::Int), Field::new("name", DataType::String)],
            )
            .unwrap(),
        )
    }

    fn purchases() -> JoinStage {
        JoinStage::new("purchases").with_schema(
            Schema::record(
                "purchase",
                vec![Field::new("customer_id", DataType::Int), Field::new("price", DataType::Double)],
            )
            .unwrap(),
        )
    }

    fn on_customer_id() -> JoinCondition {
        JoinCondition::on_keys(vec![
            JoinKey::new("customers", ["id"]),
            JoinKey::new("purchases", ["customer_id"]),
        ])
    }

    fn valid_builder() -> JoinDefinitionBuilder {
        JoinDefinition::builder()
            .select([JoinField::new("customers", "name"), JoinField::new("purchases", "price")])
            .from([customers(), purchases()])
            .on(on_customer_id())
    }

    #[test]
    fn test_build_infers_schema() {
        let definition = valid_builder().build().unwrap();

        let schema = definition.output_schema().unwrap();
        assert_eq!(schema.to_string(), "joined(name: string, price: double)");
        assert!(definition.is_schema_resolved());
        assert_eq!(definition.stages().len(), 2);
        assert_eq!(definition.selected_fields().len(), 2);
        assert_eq!(definition.condition(), &on_customer_id());
    }

    #[test]
    fn test_setters_replace_previous_values() {
        let definition = valid_builder()
            .select([JoinField::new("customers", "id")])
            .set_output_schema_name(Some("first".into()))
            .set_output_schema_name(Some("second".into()))
            .build()
            .unwrap();

        assert_eq!(definition.output_schema().unwrap().to_string(), "second(id: int)");
    }

    #[test]
    fn test_options_default_schema_name() {
        let definition = valid_builder()
            .with_options(JoinOptions::new().default_schema_name("customer_purchases"))
            .build()
            .unwrap();
        assert_eq!(definition.output_schema().unwrap().name(), "customer_purchases");

        // An explicit name still wins
        let definition = valid_builder()
            .with_options(JoinOptions::new().default_schema_name("customer_purchases"))
            .set_output_schema_name(Some("named".into()))
            .build()
            .unwrap();
        assert_eq!(definition.output_schema().unwrap().name(), "named");
    }

    #[test]
    fn test_explicit_schema_used_verbatim() {
        let provided = Schema::record(
            "custom",
            vec![
                Field::new("price", FieldType::nullable_of(DataType::Double)),
                Field::new("name", DataType::String),
            ],
        )
        .unwrap();

        let definition = valid_builder()
            .set_output_schema_name(Some("ignored".into()))
            .set_output_schema(provided.clone())
            .build()
            .unwrap();

        assert_eq!(definition.output_schema(), Some(&provided));
    }

    #[test]
    fn test_ignored_schema_name_cannot_fail_build() {
        let provided = Schema::record(
            "custom",
            vec![Field::new("name", DataType::String), Field::new("price", DataType::Double)],
        )
        .unwrap();

        let definition = valid_builder()
            .set_output_schema_name(Some(String::new()))
            .set_output_schema(provided.clone())
            .build()
            .unwrap();
        assert_eq!(definition.output_schema(), Some(&provided));

        // Without an explicit schema the name is used, and must be valid
        let err = valid_builder().set_output_schema_name(Some(String::new())).build().unwrap_err();
        assert!(matches!(err, JoinError::Schema(SchemaError::EmptyName)));
    }

    #[test]
    fn test_explicit_schema_checked_against_inferred() {
        let provided =
            Schema::record("custom", vec![Field::new("name", DataType::String)]).unwrap();

        let err = valid_builder().set_output_schema(provided).build().unwrap_err();
        assert!(matches!(err, JoinError::MissingFields(ref names) if names == &["price"]));
    }

    #[test]
    fn test_extra_fields_report_option() {
        let provided = Schema::record(
            "custom",
            vec![
                Field::new("name", DataType::String),
                Field::new("price", DataType::Double),
                Field::new("discount", DataType::Double),
            ],
        )
        .unwrap();

        let err = valid_builder().set_output_schema(provided.clone()).build().unwrap_err();
        assert!(matches!(err, JoinError::ExtraFields(ref names) if names == &["discount"]));

        let err = valid_builder()
            .with_options(
                JoinOptions::new().extra_fields_report(ExtraFieldsReport::LegacyMissing),
            )
            .set_output_schema(provided)
            .build()
            .unwrap_err();
        assert!(matches!(err, JoinError::ExtraFields(ref names) if names.is_empty()));
    }

    #[test]
    fn test_explicit_schema_kept_when_inference_deferred() {
        let provided =
            Schema::record("custom", vec![Field::new("anything", DataType::Bytes)]).unwrap();

        let definition = JoinDefinition::builder()
            .select([JoinField::new("customers", "name"), JoinField::new("pending", "x")])
            .from([customers(), JoinStage::new("pending")])
            .on(JoinCondition::on_keys(vec![
                JoinKey::new("customers", ["id"]),
                JoinKey::new("pending", ["customer_id"]),
            ]))
            .set_output_schema(provided.clone())
            .build()
            .unwrap();

        assert_eq!(definition.output_schema(), Some(&provided));
    }

    #[test]
    fn test_missing_condition() {
        let err = JoinDefinition::builder()
            .select([JoinField::new("customers", "name")])
            .from([customers(), purchases()])
            .build()
            .unwrap_err();
        assert!(matches!(err, JoinError::MissingCondition));
    }

    #[test]
    fn test_condition_error_passes_through() {
        let err = valid_builder()
            .on(JoinCondition::on_keys(vec![JoinKey::new("customers", ["id"])]))
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            JoinError::Condition(ConditionError::MissingKey { ref stage }) if stage == "purchases"
        ));
        assert_eq!(err.to_string(), "stage 'purchases' must have a join key");
    }

    #[test]
    fn test_condition_checked_before_inference() {
        // Both the condition and the selection are wrong; the condition is reported
        let err = valid_builder()
            .select([JoinField::new("orders", "id")])
            .on(JoinCondition::on_keys(vec![]))
            .build()
            .unwrap_err();
        assert!(matches!(err, JoinError::Condition(ConditionError::NoKeys)));
    }

    #[test]
    fn test_stage_accessors() {
        let definition = valid_builder()
            .from([customers(), purchases().with_required(false).with_broadcast(true)])
            .build()
            .unwrap();

        assert!(definition.stage("customers").is_some());
        assert!(definition.stage("orders").is_none());
        assert_eq!(
            definition.required_stages().map(JoinStage::name).collect::<Vec<_>>(),
            vec!["customers"]
        );
        assert_eq!(
            definition.broadcast_stages().map(JoinStage::name).collect::<Vec<_>>(),
            vec!["purchases"]
        );
    }

    #[test]
    fn test_definition_json() {
        let definition = valid_builder().build().unwrap();
        let json: serde_json::Value = serde_json::from_str(&definition.to_json().unwrap()).unwrap();

        assert_eq!(json["selected_fields"][1]["field_name"], "price");
        assert_eq!(json["stages"][0]["name"], "customers");
        assert_eq!(json["condition"]["op"], "on_keys");
        assert_eq!(json["output_schema"]["name"], "joined");
    }
}
