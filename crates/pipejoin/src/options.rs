//! Join definition builder options.

use serde::{Deserialize, Serialize};

/// Record name given to an inferred output schema when none is set.
pub const DEFAULT_SCHEMA_NAME: &str = "joined";

/// Which field names an [`ExtraFields`](crate::JoinError::ExtraFields) error lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraFieldsReport {
    /// List the provided fields the join does not produce.
    #[default]
    Extra,
    /// List the missing-fields set instead, as older releases did.
    ///
    /// The missing-fields check has already passed by the time extra fields
    /// are reported, so the list is always empty. Only use this when a caller
    /// depends on the exact legacy message.
    LegacyMissing,
}

/// Options controlling how a join definition is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinOptions {
    /// Record name for an inferred output schema when the builder has no
    /// output schema name.
    pub default_schema_name: String,
    /// Contents of the extra-fields compatibility error.
    pub extra_fields_report: ExtraFieldsReport,
}

impl JoinOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default record name for inferred output schemas.
    #[must_use]
    pub fn default_schema_name(mut self, name: impl Into<String>) -> Self {
        self.default_schema_name = name.into();
        self
    }

    /// Sets which names the extra-fields error lists.
    #[must_use]
    pub const fn extra_fields_report(mut self, report: ExtraFieldsReport) -> Self {
        self.extra_fields_report = report;
        self
    }
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self {
            default_schema_name: DEFAULT_SCHEMA_NAME.to_string(),
            extra_fields_report: ExtraFieldsReport::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = JoinOptions::new();
        assert_eq!(options.default_schema_name, "joined");
        assert_eq!(options.extra_fields_report, ExtraFieldsReport::Extra);
    }

    #[test]
    fn test_partial_json() {
        let options: JoinOptions =
            serde_json::from_str(r#"{"extra_fields_report":"legacy_missing"}"#).unwrap();
        assert_eq!(options.default_schema_name, "joined");
        assert_eq!(options.extra_fields_report, ExtraFieldsReport::LegacyMissing);
    }
}
