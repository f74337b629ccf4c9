//! Schema compatibility checking.
//!
//! When an output schema is supplied explicitly and the join's schema can
//! also be inferred, the supplied ("provided") schema must be able to stand
//! in for the inferred ("expected") one:
//!
//! - every expected field is present in the provided schema
//! - matching fields have the same base type, ignoring nullability
//! - a nullable expected field is nullable in the provided schema too
//!   (a provided field may be nullable where the expected one is not)
//! - the provided schema has no fields the expected one lacks

use pipejoin_schema::Schema;

use crate::error::{JoinError, JoinResult};
use crate::options::ExtraFieldsReport;

/// Checks that `provided` is compatible with `expected`.
///
/// A type or nullability mismatch is reported as soon as it is found. Missing
/// fields are collected over all expected fields and reported together, and
/// likewise for extra fields.
///
/// # Errors
///
/// Returns [`JoinError::TypeMismatch`], [`JoinError::NullabilityMismatch`],
/// [`JoinError::MissingFields`] or [`JoinError::ExtraFields`].
pub fn check_compatibility(
    expected: &Schema,
    provided: &Schema,
    report: ExtraFieldsReport,
) -> JoinResult<()> {
    let mut missing = Vec::new();

    for expected_field in expected {
        let Some(provided_field) = provided.field(&expected_field.name) else {
            missing.push(expected_field.name.clone());
            continue;
        };

        let expected_type = expected_field.field_type.non_nullable();
        let provided_type = provided_field.field_type.non_nullable();
        if expected_type.kind() != provided_type.kind() {
            return Err(JoinError::TypeMismatch {
                field: expected_field.name.clone(),
                provided: provided_type.to_string(),
                expected: expected_type.to_string(),
            });
        }

        if expected_field.is_nullable() && !provided_field.is_nullable() {
            return Err(JoinError::NullabilityMismatch { field: expected_field.name.clone() });
        }
    }

    if !missing.is_empty() {
        return Err(JoinError::MissingFields(missing));
    }

    let extra: Vec<String> =
        provided.field_names().filter(|name| !expected.contains(name)).map(String::from).collect();

    if !extra.is_empty() {
        let listed = match report {
            ExtraFieldsReport::Extra => extra,
            ExtraFieldsReport::LegacyMissing => missing,
        };
        return Err(JoinError::ExtraFields(listed));
    }

    Ok(())
}
