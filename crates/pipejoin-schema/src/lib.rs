//! Record schemas for pipeline join planning.
//!
//! This crate provides the value types that describe the records flowing
//! between pipeline stages:
//!
//! - [`DataType`]: the closed set of base types a field can hold
//! - [`FieldType`]: a base type that is either required or nullable
//! - [`Field`]: a named, typed entry of a record
//! - [`Schema`]: a named, ordered record of uniquely named fields
//! - [`TypeKind`]: the type tag used when comparing base types
//!
//! # Example
//!
//! ```
//! use pipejoin_schema::{DataType, Field, FieldType, Schema};
//!
//! let schema = Schema::record(
//!     "purchase",
//!     vec![
//!         Field::new("id", DataType::Int),
//!         Field::new("note", FieldType::nullable_of(DataType::String)),
//!     ],
//! )
//! .unwrap();
//!
//! assert!(schema.field("note").unwrap().is_nullable());
//! assert_eq!(schema.to_string(), "purchase(id: int, note: nullable string)");
//! ```

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod error;
mod schema;
mod types;


pub use error::{SchemaError, SchemaResult};
pub use schema::{Field, Schema};
pub use types::{DataType, FieldType, TypeKind};
