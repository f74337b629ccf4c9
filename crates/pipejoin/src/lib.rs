//! Join definitions for data pipelines.
//!
//! This crate validates how a pipeline stage joins the output of several
//! upstream stages, and works out the schema of the records the join
//! produces. It does not execute joins: the resulting [`JoinDefinition`] is
//! handed to a planner that decides how to run it.
//!
//! # Overview
//!
//! - [`JoinStage`]: one input of the join, with an optional (possibly not yet
//!   known) schema and its required/broadcast flags
//! - [`JoinField`]: a field selected into the output, optionally aliased
//! - [`JoinCondition`]: how the stages are related ([`OnKeys`] or
//!   [`OnExpression`])
//! - [`JoinDefinitionBuilder`]: collects the above and validates them in
//!   [`build`](JoinDefinitionBuilder::build)
//! - [`JoinError`]: everything that can make a join invalid
//!
//! # Example
//!
//! ```
//! use pipejoin::{JoinCondition, JoinDefinition, JoinField, JoinKey, JoinStage};
//! use pipejoin_schema::{DataType, Field, Schema};
//!
//! let customers = JoinStage::new("customers").with_schema(Schema::record(
//!     "customer",
//!     vec![Field::new("id", DataType::Int), Field::new("name", DataType::String)],
//! )?);
//! let purchases = JoinStage::new("purchases")
//!     .with_required(false)
//!     .with_schema(Schema::record(
//!         "purchase",
//!         vec![Field::new("customer_id", DataType::Int), Field::new("price", DataType::Double)],
//!     )?);
//!
//! let definition = JoinDefinition::builder()
//!     .select([JoinField::new("customers", "name"), JoinField::new("purchases", "price")])
//!     .from([customers, purchases])
//!     .on(JoinCondition::on_keys(vec![
//!         JoinKey::new("customers", ["id"]),
//!         JoinKey::new("purchases", ["customer_id"]),
//!     ]))
//!     .build()?;
//!
//! let schema = definition.output_schema().expect("all stage schemas are known");
//! assert_eq!(schema.to_string(), "joined(name: string, price: nullable double)");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

mod compat;
mod condition;
mod definition;
pub mod error;
mod infer;
mod options;
mod stage;


pub use compat::check_compatibility;
pub use condition::{JoinCondition, JoinKey, OnExpression, OnKeys};
pub use definition::{JoinDefinition, JoinDefinitionBuilder};
pub use error::{ConditionError, JoinError, JoinResult};
pub use infer::infer_output_schema;
pub use options::{ExtraFieldsReport, JoinOptions, DEFAULT_SCHEMA_NAME};
pub use stage::{JoinField, JoinStage};
