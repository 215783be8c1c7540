//! Declarative validation of records.
//!
//! Each record type declares a [`Schema`]: its fields, in order, with the
//! structural [`Rule`]s and named custom rules that apply to them. Custom rules
//! live in a [`RuleRegistry`]; the process-wide [`RULES`] registry holds the
//! standard set from [`rules`]. [`validate`] walks a record through its schema
//! and reports every failing field.

mod engine;
mod registry;
pub mod rules;
mod schema;
mod value;

pub use engine::{validate, ValidationError, Violation, Violations};
pub use registry::{CustomRule, RuleRegistry, RuleRegistryBuilder, RULES};
pub use schema::{FieldSchema, Rule, Schema, SchemaBuilder};
pub use value::{FieldValue, Record, Siblings};
