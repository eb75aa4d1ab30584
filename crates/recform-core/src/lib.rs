#![forbid(unsafe_code)]

//! Core data model for masked, validated records.
//!
//! - [`Record`]: flat field name → string value map, one per [`RecordKey`].
//! - [`FieldDescriptor`]: static per-field configuration (label, mask,
//!   ordered rules, choices).
//! - [`FormSchema`]: the descriptor list of one screen plus its key and
//!   user-facing messages.
//! - [`validate`]: evaluates descriptors against a record, producing a
//!   [`ValidationReport`].
//!
//! A schema is the only thing that differs between screens; everything that
//! consumes it is generic.

pub mod descriptor;
pub mod record;
pub mod schema;

pub use descriptor::{Choice, FieldDescriptor};
pub use record::{Record, RecordError, RecordKey};
pub use schema::{
    FieldReport, FormSchema, FormSchemaBuilder, SchemaError, ScreenMessages, ValidationReport,
    validate,
};

pub use recform_mask::MaskKind;
pub use recform_validation as validation;
