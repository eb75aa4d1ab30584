#![forbid(unsafe_code)]

//! recform public facade crate.
//!
//! This crate provides the stable surface area for users: re-exports of the
//! mask, validation, record, store and runtime crates, the five screen
//! schemas, environment configuration and a lightweight prelude.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use recform::prelude::*;
//!
//! # async fn run() -> recform::Result<()> {
//! let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
//! let mut card = recform::controller(Screen::PaymentCard, KeyPolicy::Legacy, store)?;
//! card.initialize().await;
//! card.enable_edit();
//! card.change_field("cvv", "12");
//! assert!(matches!(card.submit().await, Outcome::Invalid(_)));
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

pub mod config;
pub mod screens;

// --- Re-exports -------------------------------------------------------------

pub use config::{ConfigError, ConfigParse, RecformConfig};
pub use recform_core::{
    Choice, FieldDescriptor, FormSchema, FormSchemaBuilder, Record, RecordError, RecordKey,
    SchemaError, ScreenMessages, ValidationReport, validate,
};
pub use recform_mask::{CurrencySpec, GroupSpec, MaskKind, mask};
pub use recform_runtime::{
    FieldView, IgnoreReason, Level, Msg, Notification, Outcome, Phase, RecordController,
    RecordMachine, StoreOp, StoreRequest, Update,
};
pub use recform_store::{FileStore, MemoryStore, RecordStore, StoreError, StoreResult};
pub use recform_validation::{ValidationError, ValidationResult, Validator};
pub use screens::{KeyCollision, KeyPolicy, RecordKeyTable, Screen};

pub use recform_core as core;
pub use recform_mask as masks;
pub use recform_runtime as runtime;
pub use recform_store as store;
pub use recform_validation as validation;

// --- Errors ---------------------------------------------------------------

/// Top-level error type for recform applications.
#[derive(Debug)]
pub enum Error {
    /// A screen schema failed to build.
    Schema(SchemaError),
    /// A store operation failed outside the controller.
    Store(StoreError),
    /// I/O failure (terminal, files).
    Io(std::io::Error),
    /// Invalid configuration or arguments.
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(err) => write!(f, "schema error: {err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Schema(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Config(_) => None,
        }
    }
}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err)
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Standard result type for recform APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Build an uninitialized controller for one screen.
pub fn controller(
    screen: Screen,
    policy: KeyPolicy,
    store: Arc<dyn RecordStore>,
) -> Result<RecordController> {
    let schema = screen.schema(policy)?;
    tracing::debug!(
        screen = screen.slug(),
        key = %schema.key(),
        %policy,
        backend = store.name(),
        "building controller"
    );
    Ok(RecordController::new(Arc::new(schema), store))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, FieldView, FileStore, FormSchema, KeyPolicy, MaskKind, MemoryStore, Notification,
        Outcome, Phase, RecordController, RecordStore, RecformConfig, Result, Screen,
    };

    pub use crate::{core, masks, runtime, store, validation};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn errors_convert_and_chain() {
        let err: Error = SchemaError::NoFields.into();
        assert_eq!(err.to_string(), "schema error: schema declares no fields");
        assert!(err.source().is_some());

        let err: Error = ConfigError {
            var: config::ENV_KEY_POLICY,
            value: "x".into(),
            message: "expected legacy|distinct",
        }
        .into();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("RECFORM_KEY_POLICY")));
    }

    #[test]
    fn controller_starts_unloaded() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
        let controller = controller(Screen::Profile, KeyPolicy::Legacy, store).unwrap();
        assert_eq!(controller.phase(), Phase::Unloaded);
        assert_eq!(controller.machine().key().as_str(), "perfil");
    }
}
