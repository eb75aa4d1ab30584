#![forbid(unsafe_code)]

//! Form schemas and the validation evaluator.
//!
//! A [`FormSchema`] bundles everything that distinguishes one screen from
//! another: the record key, the ordered field descriptors and the texts of
//! the notifications shown after store operations. It also owns the
//! conversion between a draft [`Record`] and its stored JSON form.

use std::collections::HashSet;
use std::fmt;

use recform_validation::{PatternError, ValidationError};
use tracing::{debug, warn};

use crate::descriptor::FieldDescriptor;
use crate::record::{Record, RecordError, RecordKey};

// ---------------------------------------------------------------------------
// Validation report
// ---------------------------------------------------------------------------

/// Outcome of validating one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReport {
    /// Field name.
    pub field: String,
    /// First failing rule's error, if any.
    pub error: Option<ValidationError>,
}

/// Per-field validation outcome in descriptor order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    entries: Vec<FieldReport>,
}

impl ValidationReport {
    /// Whether no field carries an error.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.entries.iter().all(|e| e.error.is_none())
    }

    /// Error for a field, if it failed.
    #[must_use]
    pub fn error(&self, field: &str) -> Option<&ValidationError> {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .and_then(|e| e.error.as_ref())
    }

    /// Formatted error message for a field, if it failed.
    #[must_use]
    pub fn message(&self, field: &str) -> Option<String> {
        self.error(field).map(ValidationError::format_message)
    }

    /// Names of the failing fields, in descriptor order.
    #[must_use]
    pub fn failing_fields(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.error.is_some())
            .map(|e| e.field.as_str())
            .collect()
    }

    /// All entries, failing or not.
    #[must_use]
    pub fn entries(&self) -> &[FieldReport] {
        &self.entries
    }
}

/// Validate `record` against `descriptors`.
///
/// For each descriptor, in order, only the first failing rule is reported.
/// A field missing from the record is validated as an empty string.
#[must_use]
pub fn validate(record: &Record, descriptors: &[FieldDescriptor]) -> ValidationReport {
    let entries = descriptors
        .iter()
        .map(|descriptor| {
            let value = record.get(descriptor.name()).unwrap_or_default();
            FieldReport {
                field: descriptor.name().to_string(),
                error: descriptor.check(value).into_error(),
            }
        })
        .collect();
    ValidationReport { entries }
}

// ---------------------------------------------------------------------------
// Schema errors
// ---------------------------------------------------------------------------

/// Errors raised while building a [`FormSchema`].
#[derive(Debug, Clone)]
pub enum SchemaError {
    /// The schema declares no fields.
    NoFields,
    /// A field has an empty name.
    EmptyFieldName,
    /// Two descriptors share a name.
    DuplicateField(String),
    /// A pattern rule did not compile.
    InvalidPattern(PatternError),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::NoFields => write!(f, "schema declares no fields"),
            SchemaError::EmptyFieldName => write!(f, "field name must not be empty"),
            SchemaError::DuplicateField(name) => write!(f, "duplicate field {name:?}"),
            SchemaError::InvalidPattern(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SchemaError::InvalidPattern(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PatternError> for SchemaError {
    fn from(e: PatternError) -> Self {
        SchemaError::InvalidPattern(e)
    }
}

// ---------------------------------------------------------------------------
// Screen messages
// ---------------------------------------------------------------------------

/// User-facing notification texts for one screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenMessages {
    /// Shown after a successful save.
    pub saved: String,
    /// Shown after a successful delete.
    pub deleted: String,
    /// Prefix of the notification shown when loading fails.
    pub load_failed: String,
    /// Prefix of the notification shown when saving fails.
    pub save_failed: String,
    /// Prefix of the notification shown when deleting fails.
    pub delete_failed: String,
}

impl Default for ScreenMessages {
    fn default() -> Self {
        Self {
            saved: "Dados salvos!".into(),
            deleted: "Dados excluídos!".into(),
            load_failed: "Não foi possível carregar os dados".into(),
            save_failed: "Não foi possível salvar os dados".into(),
            delete_failed: "Não foi possível excluir os dados".into(),
        }
    }
}

impl ScreenMessages {
    /// Default texts with screen-specific success messages.
    #[must_use]
    pub fn new(saved: impl Into<String>, deleted: impl Into<String>) -> Self {
        Self {
            saved: saved.into(),
            deleted: deleted.into(),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// FormSchema
// ---------------------------------------------------------------------------

/// Static description of one screen's record.
#[derive(Debug)]
pub struct FormSchema {
    key: RecordKey,
    title: String,
    fields: Vec<FieldDescriptor>,
    messages: ScreenMessages,
}

impl FormSchema {
    /// Start building a schema stored under `key`.
    #[must_use]
    pub fn builder(key: impl Into<String>, title: impl Into<String>) -> FormSchemaBuilder {
        FormSchemaBuilder {
            key: RecordKey::new(key),
            title: title.into(),
            fields: Vec::new(),
            messages: ScreenMessages::default(),
        }
    }

    /// Key the record is stored under.
    #[must_use]
    pub fn key(&self) -> &RecordKey {
        &self.key
    }

    /// Same schema stored under a different key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = RecordKey::new(key);
        self
    }

    /// Screen title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Field descriptors in display order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Descriptor for a field name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Notification texts.
    #[must_use]
    pub fn messages(&self) -> &ScreenMessages {
        &self.messages
    }

    /// Record with every field empty.
    #[must_use]
    pub fn default_record(&self) -> Record {
        Record::with_fields(self.fields.iter().map(FieldDescriptor::name))
    }

    /// Mask raw input for a field. `None` if the field is unknown.
    #[must_use]
    pub fn mask_field(&self, name: &str, raw: &str) -> Option<String> {
        self.field(name).map(|f| f.apply_mask(raw))
    }

    /// Validate a record against this schema.
    #[must_use]
    pub fn validate(&self, record: &Record) -> ValidationReport {
        validate(record, &self.fields)
    }

    /// Serialize a draft for storage, normalizing fields that ask for it.
    pub fn encode(&self, draft: &Record) -> Result<String, RecordError> {
        let mut stored = self.default_record();
        for descriptor in &self.fields {
            let value = draft.get(descriptor.name()).unwrap_or_default();
            stored.set(descriptor.name(), descriptor.storage_value(value));
        }
        stored.to_json()
    }

    /// Decode a stored record and conform it to this schema.
    ///
    /// Missing fields become empty, unknown fields are dropped and every
    /// value is re-masked so the draft shows its display form.
    pub fn decode(&self, json: &str) -> Result<Record, RecordError> {
        let mut stored = Record::decode_loose(json)?;
        let mut record = self.default_record();
        for descriptor in &self.fields {
            match stored.remove(descriptor.name()) {
                Some(value) => {
                    record.set(descriptor.name(), descriptor.apply_mask(&value));
                }
                None => debug!(
                    key = %self.key,
                    field = descriptor.name(),
                    "stored record is missing a field"
                ),
            }
        }
        for field in stored.keys() {
            warn!(key = %self.key, field = %field, "dropping unknown stored field");
        }
        Ok(record)
    }
}

/// Builder for [`FormSchema`].
#[derive(Debug)]
pub struct FormSchemaBuilder {
    key: RecordKey,
    title: String,
    fields: Vec<FieldDescriptor>,
    messages: ScreenMessages,
}

impl FormSchemaBuilder {
    /// Append a field.
    #[must_use]
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    /// Replace the notification texts.
    #[must_use]
    pub fn messages(mut self, messages: ScreenMessages) -> Self {
        self.messages = messages;
        self
    }

    /// Finish the schema, checking field names.
    pub fn build(self) -> Result<FormSchema, SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::NoFields);
        }
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name().is_empty() {
                return Err(SchemaError::EmptyFieldName);
            }
            if !seen.insert(field.name()) {
                return Err(SchemaError::DuplicateField(field.name().to_string()));
            }
        }
        Ok(FormSchema {
            key: self.key,
            title: self.title,
            fields: self.fields,
            messages: self.messages,
        })
    }
}
