#![forbid(unsafe_code)]

//! Validation failures and results.

use std::collections::BTreeMap;
use std::fmt;

/// Presence rule failed.
pub const ERROR_CODE_REQUIRED: &str = "required";
/// Fewer characters than the minimum.
pub const ERROR_CODE_MIN_LENGTH: &str = "too_short";
/// Character count differs from the required one.
pub const ERROR_CODE_EXACT_LENGTH: &str = "length";
/// Full-match pattern failed.
pub const ERROR_CODE_PATTERN: &str = "pattern";
/// Value does not parse as a number.
pub const ERROR_CODE_NUMERIC: &str = "numeric";
/// Number is zero or negative.
pub const ERROR_CODE_POSITIVE: &str = "positive";
/// Number has a fractional part.
pub const ERROR_CODE_INTEGER: &str = "integer";
/// Value is outside the declared choices.
pub const ERROR_CODE_CHOICE: &str = "choice";

/// One failed rule: a stable code, the message template, and the values
/// the template may reference as `{name}`.
///
/// ```rust
/// use recform_validation::ValidationError;
///
/// let err = ValidationError::new("too_short", "Mínimo de {min} caracteres").with_param("min", 5);
/// assert_eq!(err.to_string(), "Mínimo de 5 caracteres");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Stable code for programmatic checks.
    pub code: &'static str,
    /// Message template.
    pub message: String,
    /// Interpolation values, keyed by placeholder name.
    pub params: BTreeMap<&'static str, String>,
}

impl ValidationError {
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            params: BTreeMap::new(),
        }
    }

    /// Record a value for the `{name}` placeholder.
    #[must_use]
    pub fn with_param(mut self, name: &'static str, value: impl fmt::Display) -> Self {
        self.params.insert(name, value.to_string());
        self
    }

    /// The message with every known placeholder substituted. Unknown
    /// placeholders are left as written.
    #[must_use]
    pub fn format_message(&self) -> String {
        self.params
            .iter()
            .fold(self.message.clone(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_message())
    }
}

impl std::error::Error for ValidationError {}

/// Outcome of running one rule (or a composed set) against a value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationResult {
    #[default]
    Valid,
    Invalid(ValidationError),
}

impl ValidationResult {
    pub(crate) fn fail(error: ValidationError) -> Self {
        Self::Invalid(error)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Self::Valid => None,
            Self::Invalid(err) => Some(err),
        }
    }

    #[must_use]
    pub fn into_error(self) -> Option<ValidationError> {
        match self {
            Self::Valid => None,
            Self::Invalid(err) => Some(err),
        }
    }

    /// Formatted message of the failure, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ValidationError::format_message)
    }
}

impl From<Result<(), ValidationError>> for ValidationResult {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => Self::Valid,
            Err(err) => Self::Invalid(err),
        }
    }
}

impl From<ValidationResult> for Result<(), ValidationError> {
    fn from(result: ValidationResult) -> Self {
        match result {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(err) => Err(err),
        }
    }
}
