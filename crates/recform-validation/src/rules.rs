#![forbid(unsafe_code)]

//! The [`Validator`] trait and the builtin string rules.
//!
//! Every rule except [`Required`] accepts the empty string.

use std::fmt;

use regex_lite::Regex;

use crate::error::{
    ERROR_CODE_CHOICE, ERROR_CODE_EXACT_LENGTH, ERROR_CODE_INTEGER, ERROR_CODE_MIN_LENGTH,
    ERROR_CODE_NUMERIC, ERROR_CODE_PATTERN, ERROR_CODE_POSITIVE, ERROR_CODE_REQUIRED,
    ValidationError, ValidationResult,
};

/// A rule over values of type `T`.
///
/// ```rust
/// use recform_validation::{ValidationError, ValidationResult, Validator};
///
/// struct NoSpaces;
///
/// impl Validator<str> for NoSpaces {
///     fn validate(&self, value: &str) -> ValidationResult {
///         if value.contains(' ') {
///             ValidationResult::Invalid(ValidationError::new("no_spaces", "Não use espaços"))
///         } else {
///             ValidationResult::Valid
///         }
///     }
/// }
///
/// assert!(NoSpaces.validate("a b").is_invalid());
/// ```
pub trait Validator<T: ?Sized>: Send + Sync {
    fn validate(&self, value: &T) -> ValidationResult;
}

/// Adds `with_message` to rules whose only configurable text is `message`.
macro_rules! message_setter {
    ($($rule:ty),+ $(,)?) => {$(
        impl $rule {
            /// Replace the message template.
            #[must_use]
            pub fn with_message(mut self, message: impl Into<String>) -> Self {
                self.message = message.into();
                self
            }
        }
    )+};
}

message_setter!(
    Required,
    MinLength,
    ExactLength,
    Pattern,
    Numeric,
    Positive,
    Integer,
    OneOf,
);

fn char_count(value: &str) -> usize {
    value.chars().count()
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

// ─────────────────────────────────────────────────────────────────────────────
// Presence
// ─────────────────────────────────────────────────────────────────────────────

/// Rejects empty and whitespace-only values.
#[derive(Debug, Clone)]
pub struct Required {
    pub message: String,
}

impl Default for Required {
    fn default() -> Self {
        Self {
            message: "Campo obrigatório".into(),
        }
    }
}

impl Required {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Validator<str> for Required {
    fn validate(&self, value: &str) -> ValidationResult {
        if value.trim().is_empty() {
            ValidationResult::fail(ValidationError::new(ERROR_CODE_REQUIRED, &self.message))
        } else {
            ValidationResult::Valid
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Length
// ─────────────────────────────────────────────────────────────────────────────

/// At least `min` characters. Template params: `{min}`, `{actual}`.
#[derive(Debug, Clone)]
pub struct MinLength {
    pub min: usize,
    pub message: String,
}

impl MinLength {
    #[must_use]
    pub fn new(min: usize) -> Self {
        Self {
            min,
            message: "Mínimo de {min} caracteres".into(),
        }
    }
}

impl Validator<str> for MinLength {
    fn validate(&self, value: &str) -> ValidationResult {
        match char_count(value) {
            0 => ValidationResult::Valid,
            n if n >= self.min => ValidationResult::Valid,
            n => ValidationResult::fail(
                ValidationError::new(ERROR_CODE_MIN_LENGTH, &self.message)
                    .with_param("min", self.min)
                    .with_param("actual", n),
            ),
        }
    }
}

/// Exactly `len` characters. Template params: `{len}`, `{actual}`.
#[derive(Debug, Clone)]
pub struct ExactLength {
    pub len: usize,
    pub message: String,
}

impl ExactLength {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            len,
            message: "Deve ter {len} caracteres".into(),
        }
    }
}

impl Validator<str> for ExactLength {
    fn validate(&self, value: &str) -> ValidationResult {
        match char_count(value) {
            0 => ValidationResult::Valid,
            n if n == self.len => ValidationResult::Valid,
            n => ValidationResult::fail(
                ValidationError::new(ERROR_CODE_EXACT_LENGTH, &self.message)
                    .with_param("len", self.len)
                    .with_param("actual", n),
            ),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pattern
// ─────────────────────────────────────────────────────────────────────────────

/// A pattern that failed to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternError {
    /// The expression as written.
    pub pattern: String,
    /// Compiler diagnostic.
    pub reason: String,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid pattern {:?}: {}", self.pattern, self.reason)
    }
}

impl std::error::Error for PatternError {}

/// Full-match regular expression.
///
/// The expression is wrapped as `^(?:…)$`, so `\d{3}` accepts `"123"` but
/// not `"1234"`, and alternations are anchored as a whole.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
    pub message: String,
}

impl Pattern {
    pub fn new(pattern: impl Into<String>) -> Result<Self, PatternError> {
        let source = pattern.into();
        match Regex::new(&format!("^(?:{source})$")) {
            Ok(regex) => Ok(Self {
                source,
                regex,
                message: "Formato inválido".into(),
            }),
            Err(err) => Err(PatternError {
                reason: err.to_string(),
                pattern: source,
            }),
        }
    }

    /// The expression without the added anchors.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Validator<str> for Pattern {
    fn validate(&self, value: &str) -> ValidationResult {
        if value.is_empty() || self.regex.is_match(value) {
            return ValidationResult::Valid;
        }
        ValidationResult::fail(
            ValidationError::new(ERROR_CODE_PATTERN, &self.message)
                .with_param("pattern", &self.source),
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Numbers
// ─────────────────────────────────────────────────────────────────────────────

/// Parses as a finite decimal number (surrounding blanks allowed).
#[derive(Debug, Clone)]
pub struct Numeric {
    pub message: String,
}

impl Default for Numeric {
    fn default() -> Self {
        Self {
            message: "Deve ser um número".into(),
        }
    }
}

impl Numeric {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Validator<str> for Numeric {
    fn validate(&self, value: &str) -> ValidationResult {
        if value.trim().is_empty() || parse_number(value).is_some() {
            ValidationResult::Valid
        } else {
            ValidationResult::fail(ValidationError::new(ERROR_CODE_NUMERIC, &self.message))
        }
    }
}

/// Strictly greater than zero. Unparseable values pass; pair with
/// [`Numeric`].
#[derive(Debug, Clone)]
pub struct Positive {
    pub message: String,
}

impl Default for Positive {
    fn default() -> Self {
        Self {
            message: "Deve ser positivo".into(),
        }
    }
}

impl Positive {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Validator<str> for Positive {
    fn validate(&self, value: &str) -> ValidationResult {
        match parse_number(value) {
            Some(n) if n <= 0.0 => ValidationResult::fail(
                ValidationError::new(ERROR_CODE_POSITIVE, &self.message).with_param("actual", n),
            ),
            _ => ValidationResult::Valid,
        }
    }
}

/// No fractional part. Unparseable values pass; pair with [`Numeric`].
#[derive(Debug, Clone)]
pub struct Integer {
    pub message: String,
}

impl Default for Integer {
    fn default() -> Self {
        Self {
            message: "Deve ser um número inteiro".into(),
        }
    }
}

impl Integer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Validator<str> for Integer {
    fn validate(&self, value: &str) -> ValidationResult {
        match parse_number(value) {
            Some(n) if n.fract() != 0.0 => {
                ValidationResult::fail(ValidationError::new(ERROR_CODE_INTEGER, &self.message))
            }
            _ => ValidationResult::Valid,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Choices
// ─────────────────────────────────────────────────────────────────────────────

/// One of a closed list of values. Template param: `{actual}`.
#[derive(Debug, Clone)]
pub struct OneOf {
    pub choices: Vec<String>,
    pub message: String,
}

impl OneOf {
    #[must_use]
    pub fn new<I>(choices: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
            message: "Opção inválida".into(),
        }
    }
}

impl Validator<str> for OneOf {
    fn validate(&self, value: &str) -> ValidationResult {
        if value.is_empty() || self.choices.iter().any(|choice| choice == value) {
            return ValidationResult::Valid;
        }
        ValidationResult::fail(
            ValidationError::new(ERROR_CODE_CHOICE, &self.message).with_param("actual", value),
        )
    }
}
