#![forbid(unsafe_code)]

//! Field rules for recform.
//!
//! A field's rules are a [`Validator<str>`] list run in order, where the first
//! failure decides the message shown to the user. Builtins cover presence,
//! length, full-match patterns, numbers and closed choice lists; every one
//! except [`Required`] accepts an empty value, so presence is always stated
//! explicitly.
//!
//! ```rust
//! use recform_validation::{All, ExactLength, Required, Validator};
//!
//! let mut cvv: All<str> = All::default();
//! cvv.push(Required::new().with_message("CVV é obrigatório"));
//! cvv.push(ExactLength::new(3).with_message("CVV deve ter 3 dígitos"));
//!
//! assert!(cvv.validate("123").is_valid());
//! assert_eq!(
//!     cvv.validate("12").error_message().as_deref(),
//!     Some("CVV deve ter 3 dígitos"),
//! );
//! ```

mod compose;
mod error;
mod rules;

pub use compose::All;
pub use error::{
    ERROR_CODE_CHOICE, ERROR_CODE_EXACT_LENGTH, ERROR_CODE_INTEGER, ERROR_CODE_MIN_LENGTH,
    ERROR_CODE_NUMERIC, ERROR_CODE_PATTERN, ERROR_CODE_POSITIVE, ERROR_CODE_REQUIRED,
    ValidationError, ValidationResult,
};
pub use rules::{
    ExactLength, Integer, MinLength, Numeric, OneOf, Pattern, PatternError, Positive, Required,
    Validator,
};
