#![forbid(unsafe_code)]

//! Ordered rule lists.

use std::fmt;

use crate::error::ValidationResult;
use crate::rules::Validator;

/// Runs rules in insertion order; the first failure wins. Empty is valid.
///
/// Rules are boxed so one list can mix rule types.
///
/// ```rust
/// use recform_validation::{All, ExactLength, Required, Validator};
///
/// let mut cvv: All<str> = All::default();
/// cvv.push(Required::new().with_message("CVV é obrigatório"));
/// cvv.push(ExactLength::new(3).with_message("CVV deve ter 3 dígitos"));
///
/// assert!(cvv.validate("123").is_valid());
/// assert_eq!(cvv.validate("").error_message().as_deref(), Some("CVV é obrigatório"));
/// ```
pub struct All<T: ?Sized> {
    rules: Vec<Box<dyn Validator<T>>>,
}

impl<T: ?Sized> Default for All<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T: ?Sized> All<T> {
    #[must_use]
    pub fn new(rules: Vec<Box<dyn Validator<T>>>) -> Self {
        Self { rules }
    }

    /// Append a rule after every rule already present.
    pub fn push(&mut self, rule: impl Validator<T> + 'static) {
        self.rules.push(Box::new(rule));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<T: ?Sized> Validator<T> for All<T> {
    fn validate(&self, value: &T) -> ValidationResult {
        self.rules
            .iter()
            .map(|rule| rule.validate(value))
            .find(ValidationResult::is_invalid)
            .unwrap_or_default()
    }
}

impl<T: ?Sized> fmt::Debug for All<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("All").field("rules", &self.rules.len()).finish()
    }
}
