#![forbid(unsafe_code)]

//! Field descriptors: static per-field configuration.

use recform_mask::MaskKind;
use recform_validation::{
    All, ExactLength, Integer, MinLength, Numeric, OneOf, Pattern, PatternError, Positive,
    Required, ValidationResult, Validator,
};

/// One option of a select-style field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Value stored in the record.
    pub value: String,
    /// Text shown to the user.
    pub label: String,
}

impl Choice {
    /// Create a choice.
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Immutable description of one field: name, label, mask and rules.
///
/// Rules run in the order they were added and the first failure wins, so
/// `required` should come first.
///
/// # Example
///
/// ```rust
/// use recform_core::{FieldDescriptor, MaskKind};
///
/// let cvv = FieldDescriptor::new("cvv", "CVV")
///     .mask(MaskKind::digits(3))
///     .required("CVV é obrigatório")
///     .exact_length(3, "CVV deve ter 3 dígitos");
///
/// assert_eq!(cvv.apply_mask("1a2b3c4"), "123");
/// assert_eq!(cvv.check("12").error_message().as_deref(), Some("CVV deve ter 3 dígitos"));
/// ```
#[derive(Debug)]
pub struct FieldDescriptor {
    name: String,
    label: String,
    mask: MaskKind,
    rules: All<str>,
    choices: Vec<Choice>,
    normalize_on_submit: bool,
}

impl FieldDescriptor {
    /// A plain field with no rules.
    #[must_use]
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            mask: MaskKind::Plain,
            rules: All::default(),
            choices: Vec::new(),
            normalize_on_submit: false,
        }
    }

    /// Set the keystroke mask.
    #[must_use]
    pub fn mask(mut self, mask: MaskKind) -> Self {
        self.mask = mask;
        self
    }

    /// Append an arbitrary rule.
    #[must_use]
    pub fn rule(mut self, rule: impl Validator<str> + 'static) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append a presence rule.
    #[must_use]
    pub fn required(self, message: impl Into<String>) -> Self {
        self.rule(Required::new().with_message(message))
    }

    /// Append a full-match pattern rule.
    pub fn pattern(self, pattern: &str, message: impl Into<String>) -> Result<Self, PatternError> {
        Ok(self.rule(Pattern::new(pattern)?.with_message(message)))
    }

    /// Append an exact-length rule.
    #[must_use]
    pub fn exact_length(self, len: usize, message: impl Into<String>) -> Self {
        self.rule(ExactLength::new(len).with_message(message))
    }

    /// Append a minimum-length rule.
    #[must_use]
    pub fn min_length(self, min: usize, message: impl Into<String>) -> Self {
        self.rule(MinLength::new(min).with_message(message))
    }

    /// Append numeric, positivity and integer rules, in that order.
    #[must_use]
    pub fn positive_integer(
        self,
        numeric: impl Into<String>,
        positive: impl Into<String>,
        integer: impl Into<String>,
    ) -> Self {
        self.rule(Numeric::new().with_message(numeric))
            .rule(Positive::new().with_message(positive))
            .rule(Integer::new().with_message(integer))
    }

    /// Declare the options of a select-style field.
    ///
    /// Also appends a rule rejecting any other non-empty value.
    #[must_use]
    pub fn choices<I, V, L>(mut self, choices: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (V, L)>,
        V: Into<String>,
        L: Into<String>,
    {
        self.choices = choices
            .into_iter()
            .map(|(value, label)| Choice::new(value, label))
            .collect();
        let accepted: Vec<String> = self.choices.iter().map(|c| c.value.clone()).collect();
        self.rule(OneOf::new(accepted).with_message(message))
    }

    /// Store the mask's normalized form instead of the display form.
    #[must_use]
    pub fn normalize_on_submit(mut self) -> Self {
        self.normalize_on_submit = true;
        self
    }

    /// Field name (record key).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The keystroke mask.
    #[must_use]
    pub fn mask_kind(&self) -> MaskKind {
        self.mask
    }

    /// Options of a select-style field; empty for free-form fields.
    #[must_use]
    pub fn choice_list(&self) -> &[Choice] {
        &self.choices
    }

    /// Whether values are normalized before storage.
    #[must_use]
    pub fn normalizes_on_submit(&self) -> bool {
        self.normalize_on_submit
    }

    /// Number of rules attached to the field.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Mask raw input into the field's display form.
    #[must_use]
    pub fn apply_mask(&self, raw: &str) -> String {
        self.mask.apply(raw)
    }

    /// Run the field's rules against a value; first failure wins.
    #[must_use]
    pub fn check(&self, value: &str) -> ValidationResult {
        self.rules.validate(value)
    }

    /// Value written to storage for a display value.
    #[must_use]
    pub fn storage_value(&self, display: &str) -> String {
        if self.normalize_on_submit {
            self.mask.normalize(display)
        } else {
            display.to_string()
        }
    }
}
