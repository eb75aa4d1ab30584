#![forbid(unsafe_code)]

//! Keystroke masks for record fields.
//!
//! A mask turns whatever the user typed into the canonical display form of a
//! field. Masks run once per keystroke, so every [`MaskKind`] is:
//!
//! - **Total**: unrecognized characters are dropped, never rejected.
//! - **Deterministic**: the output depends only on the input.
//! - **Idempotent**: `mask(mask(s)) == mask(s)` at every intermediate length.
//!
//! Separators are derived from the digits alone, which is what makes
//! idempotence hold: re-masking strips the separators and re-inserts them at
//! the same offsets.
//!
//! # Example
//!
//! ```rust
//! use recform_mask::MaskKind;
//!
//! assert_eq!(MaskKind::CPF.apply("12345678901"), "123.456.789-01");
//! assert_eq!(MaskKind::CPF.apply("1234"), "123.4");
//! assert_eq!(MaskKind::Phone.apply("11987654321"), "(11) 98765-4321");
//! assert_eq!(MaskKind::BRL.apply("123456"), "R$ 1.234,56");
//! assert_eq!(MaskKind::BRL.normalize("R$ 1.234,56"), "1234.56");
//! ```

mod currency;

pub use currency::CurrencySpec;

/// Fixed-position digit grouping (national IDs, postal codes).
///
/// `separators[i]` is emitted between `groups[i]` and `groups[i + 1]`, and
/// only once the later group has at least one digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSpec {
    /// Digits per group, left to right.
    pub groups: &'static [usize],
    /// Separator placed before each group after the first.
    pub separators: &'static [char],
}

impl GroupSpec {
    /// Brazilian CPF: `000.000.000-00`.
    pub const CPF: Self = Self {
        groups: &[3, 3, 3, 2],
        separators: &['.', '.', '-'],
    };

    /// Brazilian CEP: `00000-000`.
    pub const CEP: Self = Self {
        groups: &[5, 3],
        separators: &['-'],
    };

    /// Total number of digits the mask accepts.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.groups.iter().sum()
    }

    fn apply(&self, raw: &str) -> String {
        let digits: Vec<char> = ascii_digits(raw).take(self.capacity()).collect();
        let mut out = String::with_capacity(digits.len() + self.separators.len());
        let mut consumed = 0;
        for (idx, &size) in self.groups.iter().enumerate() {
            if consumed >= digits.len() {
                break;
            }
            if idx > 0
                && let Some(&sep) = self.separators.get(idx - 1)
            {
                out.push(sep);
            }
            let end = (consumed + size).min(digits.len());
            out.extend(&digits[consumed..end]);
            consumed = end;
        }
        out
    }
}

/// The transform applied to a field's raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskKind {
    /// Identity; free text and select-style fields.
    #[default]
    Plain,
    /// Digits only, optionally truncated.
    Digits {
        /// Maximum number of digits kept.
        max: Option<usize>,
    },
    /// Digits re-grouped with fixed separators.
    Grouped(GroupSpec),
    /// Brazilian mobile phone: `(AA) 00000-0000`.
    Phone,
    /// Currency amount whose last two digits are cents.
    Currency(CurrencySpec),
    /// Day/month fragment: `DD/MM` (also `MM/AA`).
    DayMonth,
}

impl MaskKind {
    /// CPF preset.
    pub const CPF: Self = Self::Grouped(GroupSpec::CPF);
    /// CEP preset.
    pub const CEP: Self = Self::Grouped(GroupSpec::CEP);
    /// Brazilian real preset.
    pub const BRL: Self = Self::Currency(CurrencySpec::BRL);

    /// Digits-only mask truncated to `max` digits.
    #[must_use]
    pub const fn digits(max: usize) -> Self {
        Self::Digits { max: Some(max) }
    }

    /// Digits-only mask without a length limit.
    #[must_use]
    pub const fn unbounded_digits() -> Self {
        Self::Digits { max: None }
    }

    /// Apply the mask to raw input, producing the canonical display value.
    #[must_use]
    pub fn apply(&self, raw: &str) -> String {
        match self {
            Self::Plain => raw.to_string(),
            Self::Digits { max } => {
                let digits = ascii_digits(raw);
                match max {
                    Some(max) => digits.take(*max).collect(),
                    None => digits.collect(),
                }
            }
            Self::Grouped(spec) => spec.apply(raw),
            Self::Phone => phone(raw),
            Self::Currency(spec) => spec.format(raw),
            Self::DayMonth => day_month(raw),
        }
    }

    /// Convert a masked value into the form written to storage.
    ///
    /// Only currency values change: the display formatting is replaced by a
    /// plain decimal (`R$ 1.234,56` becomes `1234.56`). Re-masking the
    /// normalized value yields the original display value.
    #[must_use]
    pub fn normalize(&self, masked: &str) -> String {
        match self {
            Self::Currency(spec) => spec.to_decimal(masked),
            _ => masked.to_string(),
        }
    }
}

/// Apply `kind` to `raw`.
#[must_use]
pub fn mask(kind: &MaskKind, raw: &str) -> String {
    kind.apply(raw)
}

fn ascii_digits(raw: &str) -> impl Iterator<Item = char> + '_ {
    raw.chars().filter(char::is_ascii_digit)
}

const PHONE_DIGITS: usize = 11;
const AREA_CODE_DIGITS: usize = 2;
const PHONE_PREFIX_DIGITS: usize = 5;

fn phone(raw: &str) -> String {
    let digits: String = ascii_digits(raw).take(PHONE_DIGITS).collect();
    if digits.len() <= AREA_CODE_DIGITS {
        return digits;
    }
    let (area, rest) = digits.split_at(AREA_CODE_DIGITS);
    if rest.len() > PHONE_PREFIX_DIGITS {
        let (prefix, line) = rest.split_at(PHONE_PREFIX_DIGITS);
        format!("({area}) {prefix}-{line}")
    } else {
        format!("({area}) {rest}")
    }
}

fn day_month(raw: &str) -> String {
    let digits: String = ascii_digits(raw).take(4).collect();
    if digits.len() > 2 {
        let (day, month) = digits.split_at(2);
        format!("{day}/{month}")
    } else {
        digits
    }
}
