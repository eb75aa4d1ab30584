#![forbid(unsafe_code)]

//! Currency formatting with implied cents.

/// Display conventions for a currency amount.
///
/// `symbol` must not contain ASCII digits, otherwise re-masking would read
/// them back as part of the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencySpec {
    /// Prefix, followed by a single space.
    pub symbol: &'static str,
    /// Separator between the integer part and the cents.
    pub decimal: char,
    /// Separator between thousands groups.
    pub group: char,
    /// Maximum number of significant digits (cents included).
    pub max_digits: usize,
}

impl CurrencySpec {
    /// Brazilian real: `R$ 1.234,56`.
    pub const BRL: Self = Self {
        symbol: "R$",
        decimal: ',',
        group: '.',
        max_digits: 15,
    };

    /// Format raw input as a display amount.
    ///
    /// Returns an empty string when the input has no digits at all.
    #[must_use]
    pub fn format(&self, raw: &str) -> String {
        let Some(padded) = self.padded_digits(raw) else {
            return String::new();
        };
        let (int, cents) = padded.split_at(padded.len() - 2);
        format!(
            "{} {}{}{}",
            self.symbol,
            group_thousands(int, self.group),
            self.decimal,
            cents
        )
    }

    /// Strip display formatting, leaving a plain `.`-separated decimal.
    #[must_use]
    pub fn to_decimal(&self, masked: &str) -> String {
        let Some(padded) = self.padded_digits(masked) else {
            return String::new();
        };
        let (int, cents) = padded.split_at(padded.len() - 2);
        format!("{int}.{cents}")
    }

    /// Significant digits, left-padded with zeros to at least three.
    fn padded_digits(&self, raw: &str) -> Option<String> {
        let mut saw_digit = false;
        let significant: String = raw
            .chars()
            .filter(char::is_ascii_digit)
            .inspect(|_| saw_digit = true)
            .skip_while(|&c| c == '0')
            .take(self.max_digits)
            .collect();
        saw_digit.then(|| format!("{significant:0>3}"))
    }
}

fn group_thousands(int: &str, sep: char) -> String {
    let len = int.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in int.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}
