//! Numeric answer detection and display formatting.

use serde::{Deserialize, Serialize};

/// Result of trying to read an answer text as a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericText<'a> {
    Number(f64),
    Text(&'a str),
}

impl<'a> NumericText<'a> {
    /// Parse `text` as a finite decimal number, ignoring surrounding
    /// whitespace. Anything else is opaque text.
    pub fn parse(text: &'a str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return NumericText::Text(text);
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => NumericText::Number(value),
            _ => NumericText::Text(text),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, NumericText::Number(_))
    }
}

/// Separator convention for formatted numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    pub thousands: char,
    pub decimal: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            thousands: '.',
            decimal: ',',
        }
    }
}

impl NumberFormat {
    /// Format a numeric answer text for display.
    ///
    /// - values `<= 1` and integers below 10000 are returned unchanged
    /// - larger integers get thousands grouping
    /// - non-integers are rounded to 2 decimals, grouped, and use the
    ///   decimal separator
    ///
    /// Non-numeric text is returned unchanged.
    pub fn format(&self, text: &str) -> String {
        let value = match NumericText::parse(text) {
            NumericText::Number(value) => value,
            NumericText::Text(_) => return text.to_string(),
        };

        if value <= 1.0 {
            return text.to_string();
        }

        if value.fract() == 0.0 {
            if value < 10_000.0 {
                return text.to_string();
            }
            return self.group(&format!("{:.0}", value));
        }

        let fixed = fixed_two_places(value);
        let (integer_part, decimal_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        format!("{}{}{}", self.group(integer_part), self.decimal, decimal_part)
    }

    /// Insert the thousands separator into a run of ASCII digits.
    fn group(&self, digits: &str) -> String {
        let len = digits.len();
        let mut out = String::with_capacity(len + len / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(self.thousands);
            }
            out.push(ch);
        }
        out
    }
}

/// Render a positive value with two decimals, rounding exact ties away from
/// zero. `{:.2}` alone would round them to even.
fn fixed_two_places(value: f64) -> String {
    // A value sits exactly between two hundredths only when it is an odd
    // number of eighths.
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths < 1e36 {
        let k = eighths as u128;
        if k % 2 == 1 {
            let hundredths = (25 * k + 1) / 2;
            return format!("{}.{:02}", hundredths / 100, hundredths % 100);
        }
    }
    format!("{:.2}", value)
}

/// Format with the default `.` thousands / `,` decimal convention.
pub fn format_number(text: &str) -> String {
    NumberFormat::default().format(text)
}
