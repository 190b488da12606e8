//! Supported currencies and French-locale amount formatting.

use serde::{Deserialize, Serialize};

/// Currency shown across the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "MGA")]
    Mga,
}

// fr-FR separators: narrow no-break space for thousands, no-break space before the symbol.
const GROUP_SEPARATOR: char = '\u{202F}';
const SYMBOL_SEPARATOR: char = '\u{00A0}';

impl Currency {
    pub const ALL: [Currency; 2] = [Currency::Eur, Currency::Mga];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Mga => "MGA",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "EUR" => Some(Currency::Eur),
            "MGA" => Some(Currency::Mga),
            _ => None,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Mga => "MGA",
        }
    }

    fn fraction_digits(&self) -> usize {
        match self {
            Currency::Eur => 2,
            Currency::Mga => 0,
        }
    }

    /// Formats `amount` the way `fr-FR` displays this currency,
    /// e.g. `1 234,50 €` or `1 235 MGA`.
    pub fn format(&self, amount: f64) -> String {
        let digits = self.fraction_digits();
        let fixed = format!("{:.*}", digits, amount.abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (fixed.as_str(), None),
        };

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, c) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(GROUP_SEPARATOR);
            }
            grouped.push(c);
        }

        let mut out = String::new();
        if amount < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
            out.push('-');
        }
        out.push_str(&grouped);
        if let Some(frac) = frac_part {
            out.push(',');
            out.push_str(frac);
        }
        out.push(SYMBOL_SEPARATOR);
        out.push_str(self.symbol());
        out
    }
}
