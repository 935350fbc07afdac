//! Display text for packages, line items, and money.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// A dollar amount as the site shows it: `$` followed by two decimals.
///
/// Prices are plain floats (no minor-unit scaling); rounding happens only
/// when the amount is formatted.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(f64);

impl Money {
    /// Zero dollars
    pub const ZERO: Self = Self(0.0);

    /// Wraps a dollar amount
    #[must_use]
    pub const fn new(amount: f64) -> Self {
        Self(amount)
    }

    /// Returns the raw amount
    #[must_use]
    pub const fn amount(self) -> f64 {
        self.0
    }

    /// Multiplies a unit price by a quantity
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * f64::from(quantity))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

/// Turns a package identifier into its display name.
///
/// Hyphens become spaces and the first character of every word is
/// upper-cased, so `"premium-package"` reads `"Premium Package"`. Word
/// characters are ASCII letters, digits, and `_`.
#[must_use]
pub fn package_display_name(package_type: &str) -> String {
    let mut name = String::with_capacity(package_type.len());
    let mut previous_is_word = false;

    for c in package_type.chars() {
        let c = if c == '-' { ' ' } else { c };
        let is_word = c.is_ascii_alphanumeric() || c == '_';
        if is_word && !previous_is_word {
            name.push(c.to_ascii_uppercase());
        } else {
            name.push(c);
        }
        previous_is_word = is_word;
    }

    name
}

/// Whether the reviews label already describes a plan rather than a count.
fn is_plan_label(reviews: &str) -> bool {
    reviews.contains("month") || reviews.contains("custom")
}

/// Full label for a line item, e.g. `"10 Reviews (Basic Package)"`.
///
/// Monthly and custom plans omit the `Reviews` word:
/// `"3 months (Monthly Plan)"`.
#[must_use]
pub fn item_label(reviews: &str, package_type: &str) -> String {
    let name = package_display_name(package_type);
    if is_plan_label(reviews) {
        format!("{reviews} ({name})")
    } else {
        format!("{reviews} Reviews ({name})")
    }
}
