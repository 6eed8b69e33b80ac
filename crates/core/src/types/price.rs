//! Display wrapper for monetary amounts.
//!
//! The backend computes every price, subtotal and total and sends them as
//! decimal strings in Brazilian reais. The client never does arithmetic on
//! them; it only formats them.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// An amount in reais, formatted as `R$ 12.50`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Currency symbol used when formatting.
    pub const SYMBOL: &'static str = "R$";

    /// Wrap a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The raw amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "{} {rounded:.2}", Self::SYMBOL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_two_places() {
        assert_eq!(Price::new(Decimal::new(125, 1)).to_string(), "R$ 12.50");
        assert_eq!(Price::new(Decimal::from(3)).to_string(), "R$ 3.00");
    }

    #[test]
    fn test_display_rounds_extra_places() {
        assert_eq!(Price::new(Decimal::new(19_995, 3)).to_string(), "R$ 20.00");
    }
}
