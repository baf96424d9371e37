use std::fmt;

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Money as signed **integer minor units** (cents).
///
/// Expense amounts, shares, budgets and balances all use this type, so a
/// split can always be checked to add up to the cent. Balances go negative
/// when a traveller owes money; amounts and shares are validated to be
/// non-negative where they enter the engine.
///
/// There are no arithmetic operators: every sum goes through
/// [`MoneyCents::checked_add`], [`MoneyCents::checked_sub`] or
/// [`MoneyCents::checked_sum`], so overflowing totals surface as
/// [`EngineError::InvalidAmount`].
///
/// ```rust
/// use engine::MoneyCents;
///
/// let dinner = MoneyCents::new(99_99);
/// assert_eq!(dinner.to_string(), "99.99");
/// assert_eq!(dinner.checked_sub(MoneyCents::new(1)), Some(MoneyCents::new(99_98)));
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    #[must_use]
    pub fn checked_sub(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_sub(rhs.0).map(MoneyCents)
    }

    /// [`checked_add`](Self::checked_add) with the engine's overflow error.
    pub fn try_add(self, rhs: MoneyCents) -> Result<MoneyCents, EngineError> {
        self.checked_add(rhs).ok_or_else(overflow)
    }

    /// [`checked_sub`](Self::checked_sub) with the engine's overflow error.
    pub fn try_sub(self, rhs: MoneyCents) -> Result<MoneyCents, EngineError> {
        self.checked_sub(rhs).ok_or_else(overflow)
    }

    /// Sums `values`, failing with [`EngineError::InvalidAmount`] on overflow.
    pub fn checked_sum<I>(values: I) -> Result<MoneyCents, EngineError>
    where
        I: IntoIterator<Item = MoneyCents>,
    {
        values
            .into_iter()
            .try_fold(MoneyCents::ZERO, |acc, value| acc.try_add(value))
    }
}

fn overflow() -> EngineError {
    EngineError::InvalidAmount("amount too large".to_string())
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.0.unsigned_abs();
        if self.0 < 0 {
            write!(f, "-")?;
        }
        write!(f, "{}.{:02}", abs / 100, abs % 100)
    }
}
