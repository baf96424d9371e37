//! Split allocation.
//!
//! [`allocate`] turns an expense amount, a [`SplitMethod`] and the ordered
//! list of participants into one [`Share`] per participant. The returned
//! shares always sum to the amount **exactly**: equal splits are computed on
//! integer cents and the leftover cents go to the first participants in the
//! order supplied.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, ResultEngine};

/// The amount one participant owes for one expense.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub user_id: String,
    pub amount: MoneyCents,
}

impl Share {
    pub fn new(user_id: impl Into<String>, amount: MoneyCents) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
        }
    }
}

/// Policy for dividing an expense among its participants.
///
/// Custom amounts only exist on the `Custom` variant, so an "equal" split can
/// never carry stale per-user amounts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "shares", rename_all = "snake_case")]
pub enum SplitMethod {
    Equal,
    Custom(Vec<Share>),
}

impl SplitMethod {
    pub fn kind(&self) -> SplitKind {
        match self {
            Self::Equal => SplitKind::Equal,
            Self::Custom(_) => SplitKind::Custom,
        }
    }
}

/// Storage tag of a [`SplitMethod`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitKind {
    Equal,
    Custom,
}

impl SplitKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Custom => "custom",
        }
    }
}

impl TryFrom<&str> for SplitKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "equal" => Ok(Self::Equal),
            "custom" => Ok(Self::Custom),
            other => Err(EngineError::InvalidSplit(format!(
                "invalid split method: {other}"
            ))),
        }
    }
}

/// Allocates `amount` across `participants`.
///
/// Output order follows `participants`. No partial result is returned on
/// error.
pub fn allocate(
    amount: MoneyCents,
    method: &SplitMethod,
    participants: &[String],
) -> ResultEngine<Vec<Share>> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(
            "amount must be > 0".to_string(),
        ));
    }
    if participants.is_empty() {
        return Err(EngineError::InvalidSplit(
            "at least one participant is required".to_string(),
        ));
    }
    let mut seen: HashSet<&str> = HashSet::with_capacity(participants.len());
    for user_id in participants {
        if user_id.trim().is_empty() {
            return Err(EngineError::InvalidSplit(
                "participant id must not be empty".to_string(),
            ));
        }
        if !seen.insert(user_id.as_str()) {
            return Err(EngineError::InvalidSplit(format!(
                "participant '{user_id}' listed more than once"
            )));
        }
    }

    let shares = match method {
        SplitMethod::Equal => allocate_equal(amount, participants)?,
        SplitMethod::Custom(entries) => allocate_custom(amount, entries, participants)?,
    };
    tracing::debug!(
        amount = amount.cents(),
        participants = participants.len(),
        method = method.kind().as_str(),
        "allocated shares"
    );
    Ok(shares)
}

fn allocate_equal(amount: MoneyCents, participants: &[String]) -> ResultEngine<Vec<Share>> {
    let count = i64::try_from(participants.len())
        .map_err(|_| EngineError::InvalidSplit("too many participants".to_string()))?;
    let total = amount.cents();
    let base = total / count;
    let remainder = usize::try_from(total - base * count)
        .map_err(|_| EngineError::InvalidAmount("invalid amount".to_string()))?;

    Ok(participants
        .iter()
        .enumerate()
        .map(|(idx, user_id)| {
            let cents = if idx < remainder { base + 1 } else { base };
            Share::new(user_id.clone(), MoneyCents::new(cents))
        })
        .collect())
}

fn allocate_custom(
    amount: MoneyCents,
    entries: &[Share],
    participants: &[String],
) -> ResultEngine<Vec<Share>> {
    if entries.len() != participants.len() {
        return Err(EngineError::InvalidSplit(format!(
            "expected {} custom entries, got {}",
            participants.len(),
            entries.len()
        )));
    }

    let mut shares = Vec::with_capacity(participants.len());
    for user_id in participants {
        let mut matching = entries.iter().filter(|entry| &entry.user_id == user_id);
        let entry = matching.next().ok_or_else(|| {
            EngineError::InvalidSplit(format!("missing custom amount for '{user_id}'"))
        })?;
        if matching.next().is_some() {
            return Err(EngineError::InvalidSplit(format!(
                "custom amount for '{user_id}' listed more than once"
            )));
        }
        if entry.amount.is_negative() {
            return Err(EngineError::InvalidSplit(format!(
                "custom amount for '{user_id}' must be >= 0"
            )));
        }
        shares.push(Share::new(user_id.clone(), entry.amount));
    }

    // Entries and participants have the same length and every participant
    // matched exactly one entry, so there are no extras left over.
    let sum = MoneyCents::checked_sum(shares.iter().map(|share| share.amount))?;
    if sum != amount {
        return Err(EngineError::InvalidSplit(format!(
            "custom amounts sum to {sum}, expected {amount}"
        )));
    }
    Ok(shares)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    fn total(shares: &[Share]) -> i64 {
        shares.iter().map(|s| s.amount.cents()).sum()
    }

    #[test]
    fn equal_split_hands_remainder_to_first_participants() {
        let shares = allocate(
            MoneyCents::new(10_000),
            &SplitMethod::Equal,
            &users(&["a", "b", "c"]),
        )
        .unwrap();
        let cents: Vec<i64> = shares.iter().map(|s| s.amount.cents()).collect();
        assert_eq!(cents, vec![3334, 3333, 3333]);
        assert_eq!(total(&shares), 10_000);
    }

    #[test]
    fn equal_split_divisible_amount() {
        let shares = allocate(
            MoneyCents::new(9999),
            &SplitMethod::Equal,
            &users(&["u1", "u2", "u3"]),
        )
        .unwrap();
        assert!(shares.iter().all(|s| s.amount.cents() == 3333));
    }

    #[test]
    fn equal_split_sums_exactly_for_many_shapes() {
        let ids: Vec<String> = (0..37).map(|i| format!("user{i}")).collect();
        for amount in [1, 2, 7, 99, 100, 101, 9_999, 10_000, 123_457, 1_000_000_001] {
            for n in 1..=ids.len() {
                let shares =
                    allocate(MoneyCents::new(amount), &SplitMethod::Equal, &ids[..n]).unwrap();
                assert_eq!(shares.len(), n);
                assert_eq!(total(&shares), amount, "amount={amount} n={n}");
                let max = shares.iter().map(|s| s.amount.cents()).max().unwrap();
                let min = shares.iter().map(|s| s.amount.cents()).min().unwrap();
                assert!(max - min <= 1);
            }
        }
    }

    #[test]
    fn equal_split_smaller_than_participants() {
        let shares =
            allocate(MoneyCents::new(2), &SplitMethod::Equal, &users(&["a", "b", "c"])).unwrap();
        let cents: Vec<i64> = shares.iter().map(|s| s.amount.cents()).collect();
        assert_eq!(cents, vec![1, 1, 0]);
    }

    #[test]
    fn custom_split_must_match_amount() {
        let method = SplitMethod::Custom(vec![
            Share::new("a", MoneyCents::new(6000)),
            Share::new("b", MoneyCents::new(3000)),
        ]);
        let err = allocate(MoneyCents::new(10_000), &method, &users(&["a", "b"])).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSplit(_)));
    }

    #[test]
    fn custom_split_off_by_one_cent_is_rejected() {
        let method = SplitMethod::Custom(vec![
            Share::new("a", MoneyCents::new(5000)),
            Share::new("b", MoneyCents::new(4999)),
        ]);
        assert!(allocate(MoneyCents::new(10_000), &method, &users(&["a", "b"])).is_err());
    }

    #[test]
    fn custom_split_follows_participant_order() {
        let method = SplitMethod::Custom(vec![
            Share::new("b", MoneyCents::new(2500)),
            Share::new("a", MoneyCents::new(7500)),
        ]);
        let shares = allocate(MoneyCents::new(10_000), &method, &users(&["a", "b"])).unwrap();
        assert_eq!(
            shares,
            vec![
                Share::new("a", MoneyCents::new(7500)),
                Share::new("b", MoneyCents::new(2500)),
            ]
        );
    }

    #[test]
    fn custom_split_rejects_missing_extra_and_duplicate_entries() {
        let participants = users(&["a", "b"]);

        let missing = SplitMethod::Custom(vec![Share::new("a", MoneyCents::new(100))]);
        assert!(allocate(MoneyCents::new(100), &missing, &participants).is_err());

        let extra = SplitMethod::Custom(vec![
            Share::new("a", MoneyCents::new(50)),
            Share::new("c", MoneyCents::new(50)),
        ]);
        assert!(allocate(MoneyCents::new(100), &extra, &participants).is_err());

        let duplicate = SplitMethod::Custom(vec![
            Share::new("a", MoneyCents::new(50)),
            Share::new("a", MoneyCents::new(50)),
        ]);
        assert!(allocate(MoneyCents::new(100), &duplicate, &participants).is_err());
    }

    #[test]
    fn custom_split_rejects_negative_amounts() {
        let method = SplitMethod::Custom(vec![
            Share::new("a", MoneyCents::new(150)),
            Share::new("b", MoneyCents::new(-50)),
        ]);
        assert!(allocate(MoneyCents::new(100), &method, &users(&["a", "b"])).is_err());
    }

    #[test]
    fn rejects_empty_or_duplicate_participants() {
        assert!(allocate(MoneyCents::new(100), &SplitMethod::Equal, &[]).is_err());
        assert!(allocate(MoneyCents::new(100), &SplitMethod::Equal, &users(&["a", "a"])).is_err());
    }

    #[test]
    fn rejects_non_positive_amount() {
        assert!(allocate(MoneyCents::ZERO, &SplitMethod::Equal, &users(&["a"])).is_err());
        assert!(allocate(MoneyCents::new(-5), &SplitMethod::Equal, &users(&["a"])).is_err());
    }

    #[test]
    fn split_kind_round_trips_storage_tag() {
        assert_eq!(SplitKind::try_from("equal").unwrap(), SplitKind::Equal);
        assert_eq!(SplitKind::try_from("custom").unwrap(), SplitKind::Custom);
        assert!(SplitKind::try_from("weighted").is_err());
        assert_eq!(SplitMethod::Equal.kind().as_str(), "equal");
    }
}
