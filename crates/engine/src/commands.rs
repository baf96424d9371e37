//! Command structs for engine operations.
//!
//! These types group parameters for write operations (create/update expense,
//! upsert budget), keeping call sites readable and avoiding long argument
//! lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{CategoryBudget, MoneyCents, Share, SplitKind, SplitMethod};

/// Record a new expense in a travel.
#[derive(Clone, Debug)]
pub struct CreateExpenseCmd {
    pub travel_id: String,
    /// Requesting user; becomes `created_by`.
    pub user_id: String,
    pub amount: MoneyCents,
    pub title: String,
    pub category_id: String,
    pub paid_by: String,
    pub participants: Vec<String>,
    pub split: SplitMethod,
    pub date: DateTime<Utc>,
    pub memo: Option<String>,
    pub receipt_image: Option<String>,
    pub itinerary_item_id: Option<String>,
}

impl CreateExpenseCmd {
    /// An equal split paid by `paid_by` with no participants yet.
    #[must_use]
    pub fn new(
        travel_id: impl Into<String>,
        user_id: impl Into<String>,
        amount: MoneyCents,
        title: impl Into<String>,
        category_id: impl Into<String>,
        paid_by: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            travel_id: travel_id.into(),
            user_id: user_id.into(),
            amount,
            title: title.into(),
            category_id: category_id.into(),
            paid_by: paid_by.into(),
            participants: Vec::new(),
            split: SplitMethod::Equal,
            date,
            memo: None,
            receipt_image: None,
            itinerary_item_id: None,
        }
    }

    #[must_use]
    pub fn participants<I, S>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participants = participants.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn split(mut self, split: SplitMethod) -> Self {
        self.split = split;
        self
    }

    #[must_use]
    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    #[must_use]
    pub fn receipt_image(mut self, reference: impl Into<String>) -> Self {
        self.receipt_image = Some(reference.into());
        self
    }

    #[must_use]
    pub fn itinerary_item_id(mut self, item_id: impl Into<String>) -> Self {
        self.itinerary_item_id = Some(item_id.into());
        self
    }
}

/// Update an existing expense. `None` fields keep the stored value.
///
/// Supplying any of `amount`, `split_kind`, `participants` or `custom_shares`
/// re-allocates the splits from the merged values.
#[derive(Clone, Debug)]
pub struct UpdateExpenseCmd {
    pub expense_id: Uuid,
    pub user_id: String,

    pub amount: Option<MoneyCents>,
    pub title: Option<String>,
    pub category_id: Option<String>,
    pub paid_by: Option<String>,
    pub participants: Option<Vec<String>>,
    pub split_kind: Option<SplitKind>,
    pub custom_shares: Option<Vec<Share>>,
    pub date: Option<DateTime<Utc>>,

    // `Some(None)` clears the stored value.
    pub memo: Option<Option<String>>,
    pub receipt_image: Option<Option<String>>,
    pub itinerary_item_id: Option<Option<String>>,
}

impl UpdateExpenseCmd {
    #[must_use]
    pub fn new(expense_id: Uuid, user_id: impl Into<String>) -> Self {
        Self {
            expense_id,
            user_id: user_id.into(),
            amount: None,
            title: None,
            category_id: None,
            paid_by: None,
            participants: None,
            split_kind: None,
            custom_shares: None,
            date: None,
            memo: None,
            receipt_image: None,
            itinerary_item_id: None,
        }
    }

    #[must_use]
    pub fn amount(mut self, amount: MoneyCents) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    #[must_use]
    pub fn paid_by(mut self, paid_by: impl Into<String>) -> Self {
        self.paid_by = Some(paid_by.into());
        self
    }

    #[must_use]
    pub fn participants<I, S>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participants = Some(participants.into_iter().map(Into::into).collect());
        self
    }

    /// Switch to `split`; a custom split carries its own entries.
    #[must_use]
    pub fn split(mut self, split: SplitMethod) -> Self {
        self.split_kind = Some(split.kind());
        if let SplitMethod::Custom(shares) = split {
            self.custom_shares = Some(shares);
        }
        self
    }

    #[must_use]
    pub fn split_kind(mut self, kind: SplitKind) -> Self {
        self.split_kind = Some(kind);
        self
    }

    #[must_use]
    pub fn custom_shares(mut self, shares: Vec<Share>) -> Self {
        self.custom_shares = Some(shares);
        self
    }

    #[must_use]
    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn memo(mut self, memo: Option<String>) -> Self {
        self.memo = Some(memo);
        self
    }

    #[must_use]
    pub fn receipt_image(mut self, reference: Option<String>) -> Self {
        self.receipt_image = Some(reference);
        self
    }

    #[must_use]
    pub fn itinerary_item_id(mut self, item_id: Option<String>) -> Self {
        self.itinerary_item_id = Some(item_id);
        self
    }

    /// `true` if the splits must be re-allocated.
    pub fn touches_split(&self) -> bool {
        self.amount.is_some()
            || self.split_kind.is_some()
            || self.participants.is_some()
            || self.custom_shares.is_some()
    }
}

/// Create or update the budget of a travel.
#[derive(Clone, Debug)]
pub struct UpsertBudgetCmd {
    pub travel_id: String,
    pub user_id: String,
    /// `None` keeps the stored total (or leaves it unset on create).
    pub total_budget: Option<MoneyCents>,
    /// `Some` replaces every stored category cap.
    pub category_budgets: Option<Vec<CategoryBudget>>,
}

impl UpsertBudgetCmd {
    #[must_use]
    pub fn new(travel_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            travel_id: travel_id.into(),
            user_id: user_id.into(),
            total_budget: None,
            category_budgets: None,
        }
    }

    #[must_use]
    pub fn total_budget(mut self, total: MoneyCents) -> Self {
        self.total_budget = Some(total);
        self
    }

    #[must_use]
    pub fn category_budgets(mut self, rows: Vec<CategoryBudget>) -> Self {
        self.category_budgets = Some(rows);
        self
    }
}
