use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{TypeConstraintError, status_enum_strings};

/// Allocation sums are compared with this tolerance; amounts are plain
/// floats, matching the rest of the money handling in the application.
pub const ALLOCATION_TOLERANCE: f64 = 0.01;

/// Derived purely from the current date vs the budget's date range and
/// recomputed on every save.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    #[default]
    Upcoming,
    Active,
    Expired,
}

status_enum_strings!(BudgetStatus {
    Upcoming => "upcoming",
    Active => "active",
    Expired => "expired",
});

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BudgetCategory {
    pub name: String,
    pub allocated: f64,
    #[serde(default)]
    pub spent: f64,
}

/// A named allocation envelope over a date range.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: i32,
    pub name: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub total: f64,
    pub categories: Vec<BudgetCategory>,
    pub status: BudgetStatus,
    pub created_by: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewBudget {
    pub name: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub total: f64,
    pub categories: Vec<BudgetCategory>,
    pub created_by: i32,
}

#[derive(Clone, Debug)]
pub struct UpdateBudget {
    pub name: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub total: f64,
    pub categories: Vec<BudgetCategory>,
}

/// Rejects category allocations that do not add up to the budget total.
pub fn validate_allocation(
    total: f64,
    categories: &[BudgetCategory],
) -> Result<(), TypeConstraintError> {
    let allocated: f64 = categories.iter().map(|c| c.allocated).sum();
    if (allocated - total).abs() > ALLOCATION_TOLERANCE {
        return Err(TypeConstraintError::InvalidValue(format!(
            "category allocations ({allocated:.2}) do not match budget total ({total:.2})"
        )));
    }
    Ok(())
}

/// Recomputes the derived status for the given instant.
pub fn derive_status(start: NaiveDateTime, end: NaiveDateTime, now: NaiveDateTime) -> BudgetStatus {
    if now < start {
        BudgetStatus::Upcoming
    } else if now > end {
        BudgetStatus::Expired
    } else {
        BudgetStatus::Active
    }
}
