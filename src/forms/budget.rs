use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

use crate::domain::budget::{BudgetCategory, NewBudget, UpdateBudget};

#[derive(Debug, Deserialize, Validate)]
pub struct BudgetPayload {
    #[validate(length(min = 1))]
    pub name: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    #[validate(range(min = 0.0))]
    pub total: f64,
    pub categories: Vec<BudgetCategory>,
}

impl BudgetPayload {
    pub fn to_new_budget(&self, created_by: i32) -> NewBudget {
        NewBudget {
            name: self.name.trim().to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
            total: self.total,
            categories: self.categories.clone(),
            created_by,
        }
    }

    pub fn to_update_budget(&self) -> UpdateBudget {
        UpdateBudget {
            name: self.name.trim().to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
            total: self.total,
            categories: self.categories.clone(),
        }
    }
}
