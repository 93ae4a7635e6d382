use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::budget::{
    Budget as DomainBudget, BudgetCategory, NewBudget as DomainNewBudget,
    UpdateBudget as DomainUpdateBudget, derive_status,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::budgets)]
pub struct Budget {
    pub id: i32,
    pub name: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub total: f64,
    pub categories: String, // JSON text in the DB
    pub status: String,
    pub created_by: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::budgets)]
pub struct NewBudget<'a> {
    pub name: &'a str,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub total: f64,
    pub categories: String,
    pub status: String,
    pub created_by: i32,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::budgets)]
pub struct UpdateBudget<'a> {
    pub name: &'a str,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub total: f64,
    pub categories: String,
    pub status: String,
    pub updated_at: NaiveDateTime,
}

fn parse_categories(raw: &str) -> Result<Vec<BudgetCategory>, TypeConstraintError> {
    serde_json::from_str(raw)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("budget categories: {e}")))
}

fn serialize_categories(categories: &[BudgetCategory]) -> String {
    serde_json::to_string(categories).unwrap_or_else(|_| "[]".to_string())
}

impl TryFrom<Budget> for DomainBudget {
    type Error = TypeConstraintError;

    fn try_from(budget: Budget) -> Result<Self, Self::Error> {
        Ok(Self {
            id: budget.id,
            name: budget.name,
            start_date: budget.start_date,
            end_date: budget.end_date,
            total: budget.total,
            categories: parse_categories(&budget.categories)?,
            status: budget.status.parse()?,
            created_by: budget.created_by,
            created_at: budget.created_at,
            updated_at: budget.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewBudget> for NewBudget<'a> {
    fn from(budget: &'a DomainNewBudget) -> Self {
        // Status is derived, never caller-supplied.
        let status = derive_status(budget.start_date, budget.end_date, Utc::now().naive_utc());
        Self {
            name: budget.name.as_str(),
            start_date: budget.start_date,
            end_date: budget.end_date,
            total: budget.total,
            categories: serialize_categories(&budget.categories),
            status: status.to_string(),
            created_by: budget.created_by,
        }
    }
}

impl<'a> From<&'a DomainUpdateBudget> for UpdateBudget<'a> {
    fn from(budget: &'a DomainUpdateBudget) -> Self {
        let status = derive_status(budget.start_date, budget.end_date, Utc::now().naive_utc());
        Self {
            name: budget.name.as_str(),
            start_date: budget.start_date,
            end_date: budget.end_date,
            total: budget.total,
            categories: serialize_categories(&budget.categories),
            status: status.to_string(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}
