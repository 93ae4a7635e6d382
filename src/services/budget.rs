//! Budget business logic. The allocation invariant is checked before any
//! write; the derived status is recomputed on every save inside the model
//! conversion.

use crate::domain::budget::{Budget, NewBudget, UpdateBudget, validate_allocation};
use crate::domain::user::AuthenticatedUser;
use crate::repository::{BudgetReader, BudgetWriter};
use crate::services::{ServiceError, ServiceResult};

pub fn get_budget<R>(repo: &R, budget_id: i32) -> ServiceResult<Budget>
where
    R: BudgetReader + ?Sized,
{
    repo.get_budget_by_id(budget_id)?
        .ok_or(ServiceError::NotFound)
}

pub fn list_budgets<R>(repo: &R) -> ServiceResult<Vec<Budget>>
where
    R: BudgetReader + ?Sized,
{
    repo.list_budgets().map_err(ServiceError::from)
}

pub fn create_budget<R>(
    repo: &R,
    user: &AuthenticatedUser,
    new_budget: NewBudget,
) -> ServiceResult<Budget>
where
    R: BudgetWriter + ?Sized,
{
    if !user.permissions().manage_budgets {
        return Err(ServiceError::Unauthorized);
    }
    if new_budget.end_date < new_budget.start_date {
        return Err(ServiceError::Validation(
            "budget end date precedes its start date".to_string(),
        ));
    }
    validate_allocation(new_budget.total, &new_budget.categories)?;

    repo.create_budget(&new_budget).map_err(ServiceError::from)
}

pub fn update_budget<R>(
    repo: &R,
    user: &AuthenticatedUser,
    budget_id: i32,
    updates: UpdateBudget,
) -> ServiceResult<Budget>
where
    R: BudgetReader + BudgetWriter + ?Sized,
{
    if !user.permissions().manage_budgets {
        return Err(ServiceError::Unauthorized);
    }
    if updates.end_date < updates.start_date {
        return Err(ServiceError::Validation(
            "budget end date precedes its start date".to_string(),
        ));
    }
    validate_allocation(updates.total, &updates.categories)?;

    get_budget(repo, budget_id)?;
    repo.update_budget(budget_id, &updates)
        .map_err(ServiceError::from)
}

pub fn delete_budget<R>(repo: &R, user: &AuthenticatedUser, budget_id: i32) -> ServiceResult<()>
where
    R: BudgetReader + BudgetWriter + ?Sized,
{
    if !user.permissions().delete_records {
        return Err(ServiceError::Unauthorized);
    }
    get_budget(repo, budget_id)?;
    repo.delete_budget(budget_id).map_err(ServiceError::from)
}
