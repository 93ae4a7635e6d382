use diesel::prelude::*;

use crate::domain::budget::{Budget, NewBudget, UpdateBudget};
use crate::repository::{
    BudgetReader, BudgetWriter, DieselRepository, errors::RepositoryResult,
};

impl BudgetReader for DieselRepository {
    fn get_budget_by_id(&self, id: i32) -> RepositoryResult<Option<Budget>> {
        use crate::models::budget::Budget as DbBudget;
        use crate::schema::budgets;

        let mut conn = self.conn()?;
        let budget = budgets::table
            .find(id)
            .first::<DbBudget>(&mut conn)
            .optional()?;

        budget.map(TryInto::try_into).transpose().map_err(Into::into)
    }

    fn list_budgets(&self) -> RepositoryResult<Vec<Budget>> {
        use crate::models::budget::Budget as DbBudget;
        use crate::schema::budgets;

        let mut conn = self.conn()?;
        budgets::table
            .order(budgets::start_date.desc())
            .load::<DbBudget>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Budget>, _>>()
            .map_err(Into::into)
    }
}

impl BudgetWriter for DieselRepository {
    fn create_budget(&self, new_budget: &NewBudget) -> RepositoryResult<Budget> {
        use crate::models::budget::{Budget as DbBudget, NewBudget as DbNewBudget};
        use crate::schema::budgets;

        let mut conn = self.conn()?;
        let insertable: DbNewBudget = new_budget.into();
        let created = diesel::insert_into(budgets::table)
            .values(&insertable)
            .get_result::<DbBudget>(&mut conn)?;

        created.try_into().map_err(Into::into)
    }

    fn update_budget(&self, budget_id: i32, updates: &UpdateBudget) -> RepositoryResult<Budget> {
        use crate::models::budget::{Budget as DbBudget, UpdateBudget as DbUpdateBudget};
        use crate::schema::budgets;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateBudget = updates.into();

        let updated = diesel::update(budgets::table.find(budget_id))
            .set(&db_updates)
            .get_result::<DbBudget>(&mut conn)?;

        updated.try_into().map_err(Into::into)
    }

    fn delete_budget(&self, budget_id: i32) -> RepositoryResult<()> {
        use crate::schema::budgets;

        let mut conn = self.conn()?;
        diesel::delete(budgets::table.find(budget_id)).execute(&mut conn)?;
        Ok(())
    }
}
