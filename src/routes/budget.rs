use actix_web::{HttpResponse, delete, get, post, put, web};
use validator::Validate;

use crate::domain::user::AuthenticatedUser;
use crate::forms::budget::BudgetPayload;
use crate::repository::DieselRepository;
use crate::routes::reject_invalid;
use crate::services::{ServiceError, budget as budget_service};

#[get("/budgets")]
pub async fn list_budgets(
    _user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let budgets = budget_service::list_budgets(repo.get_ref())?;
    Ok(HttpResponse::Ok().json(budgets))
}

#[post("/budgets")]
pub async fn create_budget(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(payload): web::Json<BudgetPayload>,
) -> Result<HttpResponse, ServiceError> {
    reject_invalid(payload.validate())?;

    let budget = budget_service::create_budget(repo.get_ref(), &user, payload.to_new_budget(user.id))?;
    Ok(HttpResponse::Created().json(budget))
}

#[get("/budgets/{budget_id}")]
pub async fn show_budget(
    budget_id: web::Path<i32>,
    _user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let budget = budget_service::get_budget(repo.get_ref(), budget_id.into_inner())?;
    Ok(HttpResponse::Ok().json(budget))
}

#[put("/budgets/{budget_id}")]
pub async fn save_budget(
    budget_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(payload): web::Json<BudgetPayload>,
) -> Result<HttpResponse, ServiceError> {
    reject_invalid(payload.validate())?;

    let budget = budget_service::update_budget(
        repo.get_ref(),
        &user,
        budget_id.into_inner(),
        payload.to_update_budget(),
    )?;
    Ok(HttpResponse::Ok().json(budget))
}

#[delete("/budgets/{budget_id}")]
pub async fn delete_budget(
    budget_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    budget_service::delete_budget(repo.get_ref(), &user, budget_id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}
