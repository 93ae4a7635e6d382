use actix_web::{HttpResponse, get, post, web};
use validator::Validate;

use crate::domain::user::AuthenticatedUser;
use crate::forms::user::SaveUserPayload;
use crate::repository::DieselRepository;
use crate::routes::reject_invalid;
use crate::services::{ServiceError, user as user_service};

#[get("/users")]
pub async fn list_users(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let users = user_service::list_users(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(users))
}

#[post("/users")]
pub async fn save_user(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(payload): web::Json<SaveUserPayload>,
) -> Result<HttpResponse, ServiceError> {
    reject_invalid(payload.validate())?;

    let new_user = payload.to_new_user()?;
    let saved = user_service::create_or_update_user(repo.get_ref(), &user, new_user)?;
    Ok(HttpResponse::Ok().json(saved))
}
