use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::Deserialize;
use validator::Validate;

use crate::domain::user::AuthenticatedUser;
use crate::dto::client::ClientResponse;
use crate::forms::client::{CreateClientPayload, RepairStatusPayload, UpdateClientPayload};
use crate::forms::payment::PaymentPayload;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{ClientListQuery, DieselRepository};
use crate::routes::reject_invalid;
use crate::services::{ServiceError, client as client_service, payment as payment_service};

#[derive(Debug, Deserialize)]
struct ClientListParams {
    q: Option<String>,
    page: Option<usize>,
    #[serde(default)]
    include_deleted: bool,
}

#[get("/clients")]
pub async fn list_clients(
    params: web::Query<ClientListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let page = params.page.unwrap_or(1);
    let mut query = ClientListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(q) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        query = query.search(q);
    }
    if params.include_deleted {
        query = query.include_deleted();
    }

    let (total, clients) = client_service::list_clients(repo.get_ref(), &user, query)?;

    let clients = clients
        .into_iter()
        .map(|client| ClientResponse::for_role(client, user.role))
        .collect::<Vec<_>>();
    let page = Paginated::new(clients, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE));
    Ok(HttpResponse::Ok().json(page))
}

#[post("/clients")]
pub async fn create_client(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(payload): web::Json<CreateClientPayload>,
) -> Result<HttpResponse, ServiceError> {
    reject_invalid(payload.validate())?;

    let new_client = payload.to_new_client(user.id)?;
    let client = client_service::create_client(
        repo.get_ref(),
        &user,
        new_client,
        payload.first_appointment_at,
    )?;
    Ok(HttpResponse::Created().json(client))
}

#[get("/clients/{client_id}")]
pub async fn show_client(
    client_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let client = client_service::get_client(repo.get_ref(), &user, client_id.into_inner())?;
    Ok(HttpResponse::Ok().json(ClientResponse::for_role(client, user.role)))
}

#[put("/clients/{client_id}")]
pub async fn save_client(
    client_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(payload): web::Json<UpdateClientPayload>,
) -> Result<HttpResponse, ServiceError> {
    reject_invalid(payload.validate())?;

    let updates = payload.to_update_client(user.id)?;
    let client =
        client_service::update_client(repo.get_ref(), &user, client_id.into_inner(), updates)?;
    Ok(HttpResponse::Ok().json(client))
}

#[patch("/clients/{client_id}/status")]
pub async fn update_client_status(
    client_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(payload): web::Json<RepairStatusPayload>,
) -> Result<HttpResponse, ServiceError> {
    let client = client_service::update_repair_status(
        repo.get_ref(),
        &user,
        client_id.into_inner(),
        payload.repair_status,
    )?;
    Ok(HttpResponse::Ok().json(ClientResponse::for_role(client, user.role)))
}

#[patch("/clients/{client_id}/payment")]
pub async fn update_client_payment(
    client_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(payload): web::Json<PaymentPayload>,
) -> Result<HttpResponse, ServiceError> {
    reject_invalid(payload.validate())?;

    let client = payment_service::update_client_payment(
        repo.get_ref(),
        &user,
        client_id.into_inner(),
        payload.into(),
    )?;
    Ok(HttpResponse::Ok().json(client))
}

#[delete("/clients/{client_id}")]
pub async fn delete_client(
    client_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let client = client_service::delete_client(repo.get_ref(), &user, client_id.into_inner())?;
    Ok(HttpResponse::Ok().json(client))
}

#[post("/clients/{client_id}/restore")]
pub async fn restore_client(
    client_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let client = client_service::restore_client(repo.get_ref(), &user, client_id.into_inner())?;
    Ok(HttpResponse::Ok().json(client))
}
