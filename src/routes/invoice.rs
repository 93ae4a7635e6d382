use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use validator::Validate;

use crate::domain::user::AuthenticatedUser;
use crate::dto::invoice::InvoiceResponse;
use crate::forms::invoice::{
    CreateInvoicePayload, InvoiceListParams, SettleInvoicePayload, UpdateInvoicePayload,
};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{DieselRepository, InvoiceListQuery};
use crate::routes::reject_invalid;
use crate::services::{ServiceError, invoice as invoice_service};

#[get("/invoices")]
pub async fn list_invoices(
    params: web::Query<InvoiceListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let page = params.page.unwrap_or(1);
    let mut query = InvoiceListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(client_id) = params.client_id {
        query = query.client(client_id);
    }
    if let Some(status) = params.status {
        query = query.status(status);
    }

    let (total, invoices) = invoice_service::list_invoices(repo.get_ref(), query)?;
    let invoices = invoices
        .into_iter()
        .map(|invoice| InvoiceResponse::for_role(invoice, user.role))
        .collect::<Vec<_>>();
    let page = Paginated::new(invoices, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE));
    Ok(HttpResponse::Ok().json(page))
}

#[post("/invoices")]
pub async fn create_invoice(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(payload): web::Json<CreateInvoicePayload>,
) -> Result<HttpResponse, ServiceError> {
    reject_invalid(payload.validate())?;

    let new_invoice = payload.to_new_invoice(user.id)?;
    let invoice = invoice_service::create_invoice(repo.get_ref(), &user, new_invoice)?;
    Ok(HttpResponse::Created().json(invoice))
}

#[get("/invoices/{invoice_id}")]
pub async fn show_invoice(
    invoice_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let invoice = invoice_service::get_invoice(repo.get_ref(), invoice_id.into_inner())?;
    Ok(HttpResponse::Ok().json(InvoiceResponse::for_role(invoice, user.role)))
}

#[put("/invoices/{invoice_id}")]
pub async fn save_invoice(
    invoice_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(payload): web::Json<UpdateInvoicePayload>,
) -> Result<HttpResponse, ServiceError> {
    reject_invalid(payload.validate())?;

    let invoice = invoice_service::update_invoice(
        repo.get_ref(),
        &user,
        invoice_id.into_inner(),
        (&payload).into(),
    )?;
    Ok(HttpResponse::Ok().json(invoice))
}

#[patch("/invoices/{invoice_id}/payment")]
pub async fn settle_invoice(
    invoice_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(payload): web::Json<SettleInvoicePayload>,
) -> Result<HttpResponse, ServiceError> {
    let invoice = invoice_service::settle_invoice(
        repo.get_ref(),
        &user,
        invoice_id.into_inner(),
        payload.amount,
        payload.method,
    )?;
    Ok(HttpResponse::Ok().json(invoice))
}

#[delete("/invoices/{invoice_id}")]
pub async fn delete_invoice(
    invoice_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    invoice_service::delete_invoice(repo.get_ref(), &user, invoice_id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}
