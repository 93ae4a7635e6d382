use actix_web::{HttpResponse, get, web};

use crate::domain::user::AuthenticatedUser;
use crate::forms::payment::PaymentListParams;
use crate::repository::{DieselRepository, PaymentListQuery};
use crate::services::{ServiceError, payment as payment_service};

#[get("/payments")]
pub async fn list_payments(
    params: web::Query<PaymentListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let mut query = PaymentListQuery::new();
    if let Some(client_id) = params.client_id {
        query = query.client(client_id);
    }
    if let Some(method) = params.method {
        query = query.method(method);
    }
    if let Some(status) = params.status {
        query = query.status(status);
    }
    if let (Some(from), Some(to)) = (params.from, params.to) {
        query = query.between(from, to);
    }
    if let Some(limit) = params.limit {
        query = query.limit(limit);
    }

    let payments = payment_service::list_payments(repo.get_ref(), &user, query)?;
    Ok(HttpResponse::Ok().json(payments))
}
