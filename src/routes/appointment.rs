use actix_web::{HttpResponse, delete, get, post, put, web};
use validator::Validate;

use crate::domain::user::AuthenticatedUser;
use crate::forms::appointment::{
    AppointmentListParams, CreateAppointmentPayload, UpdateAppointmentPayload,
};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{AppointmentListQuery, DieselRepository};
use crate::routes::reject_invalid;
use crate::services::{ServiceError, appointment as appointment_service, client as client_service};

#[get("/appointments")]
pub async fn list_appointments(
    params: web::Query<AppointmentListParams>,
    _user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let page = params.page.unwrap_or(1);
    let mut query = AppointmentListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(client_id) = params.client_id {
        query = query.client(client_id);
    }
    if let Some(status) = params.status {
        query = query.status(status);
    }
    if let Some(kind) = params.kind {
        query = query.kind(kind);
    }

    let (total, appointments) = appointment_service::list_appointments(repo.get_ref(), query)?;
    let page = Paginated::new(appointments, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE));
    Ok(HttpResponse::Ok().json(page))
}

#[post("/appointments")]
pub async fn create_appointment(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(payload): web::Json<CreateAppointmentPayload>,
) -> Result<HttpResponse, ServiceError> {
    reject_invalid(payload.validate())?;

    let mut new_appointment = payload.to_new_appointment(user.id)?;
    if let Some(client_id) = payload.client_id {
        // Denormalize the linked client's display fields at creation time;
        // the synchronizer keeps them in step afterwards.
        let client = client_service::get_client(repo.get_ref(), &user, client_id)?;
        new_appointment =
            new_appointment.for_client(client.id, &client.name, &client.vehicle.info());
    }

    let appointment =
        appointment_service::create_appointment(repo.get_ref(), &user, new_appointment)?;
    Ok(HttpResponse::Created().json(appointment))
}

#[get("/appointments/{appointment_id}")]
pub async fn show_appointment(
    appointment_id: web::Path<i32>,
    _user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let appointment =
        appointment_service::get_appointment(repo.get_ref(), appointment_id.into_inner())?;
    Ok(HttpResponse::Ok().json(appointment))
}

#[put("/appointments/{appointment_id}")]
pub async fn save_appointment(
    appointment_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(payload): web::Json<UpdateAppointmentPayload>,
) -> Result<HttpResponse, ServiceError> {
    reject_invalid(payload.validate())?;

    let appointment = appointment_service::update_appointment(
        repo.get_ref(),
        &user,
        appointment_id.into_inner(),
        (&payload).into(),
    )?;
    Ok(HttpResponse::Ok().json(appointment))
}

#[delete("/appointments/{appointment_id}")]
pub async fn delete_appointment(
    appointment_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    appointment_service::delete_appointment(repo.get_ref(), &user, appointment_id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}
