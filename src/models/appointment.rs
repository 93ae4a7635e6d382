use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::appointment::{
    Appointment as DomainAppointment, AppointmentSyncUpdate as DomainAppointmentSyncUpdate,
    NewAppointment as DomainNewAppointment, UpdateAppointment as DomainUpdateAppointment,
};
use crate::domain::types::TypeConstraintError;
use crate::models::client::Client;

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Client, foreign_key = client_id))]
#[diesel(table_name = crate::schema::appointments)]
pub struct Appointment {
    pub id: i32,
    pub title: String,
    pub scheduled_at: NaiveDateTime,
    pub client_id: Option<i32>,
    pub client_name: Option<String>,
    pub vehicle_info: Option<String>,
    pub kind: String,
    pub status: String,
    pub invoice_id: Option<i32>,
    pub delivery_date: Option<NaiveDateTime>,
    pub created_by: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::appointments)]
pub struct NewAppointment<'a> {
    pub title: &'a str,
    pub scheduled_at: NaiveDateTime,
    pub client_id: Option<i32>,
    pub client_name: Option<&'a str>,
    pub vehicle_info: Option<&'a str>,
    pub kind: String,
    pub status: String,
    pub invoice_id: Option<i32>,
    pub created_by: i32,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::appointments)]
pub struct UpdateAppointment<'a> {
    pub title: &'a str,
    pub scheduled_at: NaiveDateTime,
    pub kind: String,
    pub status: String,
    pub invoice_id: Option<Option<i32>>,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::appointments)]
/// Changeset issued by the synchronizer; only changed fields are present.
pub struct AppointmentSyncUpdate {
    pub client_name: Option<String>,
    pub title: Option<String>,
    pub vehicle_info: Option<String>,
    pub status: Option<String>,
    pub delivery_date: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Appointment> for DomainAppointment {
    type Error = TypeConstraintError;

    fn try_from(appointment: Appointment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: appointment.id,
            title: appointment.title,
            scheduled_at: appointment.scheduled_at,
            client_id: appointment.client_id,
            client_name: appointment.client_name,
            vehicle_info: appointment.vehicle_info,
            kind: appointment.kind.parse()?,
            status: appointment.status.parse()?,
            invoice_id: appointment.invoice_id,
            delivery_date: appointment.delivery_date,
            created_by: appointment.created_by,
            created_at: appointment.created_at,
            updated_at: appointment.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewAppointment> for NewAppointment<'a> {
    fn from(appointment: &'a DomainNewAppointment) -> Self {
        Self {
            title: appointment.title.as_str(),
            scheduled_at: appointment.scheduled_at,
            client_id: appointment.client_id,
            client_name: appointment.client_name.as_deref(),
            vehicle_info: appointment.vehicle_info.as_deref(),
            kind: appointment.kind.to_string(),
            status: appointment.status.to_string(),
            invoice_id: appointment.invoice_id,
            created_by: appointment.created_by,
        }
    }
}

impl<'a> From<&'a DomainUpdateAppointment> for UpdateAppointment<'a> {
    fn from(appointment: &'a DomainUpdateAppointment) -> Self {
        Self {
            title: appointment.title.as_str(),
            scheduled_at: appointment.scheduled_at,
            kind: appointment.kind.to_string(),
            status: appointment.status.to_string(),
            invoice_id: Some(appointment.invoice_id),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl From<&DomainAppointmentSyncUpdate> for AppointmentSyncUpdate {
    fn from(update: &DomainAppointmentSyncUpdate) -> Self {
        Self {
            client_name: update.client_name.clone(),
            title: update.title.clone(),
            vehicle_info: update.vehicle_info.clone(),
            status: update.status.map(|s| s.to_string()),
            delivery_date: update.delivery_date,
            updated_at: Utc::now().naive_utc(),
        }
    }
}
