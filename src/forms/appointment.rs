use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

use crate::domain::appointment::{
    AppointmentKind, AppointmentStatus, NewAppointment, UpdateAppointment,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAppointmentPayload {
    #[validate(length(min = 1))]
    pub title: String,
    pub scheduled_at: NaiveDateTime,
    pub client_id: Option<i32>,
    #[serde(default)]
    pub kind: AppointmentKind,
    #[serde(default)]
    pub status: AppointmentStatus,
    pub invoice_id: Option<i32>,
}

impl CreateAppointmentPayload {
    /// Builds the unlinked appointment; the handler attaches the client
    /// denormalization when `client_id` is present.
    pub fn to_new_appointment(&self, created_by: i32) -> Result<NewAppointment, TypeConstraintError> {
        let mut appointment = NewAppointment::new(
            self.title.clone(),
            self.scheduled_at,
            self.kind,
            self.status,
            created_by,
        )?;
        appointment.invoice_id = self.invoice_id;
        Ok(appointment)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAppointmentPayload {
    #[validate(length(min = 1))]
    pub title: String,
    pub scheduled_at: NaiveDateTime,
    pub kind: AppointmentKind,
    pub status: AppointmentStatus,
    pub invoice_id: Option<i32>,
}

impl From<&UpdateAppointmentPayload> for UpdateAppointment {
    fn from(payload: &UpdateAppointmentPayload) -> Self {
        Self {
            title: payload.title.trim().to_string(),
            scheduled_at: payload.scheduled_at,
            kind: payload.kind,
            status: payload.status,
            invoice_id: payload.invoice_id,
        }
    }
}

#[derive(Debug, Deserialize)]
/// Optional filters accepted by the appointment list endpoint.
pub struct AppointmentListParams {
    pub client_id: Option<i32>,
    pub status: Option<AppointmentStatus>,
    pub kind: Option<AppointmentKind>,
    pub page: Option<usize>,
}
