use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{NonEmptyString, TypeConstraintError, status_enum_strings};

/// What kind of shop visit the appointment covers.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentKind {
    #[default]
    Repair,
    Maintenance,
    Inspection,
    Invoice,
    Delivery,
    Documentation,
}

status_enum_strings!(AppointmentKind {
    Repair => "repair",
    Maintenance => "maintenance",
    Inspection => "inspection",
    Invoice => "invoice",
    Delivery => "delivery",
    Documentation => "documentation",
});

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Waiting,
}

status_enum_strings!(AppointmentStatus {
    Scheduled => "scheduled",
    InProgress => "in_progress",
    Completed => "completed",
    Cancelled => "cancelled",
    Waiting => "waiting",
});

/// A scheduled service event, optionally linked to a client.
///
/// `client_name` and `vehicle_info` are denormalized copies kept in step with
/// the linked client by the synchronizer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Appointment {
    pub id: i32,
    pub title: String,
    pub scheduled_at: NaiveDateTime,
    pub client_id: Option<i32>,
    pub client_name: Option<String>,
    pub vehicle_info: Option<String>,
    pub kind: AppointmentKind,
    pub status: AppointmentStatus,
    pub invoice_id: Option<i32>,
    pub delivery_date: Option<NaiveDateTime>,
    pub created_by: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewAppointment {
    pub title: String,
    pub scheduled_at: NaiveDateTime,
    pub client_id: Option<i32>,
    pub client_name: Option<String>,
    pub vehicle_info: Option<String>,
    pub kind: AppointmentKind,
    pub status: AppointmentStatus,
    pub invoice_id: Option<i32>,
    pub created_by: i32,
}

impl NewAppointment {
    pub fn new(
        title: String,
        scheduled_at: NaiveDateTime,
        kind: AppointmentKind,
        status: AppointmentStatus,
        created_by: i32,
    ) -> Result<Self, TypeConstraintError> {
        let title = NonEmptyString::new(title)?;
        Ok(Self {
            title: title.into_inner(),
            scheduled_at,
            client_id: None,
            client_name: None,
            vehicle_info: None,
            kind,
            status,
            invoice_id: None,
            created_by,
        })
    }

    /// Links the appointment to a client, denormalizing its display fields.
    pub fn for_client(mut self, client_id: i32, client_name: &str, vehicle_info: &str) -> Self {
        self.client_id = Some(client_id);
        self.client_name = Some(client_name.to_string());
        self.vehicle_info = Some(vehicle_info.to_string())
            .filter(|s| !s.is_empty());
        self
    }
}

/// Caller-facing appointment update. Any authenticated role may perform it.
#[derive(Clone, Debug)]
pub struct UpdateAppointment {
    pub title: String,
    pub scheduled_at: NaiveDateTime,
    pub kind: AppointmentKind,
    pub status: AppointmentStatus,
    pub invoice_id: Option<i32>,
}

/// Derived-state write applied to an appointment by the synchronizer after a
/// client mutation. `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppointmentSyncUpdate {
    pub client_name: Option<String>,
    pub title: Option<String>,
    pub vehicle_info: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub delivery_date: Option<NaiveDateTime>,
}

impl AppointmentSyncUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
