use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

use crate::domain::client::{NewClient, RepairStatus, UpdateClient, Vehicle};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Deserialize, Validate)]
/// Payload for creating a client (intake).
pub struct CreateClientPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub vehicle_year: Option<i32>,
    #[serde(default)]
    pub vehicle_make: String,
    #[serde(default)]
    pub vehicle_model: String,
    pub issue_description: Option<String>,
    #[validate(range(min = 0.0))]
    pub estimated_cost: Option<f64>,
    /// When omitted, the initial appointment is scheduled for "now".
    pub first_appointment_at: Option<NaiveDateTime>,
}

impl CreateClientPayload {
    pub fn to_new_client(&self, created_by: i32) -> Result<NewClient, TypeConstraintError> {
        NewClient::new(
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.address.clone(),
            Vehicle {
                year: self.vehicle_year,
                make: self.vehicle_make.trim().to_string(),
                model: self.vehicle_model.trim().to_string(),
            },
            self.issue_description.clone(),
            self.estimated_cost,
            created_by,
        )
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Payload for a full-field client update.
pub struct UpdateClientPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub vehicle_year: Option<i32>,
    #[serde(default)]
    pub vehicle_make: String,
    #[serde(default)]
    pub vehicle_model: String,
    pub issue_description: Option<String>,
    pub procedures: Option<String>,
    #[validate(range(min = 0.0))]
    pub estimated_cost: Option<f64>,
}

impl UpdateClientPayload {
    pub fn to_update_client(&self, updated_by: i32) -> Result<UpdateClient, TypeConstraintError> {
        UpdateClient::new(
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.address.clone(),
            Vehicle {
                year: self.vehicle_year,
                make: self.vehicle_make.trim().to_string(),
                model: self.vehicle_model.trim().to_string(),
            },
            self.issue_description.clone(),
            self.procedures.clone(),
            self.estimated_cost,
            updated_by,
        )
    }
}

#[derive(Debug, Deserialize)]
/// Payload for the repair-status endpoint. Unknown status strings are
/// rejected during deserialization.
pub struct RepairStatusPayload {
    pub repair_status: RepairStatus,
}
