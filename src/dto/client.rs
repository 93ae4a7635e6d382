//! DTOs shaped for the client endpoints.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::client::{Client, RecordState, RepairStatus, Vehicle};

/// Field-reduced projection served to Mechanics: no contact details and no
/// financial fields.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClientWorkshopView {
    pub id: i32,
    pub name: String,
    pub vehicle: Vehicle,
    pub issue_description: Option<String>,
    pub procedures: Option<String>,
    pub repair_status: RepairStatus,
    pub record_state: RecordState,
    pub next_appointment_date: Option<NaiveDateTime>,
    pub last_service_date: Option<NaiveDateTime>,
}

impl From<Client> for ClientWorkshopView {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            name: client.name,
            vehicle: client.vehicle,
            issue_description: client.issue_description,
            procedures: client.procedures,
            repair_status: client.repair_status,
            record_state: client.record_state,
            next_appointment_date: client.next_appointment_date,
            last_service_date: client.last_service_date,
        }
    }
}

/// Either the full record or the workshop projection, decided by the
/// caller's role.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ClientResponse {
    Full(Box<Client>),
    Workshop(ClientWorkshopView),
}

impl ClientResponse {
    pub fn for_role(client: Client, role: crate::domain::user::Role) -> Self {
        match role {
            crate::domain::user::Role::Mechanic => Self::Workshop(client.into()),
            _ => Self::Full(Box::new(client)),
        }
    }
}
