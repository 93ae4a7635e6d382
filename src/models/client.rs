use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::client::{
    Client as DomainClient, ClientPaymentUpdate as DomainClientPaymentUpdate,
    ClientSyncUpdate as DomainClientSyncUpdate, NewClient as DomainNewClient,
    UpdateClient as DomainUpdateClient, Vehicle,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable, QueryableByName)]
#[diesel(table_name = crate::schema::clients)]
/// Diesel model for [`crate::domain::client::Client`].
pub struct Client {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub vehicle_year: Option<i32>,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub issue_description: Option<String>,
    pub procedures: Option<String>,
    pub repair_status: String,
    pub payment_status: String,
    pub partial_payment_amount: f64,
    pub estimated_cost: Option<f64>,
    pub record_state: String,
    pub next_appointment_date: Option<NaiveDateTime>,
    pub last_service_date: Option<NaiveDateTime>,
    pub created_by: i32,
    pub updated_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::clients)]
/// Insertable form of [`Client`].
pub struct NewClient<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub vehicle_year: Option<i32>,
    pub vehicle_make: &'a str,
    pub vehicle_model: &'a str,
    pub issue_description: Option<&'a str>,
    pub repair_status: String,
    pub payment_status: String,
    pub partial_payment_amount: f64,
    pub estimated_cost: Option<f64>,
    pub record_state: String,
    pub created_by: i32,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clients)]
/// Data used for a full-field client update.
pub struct UpdateClient<'a> {
    pub name: &'a str,
    pub email: Option<Option<&'a str>>,
    pub phone: Option<Option<&'a str>>,
    pub address: Option<Option<&'a str>>,
    pub vehicle_year: Option<Option<i32>>,
    pub vehicle_make: &'a str,
    pub vehicle_model: &'a str,
    pub issue_description: Option<Option<&'a str>>,
    pub procedures: Option<Option<&'a str>>,
    pub estimated_cost: Option<Option<f64>>,
    pub updated_by: i32,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clients)]
/// Derived-state changeset applied by the synchronizer or a status change.
pub struct ClientSyncUpdate {
    pub repair_status: Option<String>,
    pub next_appointment_date: Option<Option<NaiveDateTime>>,
    pub last_service_date: Option<NaiveDateTime>,
    pub updated_by: Option<i32>,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clients)]
/// Payment-field changeset applied by the payment service.
pub struct ClientPaymentUpdate {
    pub payment_status: String,
    pub partial_payment_amount: f64,
    pub updated_by: i32,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clients)]
/// Soft-delete / restore changeset.
pub struct RecordStateUpdate {
    pub record_state: String,
    pub updated_by: i32,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Client> for DomainClient {
    type Error = TypeConstraintError;

    fn try_from(client: Client) -> Result<Self, Self::Error> {
        Ok(Self {
            id: client.id,
            name: client.name,
            email: client.email,
            phone: client.phone,
            address: client.address,
            vehicle: Vehicle {
                year: client.vehicle_year,
                make: client.vehicle_make,
                model: client.vehicle_model,
            },
            issue_description: client.issue_description,
            procedures: client.procedures,
            repair_status: client.repair_status.parse()?,
            payment_status: client.payment_status.parse()?,
            partial_payment_amount: client.partial_payment_amount,
            estimated_cost: client.estimated_cost,
            record_state: client.record_state.parse()?,
            next_appointment_date: client.next_appointment_date,
            last_service_date: client.last_service_date,
            created_by: client.created_by,
            updated_by: client.updated_by,
            created_at: client.created_at,
            updated_at: client.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewClient> for NewClient<'a> {
    fn from(client: &'a DomainNewClient) -> Self {
        Self {
            name: client.name.as_str(),
            email: client.email.as_deref(),
            phone: client.phone.as_deref(),
            address: client.address.as_deref(),
            vehicle_year: client.vehicle.year,
            vehicle_make: client.vehicle.make.as_str(),
            vehicle_model: client.vehicle.model.as_str(),
            issue_description: client.issue_description.as_deref(),
            repair_status: crate::domain::client::RepairStatus::default().to_string(),
            payment_status: crate::domain::client::PaymentStatus::default().to_string(),
            partial_payment_amount: 0.0,
            estimated_cost: client.estimated_cost,
            record_state: crate::domain::client::RecordState::default().to_string(),
            created_by: client.created_by,
        }
    }
}

impl<'a> From<&'a DomainUpdateClient> for UpdateClient<'a> {
    fn from(client: &'a DomainUpdateClient) -> Self {
        Self {
            name: client.name.as_str(),
            email: Some(client.email.as_deref()),
            phone: Some(client.phone.as_deref()),
            address: Some(client.address.as_deref()),
            vehicle_year: Some(client.vehicle.year),
            vehicle_make: client.vehicle.make.as_str(),
            vehicle_model: client.vehicle.model.as_str(),
            issue_description: Some(client.issue_description.as_deref()),
            procedures: Some(client.procedures.as_deref()),
            estimated_cost: Some(client.estimated_cost),
            updated_by: client.updated_by,
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl From<&DomainClientSyncUpdate> for ClientSyncUpdate {
    fn from(update: &DomainClientSyncUpdate) -> Self {
        Self {
            repair_status: update.repair_status.map(|s| s.to_string()),
            next_appointment_date: update.next_appointment_date,
            last_service_date: update.last_service_date,
            updated_by: update.updated_by,
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl From<&DomainClientPaymentUpdate> for ClientPaymentUpdate {
    fn from(update: &DomainClientPaymentUpdate) -> Self {
        Self {
            payment_status: update.payment_status.to_string(),
            partial_payment_amount: update.partial_payment_amount,
            updated_by: update.updated_by,
            updated_at: Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::{PaymentStatus, RecordState, RepairStatus};

    #[test]
    fn from_domain_new_creates_newclient() {
        let domain = DomainNewClient::new(
            "Alice".to_string(),
            Some("alice@example.com".to_string()),
            None,
            None,
            Vehicle {
                year: Some(2019),
                make: "Toyota".into(),
                model: "Corolla".into(),
            },
            None,
            Some(1200.0),
            1,
        )
        .unwrap();
        let new: NewClient = (&domain).into();
        assert_eq!(new.name, "Alice");
        assert_eq!(new.repair_status, "waiting");
        assert_eq!(new.payment_status, "not_paid");
        assert_eq!(new.record_state, "active");
        assert_eq!(new.estimated_cost, Some(1200.0));
    }

    #[test]
    fn client_try_into_domain_parses_statuses() {
        let now = Utc::now().naive_utc();
        let db_client = Client {
            id: 1,
            name: "Alice".into(),
            email: None,
            phone: None,
            address: None,
            vehicle_year: Some(2019),
            vehicle_make: "Toyota".into(),
            vehicle_model: "Corolla".into(),
            issue_description: None,
            procedures: None,
            repair_status: "in_progress".into(),
            payment_status: "partial".into(),
            partial_payment_amount: 400.0,
            estimated_cost: Some(1000.0),
            record_state: "active".into(),
            next_appointment_date: None,
            last_service_date: None,
            created_by: 1,
            updated_by: None,
            created_at: now,
            updated_at: now,
        };
        let domain: DomainClient = db_client.try_into().unwrap();
        assert_eq!(domain.repair_status, RepairStatus::InProgress);
        assert_eq!(domain.payment_status, PaymentStatus::Partial);
        assert_eq!(domain.record_state, RecordState::Active);
        assert_eq!(domain.vehicle.info(), "2019 Toyota Corolla");
    }

    #[test]
    fn client_with_unknown_status_is_rejected() {
        let now = Utc::now().naive_utc();
        let db_client = Client {
            id: 1,
            name: "Alice".into(),
            email: None,
            phone: None,
            address: None,
            vehicle_year: None,
            vehicle_make: String::new(),
            vehicle_model: String::new(),
            issue_description: None,
            procedures: None,
            repair_status: "unknown".into(),
            payment_status: "not_paid".into(),
            partial_payment_amount: 0.0,
            estimated_cost: None,
            record_state: "active".into(),
            next_appointment_date: None,
            last_service_date: None,
            created_by: 1,
            updated_by: None,
            created_at: now,
            updated_at: now,
        };
        assert!(DomainClient::try_from(db_client).is_err());
    }
}
