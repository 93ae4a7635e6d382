use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    TypeConstraintError, normalize_email, normalize_phone_lenient, sanitize_free_text,
    status_enum_strings,
};

/// Lifecycle stage of a vehicle's repair case.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RepairStatus {
    #[default]
    Waiting,
    InProgress,
    Completed,
    Delivered,
    Cancelled,
}

status_enum_strings!(RepairStatus {
    Waiting => "waiting",
    InProgress => "in_progress",
    Completed => "completed",
    Delivered => "delivered",
    Cancelled => "cancelled",
});

/// Settlement state of the client's bill.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    NotPaid,
    Partial,
    Paid,
}

status_enum_strings!(PaymentStatus {
    NotPaid => "not_paid",
    Partial => "partial",
    Paid => "paid",
});

/// Soft-delete tag. Deleted clients are kept for audit history and can be
/// restored; every listing query filters on this explicitly.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordState {
    #[default]
    Active,
    Deleted,
}

status_enum_strings!(RecordState {
    Active => "active",
    Deleted => "deleted",
});

/// Vehicle descriptor attached to a repair case.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Vehicle {
    pub year: Option<i32>,
    pub make: String,
    pub model: String,
}

impl Vehicle {
    /// Denormalized one-line descriptor propagated onto appointments.
    pub fn info(&self) -> String {
        let year = self.year.map(|y| y.to_string()).unwrap_or_default();
        format!("{} {} {}", year, self.make, self.model)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A vehicle-owner's active repair case.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Client {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub vehicle: Vehicle,
    pub issue_description: Option<String>,
    pub procedures: Option<String>,
    pub repair_status: RepairStatus,
    pub payment_status: PaymentStatus,
    pub partial_payment_amount: f64,
    pub estimated_cost: Option<f64>,
    pub record_state: RecordState,
    pub next_appointment_date: Option<NaiveDateTime>,
    pub last_service_date: Option<NaiveDateTime>,
    pub created_by: i32,
    pub updated_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewClient {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub vehicle: Vehicle,
    pub issue_description: Option<String>,
    pub estimated_cost: Option<f64>,
    pub created_by: i32,
}

impl NewClient {
    /// Builds an intake record with contact details normalized.
    pub fn new(
        name: String,
        email: Option<String>,
        phone: Option<String>,
        address: Option<String>,
        vehicle: Vehicle,
        issue_description: Option<String>,
        estimated_cost: Option<f64>,
        created_by: i32,
    ) -> Result<Self, TypeConstraintError> {
        let email = email
            .filter(|s| !s.trim().is_empty())
            .map(normalize_email)
            .transpose()?;
        Ok(Self {
            name: name.trim().to_string(),
            email,
            phone: phone.as_deref().and_then(normalize_phone_lenient),
            address: address
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            vehicle,
            issue_description: issue_description.and_then(sanitize_free_text),
            estimated_cost,
            created_by,
        })
    }
}

/// Full-field update performed by Admin/Accountant. Status and payment
/// changes go through their own operations.
#[derive(Clone, Debug)]
pub struct UpdateClient {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub vehicle: Vehicle,
    pub issue_description: Option<String>,
    pub procedures: Option<String>,
    pub estimated_cost: Option<f64>,
    pub updated_by: i32,
}

impl UpdateClient {
    pub fn new(
        name: String,
        email: Option<String>,
        phone: Option<String>,
        address: Option<String>,
        vehicle: Vehicle,
        issue_description: Option<String>,
        procedures: Option<String>,
        estimated_cost: Option<f64>,
        updated_by: i32,
    ) -> Result<Self, TypeConstraintError> {
        let email = email
            .filter(|s| !s.trim().is_empty())
            .map(normalize_email)
            .transpose()?;
        Ok(Self {
            name: name.trim().to_string(),
            email,
            phone: phone.as_deref().and_then(normalize_phone_lenient),
            address: address
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            vehicle,
            issue_description: issue_description.and_then(sanitize_free_text),
            procedures: procedures.and_then(sanitize_free_text),
            estimated_cost,
            updated_by,
        })
    }
}

/// Derived-state write applied to a client, either as the primary write of a
/// status-change request or as a propagation from one of its appointments.
/// `None` fields are left untouched; the nested `Option` clears the column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClientSyncUpdate {
    pub repair_status: Option<RepairStatus>,
    pub next_appointment_date: Option<Option<NaiveDateTime>>,
    pub last_service_date: Option<NaiveDateTime>,
    pub updated_by: Option<i32>,
}

impl ClientSyncUpdate {
    pub fn is_empty(&self) -> bool {
        self.repair_status.is_none()
            && self.next_appointment_date.is_none()
            && self.last_service_date.is_none()
    }
}

/// Payment-field write applied to a client by the payment service.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientPaymentUpdate {
    pub payment_status: PaymentStatus,
    pub partial_payment_amount: f64,
    pub updated_by: i32,
}
