//! Diesel models for the append-only payment ledger.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::payment::{NewPayment as DomainNewPayment, PaymentHistory as DomainPayment};
use crate::domain::types::TypeConstraintError;
use crate::models::client::Client;

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Client, foreign_key = client_id))]
#[diesel(table_name = crate::schema::payment_history)]
pub struct PaymentHistory {
    pub id: i32,
    pub client_id: i32,
    pub invoice_id: Option<i32>,
    pub amount: f64,
    pub method: String,
    pub paid_at: NaiveDateTime,
    pub reference: String,
    pub status: String,
    pub description: String,
    pub recorded_by: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::payment_history)]
pub struct NewPayment<'a> {
    pub client_id: i32,
    pub invoice_id: Option<i32>,
    pub amount: f64,
    pub method: String,
    pub paid_at: NaiveDateTime,
    pub reference: &'a str,
    pub status: String,
    pub description: &'a str,
    pub recorded_by: i32,
}

impl TryFrom<PaymentHistory> for DomainPayment {
    type Error = TypeConstraintError;

    fn try_from(payment: PaymentHistory) -> Result<Self, Self::Error> {
        Ok(Self {
            id: payment.id,
            client_id: payment.client_id,
            invoice_id: payment.invoice_id,
            amount: payment.amount,
            method: payment.method.parse()?,
            paid_at: payment.paid_at,
            reference: payment.reference,
            status: payment.status.parse()?,
            description: payment.description,
            recorded_by: payment.recorded_by,
            created_at: payment.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewPayment> for NewPayment<'a> {
    fn from(payment: &'a DomainNewPayment) -> Self {
        Self {
            client_id: payment.client_id,
            invoice_id: payment.invoice_id,
            amount: payment.amount,
            method: payment.method.to_string(),
            paid_at: payment.paid_at,
            reference: payment.reference.as_str(),
            status: payment.status.to_string(),
            description: payment.description.as_str(),
            recorded_by: payment.recorded_by,
        }
    }
}
