use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::invoice::{
    Invoice as DomainInvoice, InvoiceItem, InvoicePaymentUpdate as DomainInvoicePaymentUpdate,
    InvoiceTotals, NewInvoice as DomainNewInvoice, UpdateInvoice as DomainUpdateInvoice,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::invoices)]
pub struct Invoice {
    pub id: i32,
    pub client_id: Option<i32>,
    pub items: String, // JSON text in the DB
    pub tax_rate: f64,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub status: String,
    pub payment_method: Option<String>,
    pub paid_at: Option<NaiveDateTime>,
    pub notes: Option<String>,
    pub created_by: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::invoices)]
pub struct NewInvoice<'a> {
    pub client_id: Option<i32>,
    pub items: String,
    pub tax_rate: f64,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub status: String,
    pub notes: Option<&'a str>,
    pub created_by: i32,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::invoices)]
pub struct UpdateInvoice<'a> {
    pub items: String,
    pub tax_rate: f64,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub status: String,
    pub notes: Option<Option<&'a str>>,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::invoices)]
pub struct InvoicePaymentUpdate {
    pub status: String,
    pub payment_method: Option<String>,
    pub paid_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

fn parse_items(raw: &str) -> Result<Vec<InvoiceItem>, TypeConstraintError> {
    serde_json::from_str(raw)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("invoice items: {e}")))
}

fn serialize_items(items: &[InvoiceItem]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

impl TryFrom<Invoice> for DomainInvoice {
    type Error = TypeConstraintError;

    fn try_from(invoice: Invoice) -> Result<Self, Self::Error> {
        Ok(Self {
            id: invoice.id,
            client_id: invoice.client_id,
            items: parse_items(&invoice.items)?,
            tax_rate: invoice.tax_rate,
            totals: InvoiceTotals {
                subtotal: invoice.subtotal,
                tax: invoice.tax,
                total: invoice.total,
            },
            status: invoice.status.parse()?,
            payment_method: invoice
                .payment_method
                .as_deref()
                .map(str::parse)
                .transpose()?,
            paid_at: invoice.paid_at,
            notes: invoice.notes,
            created_by: invoice.created_by,
            created_at: invoice.created_at,
            updated_at: invoice.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewInvoice> for NewInvoice<'a> {
    fn from(invoice: &'a DomainNewInvoice) -> Self {
        let totals = InvoiceTotals::compute(&invoice.items, invoice.tax_rate);
        Self {
            client_id: invoice.client_id,
            items: serialize_items(&invoice.items),
            tax_rate: invoice.tax_rate,
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            status: invoice.status.to_string(),
            notes: invoice.notes.as_deref(),
            created_by: invoice.created_by,
        }
    }
}

impl<'a> From<&'a DomainUpdateInvoice> for UpdateInvoice<'a> {
    fn from(invoice: &'a DomainUpdateInvoice) -> Self {
        let totals = InvoiceTotals::compute(&invoice.items, invoice.tax_rate);
        Self {
            items: serialize_items(&invoice.items),
            tax_rate: invoice.tax_rate,
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            status: invoice.status.to_string(),
            notes: Some(invoice.notes.as_deref()),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl From<&DomainInvoicePaymentUpdate> for InvoicePaymentUpdate {
    fn from(update: &DomainInvoicePaymentUpdate) -> Self {
        Self {
            status: update.status.to_string(),
            payment_method: update.payment_method.map(|m| m.to_string()),
            paid_at: update.paid_at,
            updated_at: Utc::now().naive_utc(),
        }
    }
}
