//! DTOs shaped for the invoice endpoints.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::invoice::{Invoice, InvoiceStatus};
use crate::domain::user::Role;

/// Work line as shown to the workshop: what is being done, not what it
/// costs.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WorkItemView {
    pub description: String,
    pub quantity: f64,
}

/// Field-reduced projection served to Mechanics: no amounts, rates or
/// payment metadata.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InvoiceWorkshopView {
    pub id: i32,
    pub client_id: Option<i32>,
    pub items: Vec<WorkItemView>,
    pub status: InvoiceStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Invoice> for InvoiceWorkshopView {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            client_id: invoice.client_id,
            items: invoice
                .items
                .into_iter()
                .map(|item| WorkItemView {
                    description: item.description,
                    quantity: item.quantity,
                })
                .collect(),
            status: invoice.status,
            created_at: invoice.created_at,
            updated_at: invoice.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum InvoiceResponse {
    Full(Box<Invoice>),
    Workshop(InvoiceWorkshopView),
}

impl InvoiceResponse {
    pub fn for_role(invoice: Invoice, role: Role) -> Self {
        match role {
            Role::Mechanic => Self::Workshop(invoice.into()),
            _ => Self::Full(Box::new(invoice)),
        }
    }
}
