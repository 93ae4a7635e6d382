use serde::Deserialize;
use validator::Validate;

use crate::domain::invoice::{InvoiceItem, InvoiceStatus, NewInvoice, UpdateInvoice};
use crate::domain::payment::PaymentMethod;
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Deserialize, Validate)]
/// Payload for creating an invoice. Subtotal/tax/total are never accepted
/// from the caller; they are recomputed from the items server-side.
pub struct CreateInvoicePayload {
    pub client_id: Option<i32>,
    pub items: Vec<InvoiceItem>,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default)]
    pub tax_rate: f64,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub notes: Option<String>,
}

impl CreateInvoicePayload {
    pub fn to_new_invoice(&self, created_by: i32) -> Result<NewInvoice, TypeConstraintError> {
        NewInvoice::new(
            self.client_id,
            self.items.clone(),
            self.tax_rate,
            self.status,
            self.notes.clone(),
            created_by,
        )
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateInvoicePayload {
    pub items: Vec<InvoiceItem>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub tax_rate: f64,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
}

impl From<&UpdateInvoicePayload> for UpdateInvoice {
    fn from(payload: &UpdateInvoicePayload) -> Self {
        Self {
            items: payload.items.clone(),
            tax_rate: payload.tax_rate,
            status: payload.status,
            notes: payload.notes.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// Payload for settling an invoice. A missing amount means payment in full.
pub struct SettleInvoicePayload {
    pub amount: Option<f64>,
    pub method: Option<PaymentMethod>,
}

#[derive(Debug, Deserialize)]
pub struct InvoiceListParams {
    pub client_id: Option<i32>,
    pub status: Option<InvoiceStatus>,
    pub page: Option<usize>,
}
