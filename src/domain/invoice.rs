use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::payment::PaymentMethod;
use crate::domain::types::{TypeConstraintError, sanitize_free_text, status_enum_strings};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

status_enum_strings!(InvoiceStatus {
    Draft => "draft",
    Pending => "pending",
    Paid => "paid",
    Overdue => "overdue",
    Cancelled => "cancelled",
});

/// A parts/labor line on an invoice.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct InvoiceItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    #[serde(default)]
    pub labor_hours: Option<f64>,
    #[serde(default)]
    pub labor_rate: Option<f64>,
    #[serde(default = "InvoiceItem::default_taxable")]
    pub taxable: bool,
}

impl InvoiceItem {
    fn default_taxable() -> bool {
        true
    }

    /// Parts plus labor for this line.
    pub fn line_total(&self) -> f64 {
        let parts = self.quantity * self.unit_price;
        let labor = self.labor_hours.unwrap_or(0.0) * self.labor_rate.unwrap_or(0.0);
        parts + labor
    }
}

/// Server-side computed money fields. Callers never supply these directly.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct InvoiceTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl InvoiceTotals {
    /// Recomputes subtotal/tax/total from the line items. Tax applies to
    /// taxable lines only.
    pub fn compute(items: &[InvoiceItem], tax_rate: f64) -> Self {
        let subtotal: f64 = items.iter().map(InvoiceItem::line_total).sum();
        let taxable: f64 = items
            .iter()
            .filter(|item| item.taxable)
            .map(InvoiceItem::line_total)
            .sum();
        let tax = taxable * tax_rate;
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

/// Billing document for parts and labor, optionally tied to a client.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Invoice {
    pub id: i32,
    pub client_id: Option<i32>,
    pub items: Vec<InvoiceItem>,
    pub tax_rate: f64,
    pub totals: InvoiceTotals,
    pub status: InvoiceStatus,
    pub payment_method: Option<PaymentMethod>,
    pub paid_at: Option<NaiveDateTime>,
    pub notes: Option<String>,
    pub created_by: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewInvoice {
    pub client_id: Option<i32>,
    pub items: Vec<InvoiceItem>,
    pub tax_rate: f64,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
    pub created_by: i32,
}

impl NewInvoice {
    pub fn new(
        client_id: Option<i32>,
        items: Vec<InvoiceItem>,
        tax_rate: f64,
        status: InvoiceStatus,
        notes: Option<String>,
        created_by: i32,
    ) -> Result<Self, TypeConstraintError> {
        if items.is_empty() {
            return Err(TypeConstraintError::InvalidValue(
                "invoice needs at least one item".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&tax_rate) {
            return Err(TypeConstraintError::InvalidValue(format!(
                "tax rate out of range: {tax_rate}"
            )));
        }
        Ok(Self {
            client_id,
            items,
            tax_rate,
            status,
            notes: notes.and_then(sanitize_free_text),
            created_by,
        })
    }
}

#[derive(Clone, Debug)]
pub struct UpdateInvoice {
    pub items: Vec<InvoiceItem>,
    pub tax_rate: f64,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
}

/// Payment metadata stamped onto an invoice when it is settled.
#[derive(Clone, Debug)]
pub struct InvoicePaymentUpdate {
    pub status: InvoiceStatus,
    pub payment_method: Option<PaymentMethod>,
    pub paid_at: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, taxable: bool) -> InvoiceItem {
        InvoiceItem {
            description: "part".into(),
            quantity: 1.0,
            unit_price: price,
            labor_hours: None,
            labor_rate: None,
            taxable,
        }
    }

    #[test]
    fn totals_tax_only_taxable_lines() {
        let items = vec![item(100.0, true), item(50.0, false)];
        let totals = InvoiceTotals::compute(&items, 0.2);
        assert_eq!(totals.subtotal, 150.0);
        assert_eq!(totals.tax, 20.0);
        assert_eq!(totals.total, 170.0);
    }

    #[test]
    fn line_total_includes_labor() {
        let line = InvoiceItem {
            description: "brake job".into(),
            quantity: 2.0,
            unit_price: 40.0,
            labor_hours: Some(1.5),
            labor_rate: Some(60.0),
            taxable: true,
        };
        assert_eq!(line.line_total(), 170.0);
    }

    #[test]
    fn new_invoice_rejects_empty_items_and_bad_rate() {
        assert!(NewInvoice::new(None, vec![], 0.1, InvoiceStatus::Draft, None, 1).is_err());
        assert!(
            NewInvoice::new(None, vec![item(1.0, true)], 1.5, InvoiceStatus::Draft, None, 1)
                .is_err()
        );
    }
}
