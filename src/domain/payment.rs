use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::status_enum_strings;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Transfer,
    Check,
    Other,
}

status_enum_strings!(PaymentMethod {
    Cash => "cash",
    Card => "card",
    Transfer => "transfer",
    Check => "check",
    Other => "other",
});

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentEntryStatus {
    Pending,
    #[default]
    Completed,
    Failed,
    Refunded,
}

status_enum_strings!(PaymentEntryStatus {
    Pending => "pending",
    Completed => "completed",
    Failed => "failed",
    Refunded => "refunded",
});

/// Immutable ledger entry for a received payment. Never mutated after
/// creation; the repository exposes no update or delete for it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PaymentHistory {
    pub id: i32,
    pub client_id: i32,
    pub invoice_id: Option<i32>,
    pub amount: f64,
    pub method: PaymentMethod,
    pub paid_at: NaiveDateTime,
    pub reference: String,
    pub status: PaymentEntryStatus,
    pub description: String,
    pub recorded_by: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewPayment {
    pub client_id: i32,
    pub invoice_id: Option<i32>,
    pub amount: f64,
    pub method: PaymentMethod,
    pub paid_at: NaiveDateTime,
    pub reference: String,
    pub status: PaymentEntryStatus,
    pub description: String,
    pub recorded_by: i32,
}

/// Generates an opaque reference string for ledger rows recorded without one.
pub fn generate_payment_reference() -> String {
    format!("PAY-{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_method_round_trips_as_snake_case() {
        for method in [
            PaymentMethod::Cash,
            PaymentMethod::Card,
            PaymentMethod::Transfer,
            PaymentMethod::Check,
            PaymentMethod::Other,
        ] {
            assert_eq!(method.to_string().parse::<PaymentMethod>(), Ok(method));
        }
    }

    #[test]
    fn generated_references_are_unique() {
        let a = generate_payment_reference();
        let b = generate_payment_reference();
        assert!(a.starts_with("PAY-"));
        assert_ne!(a, b);
    }
}
