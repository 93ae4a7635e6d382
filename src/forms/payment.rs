use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

use crate::domain::client::PaymentStatus;
use crate::domain::payment::{PaymentEntryStatus, PaymentMethod};
use crate::services::payment::PaymentRequest;

#[derive(Debug, Deserialize, Validate)]
/// Payload for the client payment endpoint. Status may be omitted, in which
/// case it is derived from the amount.
pub struct PaymentPayload {
    pub payment_status: Option<PaymentStatus>,
    #[validate(range(min = 0.0))]
    pub partial_payment_amount: Option<f64>,
    pub method: Option<PaymentMethod>,
    pub paid_at: Option<NaiveDateTime>,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub invoice_id: Option<i32>,
}

impl From<PaymentPayload> for PaymentRequest {
    fn from(payload: PaymentPayload) -> Self {
        Self {
            payment_status: payload.payment_status,
            partial_payment_amount: payload.partial_payment_amount,
            method: payload.method,
            paid_at: payload.paid_at,
            reference: payload.reference,
            description: payload.description,
            invoice_id: payload.invoice_id,
        }
    }
}

#[derive(Debug, Deserialize)]
/// Filters accepted by the ledger read endpoint.
pub struct PaymentListParams {
    pub client_id: Option<i32>,
    pub method: Option<PaymentMethod>,
    pub status: Option<PaymentEntryStatus>,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_payload_deserializes() {
        let payload: PaymentPayload =
            serde_json::from_str(r#"{ "partial_payment_amount": 400.0 }"#).unwrap();
        assert_eq!(payload.partial_payment_amount, Some(400.0));
        assert_eq!(payload.payment_status, None);
        assert_eq!(payload.method, None);
    }

    #[test]
    fn unknown_payment_status_fails_deserialization() {
        let result: Result<PaymentPayload, _> =
            serde_json::from_str(r#"{ "payment_status": "iou" }"#);
        assert!(result.is_err());
    }
}
