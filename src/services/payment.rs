//! Payment recording and propagation.
//!
//! Updating a client's payment fields persists the client first, then issues
//! two independent best-effort side effects: a ledger append (only when money
//! actually moved) and an audit entry. Neither can fail the payment update.

use chrono::{NaiveDateTime, Utc};
use serde_json::json;

use crate::domain::audit::{AuditAction, AuditEntityType, FieldChange, NewAuditLog};
use crate::domain::client::{Client, ClientPaymentUpdate, PaymentStatus};
use crate::domain::payment::{
    NewPayment, PaymentEntryStatus, PaymentHistory, PaymentMethod, generate_payment_reference,
};
use crate::domain::types::sanitize_free_text;
use crate::domain::user::AuthenticatedUser;
use crate::repository::{
    AuditLogWriter, ClientReader, ClientWriter, PaymentLedgerReader, PaymentLedgerWriter,
    PaymentListQuery,
};
use crate::services::{ServiceError, ServiceResult, client as client_service};

/// Paid threshold applied when a client has no estimated cost on file.
pub const DEFAULT_COST_THRESHOLD: f64 = 1000.0;

/// Caller-supplied payment fields. Everything is optional; missing values
/// are derived or defaulted.
#[derive(Clone, Debug, Default)]
pub struct PaymentRequest {
    pub payment_status: Option<PaymentStatus>,
    pub partial_payment_amount: Option<f64>,
    pub method: Option<PaymentMethod>,
    pub paid_at: Option<NaiveDateTime>,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub invoice_id: Option<i32>,
}

/// Derives the payment status from the recorded amount against the client's
/// cost threshold.
pub fn derive_payment_status(amount: f64, estimated_cost: Option<f64>) -> PaymentStatus {
    let threshold = estimated_cost.unwrap_or(DEFAULT_COST_THRESHOLD);
    if amount == 0.0 {
        PaymentStatus::NotPaid
    } else if amount >= threshold {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Partial
    }
}

/// Payment update sequence for a client (see module docs for the side-effect
/// contract).
pub fn update_client_payment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    client_id: i32,
    request: PaymentRequest,
) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + PaymentLedgerWriter + AuditLogWriter + ?Sized,
{
    if !user.permissions().record_payments {
        return Err(ServiceError::Unauthorized);
    }

    let before = client_service::get_client(repo, user, client_id)?;

    if let Some(amount) = request.partial_payment_amount
        && amount < 0.0
    {
        return Err(ServiceError::Validation(format!(
            "payment amount cannot be negative: {amount}"
        )));
    }

    let amount = request
        .partial_payment_amount
        .unwrap_or(before.partial_payment_amount);
    let status = request
        .payment_status
        .unwrap_or_else(|| derive_payment_status(amount, before.estimated_cost));

    let after = repo.update_client_payment(
        client_id,
        &ClientPaymentUpdate {
            payment_status: status,
            partial_payment_amount: amount,
            updated_by: user.id,
        },
    )?;

    // Money moved: append exactly one ledger row. A ledger failure is logged
    // and dropped; the client update above already succeeded.
    if let Some(amount) = request.partial_payment_amount.filter(|a| *a > 0.0) {
        let entry = NewPayment {
            client_id,
            invoice_id: request.invoice_id,
            amount,
            method: request.method.unwrap_or_default(),
            paid_at: request.paid_at.unwrap_or_else(|| Utc::now().naive_utc()),
            reference: request
                .reference
                .clone()
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(generate_payment_reference),
            status: PaymentEntryStatus::Completed,
            description: request
                .description
                .clone()
                .and_then(sanitize_free_text)
                .unwrap_or_else(|| format!("Payment of {amount:.2} received from {}", after.name)),
            recorded_by: user.id,
        };
        if let Err(err) = repo.append_payment(&entry) {
            log::error!("Failed to append payment ledger entry for client {client_id}: {err}");
        }
    }

    crate::services::audit::record_or_log(
        repo,
        &NewAuditLog::new(
            AuditEntityType::Client,
            client_id,
            AuditAction::PaymentUpdate,
            user.id,
            user.role,
        )
        .changes(vec![
            FieldChange::new(
                "payment_status",
                json!(before.payment_status),
                json!(after.payment_status),
            ),
            FieldChange::new(
                "partial_payment_amount",
                json!(before.partial_payment_amount),
                json!(after.partial_payment_amount),
            ),
        ]),
    );

    Ok(after)
}

/// Ledger read-back with optional filters, newest first.
pub fn list_payments<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: PaymentListQuery,
) -> ServiceResult<Vec<PaymentHistory>>
where
    R: PaymentLedgerReader + ?Sized,
{
    if !user.permissions().record_payments {
        return Err(ServiceError::Unauthorized);
    }
    repo.list_payments(query).map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::RecordState;
    use crate::domain::user::Role;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    fn accountant() -> AuthenticatedUser {
        AuthenticatedUser {
            id: 2,
            name: "Acc".into(),
            email: "acc@example.com".into(),
            role: Role::Accountant,
        }
    }

    fn unpaid_client(estimated_cost: Option<f64>) -> Client {
        Client {
            id: 5,
            name: "Bea".into(),
            payment_status: PaymentStatus::NotPaid,
            estimated_cost,
            record_state: RecordState::Active,
            ..Client::default()
        }
    }

    #[test]
    fn status_derivation_brackets() {
        assert_eq!(derive_payment_status(0.0, Some(1000.0)), PaymentStatus::NotPaid);
        assert_eq!(derive_payment_status(400.0, Some(1000.0)), PaymentStatus::Partial);
        assert_eq!(derive_payment_status(1000.0, Some(1000.0)), PaymentStatus::Paid);
        assert_eq!(derive_payment_status(1500.0, Some(1000.0)), PaymentStatus::Paid);
        // Fallback threshold when no estimate is on file.
        assert_eq!(derive_payment_status(999.0, None), PaymentStatus::Partial);
        assert_eq!(derive_payment_status(1000.0, None), PaymentStatus::Paid);
    }

    #[test]
    fn partial_amount_derives_partial_status_and_appends_ledger_row() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|_| Ok(Some(unpaid_client(Some(1000.0)))));
        repo.expect_update_client_payment()
            .withf(|_, update| {
                update.payment_status == PaymentStatus::Partial
                    && update.partial_payment_amount == 400.0
            })
            .times(1)
            .returning(|_, update| {
                Ok(Client {
                    payment_status: update.payment_status,
                    partial_payment_amount: update.partial_payment_amount,
                    ..unpaid_client(Some(1000.0))
                })
            });
        repo.expect_append_payment()
            .withf(|entry| {
                entry.amount == 400.0
                    && entry.method == PaymentMethod::Cash
                    && entry.status == PaymentEntryStatus::Completed
                    && entry.reference.starts_with("PAY-")
            })
            .times(1)
            .returning(|entry| {
                Ok(PaymentHistory {
                    id: 1,
                    client_id: entry.client_id,
                    invoice_id: entry.invoice_id,
                    amount: entry.amount,
                    method: entry.method,
                    paid_at: entry.paid_at,
                    reference: entry.reference.clone(),
                    status: entry.status,
                    description: entry.description.clone(),
                    recorded_by: entry.recorded_by,
                    created_at: Utc::now().naive_utc(),
                })
            });
        repo.expect_append_audit_log()
            .withf(|entry| entry.action == AuditAction::PaymentUpdate)
            .times(1)
            .returning(|_| Err(RepositoryError::NotFound));

        let client = update_client_payment(
            &repo,
            &accountant(),
            5,
            PaymentRequest {
                partial_payment_amount: Some(400.0),
                ..PaymentRequest::default()
            },
        )
        .unwrap();
        assert_eq!(client.payment_status, PaymentStatus::Partial);
    }

    #[test]
    fn zero_amount_means_not_paid_and_no_ledger_row() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|_| Ok(Some(unpaid_client(Some(1000.0)))));
        repo.expect_update_client_payment()
            .withf(|_, update| update.payment_status == PaymentStatus::NotPaid)
            .times(1)
            .returning(|_, update| {
                Ok(Client {
                    payment_status: update.payment_status,
                    ..unpaid_client(Some(1000.0))
                })
            });
        repo.expect_append_payment().times(0);
        repo.expect_append_audit_log()
            .returning(|_| Err(RepositoryError::NotFound));

        update_client_payment(
            &repo,
            &accountant(),
            5,
            PaymentRequest {
                partial_payment_amount: Some(0.0),
                ..PaymentRequest::default()
            },
        )
        .unwrap();
    }

    #[test]
    fn amount_at_estimate_settles_the_bill() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|_| Ok(Some(unpaid_client(Some(1000.0)))));
        repo.expect_update_client_payment()
            .withf(|_, update| update.payment_status == PaymentStatus::Paid)
            .times(1)
            .returning(|_, update| {
                Ok(Client {
                    payment_status: update.payment_status,
                    partial_payment_amount: update.partial_payment_amount,
                    ..unpaid_client(Some(1000.0))
                })
            });
        repo.expect_append_payment().times(1).returning(|entry| {
            Ok(PaymentHistory {
                id: 2,
                client_id: entry.client_id,
                invoice_id: entry.invoice_id,
                amount: entry.amount,
                method: entry.method,
                paid_at: entry.paid_at,
                reference: entry.reference.clone(),
                status: entry.status,
                description: entry.description.clone(),
                recorded_by: entry.recorded_by,
                created_at: Utc::now().naive_utc(),
            })
        });
        repo.expect_append_audit_log()
            .returning(|_| Err(RepositoryError::NotFound));

        update_client_payment(
            &repo,
            &accountant(),
            5,
            PaymentRequest {
                partial_payment_amount: Some(1000.0),
                ..PaymentRequest::default()
            },
        )
        .unwrap();
    }

    #[test]
    fn explicit_status_wins_over_derivation() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|_| Ok(Some(unpaid_client(Some(1000.0)))));
        repo.expect_update_client_payment()
            .withf(|_, update| update.payment_status == PaymentStatus::Paid)
            .times(1)
            .returning(|_, update| {
                Ok(Client {
                    payment_status: update.payment_status,
                    ..unpaid_client(Some(1000.0))
                })
            });
        repo.expect_append_payment().times(1).returning(|entry| {
            Ok(PaymentHistory {
                id: 3,
                client_id: entry.client_id,
                invoice_id: entry.invoice_id,
                amount: entry.amount,
                method: entry.method,
                paid_at: entry.paid_at,
                reference: entry.reference.clone(),
                status: entry.status,
                description: entry.description.clone(),
                recorded_by: entry.recorded_by,
                created_at: Utc::now().naive_utc(),
            })
        });
        repo.expect_append_audit_log()
            .returning(|_| Err(RepositoryError::NotFound));

        update_client_payment(
            &repo,
            &accountant(),
            5,
            PaymentRequest {
                payment_status: Some(PaymentStatus::Paid),
                partial_payment_amount: Some(100.0),
                ..PaymentRequest::default()
            },
        )
        .unwrap();
    }

    #[test]
    fn ledger_failure_does_not_fail_the_payment_update() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|_| Ok(Some(unpaid_client(None))));
        repo.expect_update_client_payment().returning(|_, update| {
            Ok(Client {
                payment_status: update.payment_status,
                partial_payment_amount: update.partial_payment_amount,
                ..unpaid_client(None)
            })
        });
        repo.expect_append_payment()
            .returning(|_| Err(RepositoryError::DatabaseError("ledger down".into())));
        repo.expect_append_audit_log()
            .returning(|_| Err(RepositoryError::DatabaseError("audit down".into())));

        let client = update_client_payment(
            &repo,
            &accountant(),
            5,
            PaymentRequest {
                partial_payment_amount: Some(250.0),
                ..PaymentRequest::default()
            },
        )
        .unwrap();
        assert_eq!(client.partial_payment_amount, 250.0);
    }

    #[test]
    fn negative_amount_is_rejected_before_any_write() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|_| Ok(Some(unpaid_client(None))));
        repo.expect_update_client_payment().times(0);

        let result = update_client_payment(
            &repo,
            &accountant(),
            5,
            PaymentRequest {
                partial_payment_amount: Some(-5.0),
                ..PaymentRequest::default()
            },
        );
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn mechanic_cannot_record_payments() {
        let repo = MockRepository::new();
        let mechanic = AuthenticatedUser {
            id: 3,
            name: "Max".into(),
            email: "max@example.com".into(),
            role: Role::Mechanic,
        };
        let result = update_client_payment(&repo, &mechanic, 5, PaymentRequest::default());
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
