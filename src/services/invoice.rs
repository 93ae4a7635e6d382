//! Invoice business logic. Money fields are always recomputed server-side
//! from the line items; settling an invoice mirrors into the related
//! client's payment fields.

use chrono::Utc;
use serde_json::json;

use crate::domain::audit::{AuditAction, AuditEntityType, FieldChange, NewAuditLog};
use crate::domain::invoice::{
    Invoice, InvoicePaymentUpdate, InvoiceStatus, NewInvoice, UpdateInvoice,
};
use crate::domain::payment::PaymentMethod;
use crate::domain::user::AuthenticatedUser;
use crate::repository::{
    AuditLogWriter, ClientReader, ClientWriter, InvoiceListQuery, InvoiceReader, InvoiceWriter,
    PaymentLedgerWriter,
};
use crate::services::payment::PaymentRequest;
use crate::services::{ServiceError, ServiceResult, payment as payment_service};

pub fn get_invoice<R>(repo: &R, invoice_id: i32) -> ServiceResult<Invoice>
where
    R: InvoiceReader + ?Sized,
{
    repo.get_invoice_by_id(invoice_id)?
        .ok_or(ServiceError::NotFound)
}

pub fn list_invoices<R>(
    repo: &R,
    query: InvoiceListQuery,
) -> ServiceResult<(usize, Vec<Invoice>)>
where
    R: InvoiceReader + ?Sized,
{
    repo.list_invoices(query).map_err(ServiceError::from)
}

pub fn create_invoice<R>(
    repo: &R,
    user: &AuthenticatedUser,
    new_invoice: NewInvoice,
) -> ServiceResult<Invoice>
where
    R: InvoiceWriter + AuditLogWriter + ?Sized,
{
    if !user.permissions().manage_invoices {
        return Err(ServiceError::Unauthorized);
    }

    let invoice = repo.create_invoice(&new_invoice)?;

    crate::services::audit::record_or_log(
        repo,
        &NewAuditLog::new(
            AuditEntityType::Invoice,
            invoice.id,
            AuditAction::Create,
            user.id,
            user.role,
        )
        .metadata(json!({ "total": invoice.totals.total })),
    );

    Ok(invoice)
}

pub fn update_invoice<R>(
    repo: &R,
    user: &AuthenticatedUser,
    invoice_id: i32,
    updates: UpdateInvoice,
) -> ServiceResult<Invoice>
where
    R: InvoiceReader + InvoiceWriter + AuditLogWriter + ?Sized,
{
    if !user.permissions().manage_invoices {
        return Err(ServiceError::Unauthorized);
    }

    let before = get_invoice(repo, invoice_id)?;
    let after = repo.update_invoice(invoice_id, &updates)?;

    let mut changes = Vec::new();
    if before.status != after.status {
        changes.push(FieldChange::new(
            "status",
            json!(before.status),
            json!(after.status),
        ));
    }
    if before.totals.total != after.totals.total {
        changes.push(FieldChange::new(
            "total",
            json!(before.totals.total),
            json!(after.totals.total),
        ));
    }
    crate::services::audit::record_or_log(
        repo,
        &NewAuditLog::new(
            AuditEntityType::Invoice,
            invoice_id,
            AuditAction::Update,
            user.id,
            user.role,
        )
        .changes(changes),
    );

    Ok(after)
}

/// Marks an invoice paid (or partially paid via `amount`) and mirrors the
/// settlement into the related client's payment fields. A missing related
/// client is tolerated: the invoice is the primary entity here.
pub fn settle_invoice<R>(
    repo: &R,
    user: &AuthenticatedUser,
    invoice_id: i32,
    amount: Option<f64>,
    method: Option<PaymentMethod>,
) -> ServiceResult<Invoice>
where
    R: InvoiceReader
        + InvoiceWriter
        + ClientReader
        + ClientWriter
        + PaymentLedgerWriter
        + AuditLogWriter
        + ?Sized,
{
    if !user.permissions().record_payments {
        return Err(ServiceError::Unauthorized);
    }

    let before = get_invoice(repo, invoice_id)?;
    let amount = amount.unwrap_or(before.totals.total);
    if amount < 0.0 {
        return Err(ServiceError::Validation(format!(
            "payment amount cannot be negative: {amount}"
        )));
    }
    let fully_paid = amount >= before.totals.total;

    let after = repo.update_invoice_payment(
        invoice_id,
        &InvoicePaymentUpdate {
            status: if fully_paid {
                InvoiceStatus::Paid
            } else {
                before.status
            },
            payment_method: Some(method.unwrap_or_default()),
            paid_at: Some(Utc::now().naive_utc()),
        },
    )?;

    crate::services::audit::record_or_log(
        repo,
        &NewAuditLog::new(
            AuditEntityType::Invoice,
            invoice_id,
            AuditAction::PaymentUpdate,
            user.id,
            user.role,
        )
        .changes(vec![FieldChange::new(
            "status",
            json!(before.status),
            json!(after.status),
        )])
        .metadata(json!({ "amount": amount })),
    );

    // Mirror into the related client. The client may have been deleted since
    // the invoice was raised; that is a silent no-op.
    if let Some(client_id) = after.client_id {
        let request = PaymentRequest {
            payment_status: None,
            partial_payment_amount: Some(amount),
            method,
            paid_at: after.paid_at,
            reference: None,
            description: Some(format!("Invoice #{invoice_id} settlement")),
            invoice_id: Some(invoice_id),
        };
        match payment_service::update_client_payment(repo, user, client_id, request) {
            Ok(_) | Err(ServiceError::NotFound) => {}
            Err(err) => return Err(err),
        }
    }

    Ok(after)
}

pub fn delete_invoice<R>(
    repo: &R,
    user: &AuthenticatedUser,
    invoice_id: i32,
) -> ServiceResult<()>
where
    R: InvoiceReader + InvoiceWriter + AuditLogWriter + ?Sized,
{
    if !user.permissions().delete_records {
        return Err(ServiceError::Unauthorized);
    }

    get_invoice(repo, invoice_id)?;
    repo.delete_invoice(invoice_id)?;

    crate::services::audit::record_or_log(
        repo,
        &NewAuditLog::new(
            AuditEntityType::Invoice,
            invoice_id,
            AuditAction::Delete,
            user.id,
            user.role,
        ),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::{Client, PaymentStatus};
    use crate::domain::invoice::{InvoiceItem, InvoiceTotals};
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

    fn pending_invoice(total: f64, client_id: Option<i32>) -> Invoice {
        Invoice {
            id: 21,
            client_id,
            items: vec![InvoiceItem {
                description: "labor".into(),
                quantity: 1.0,
                unit_price: total,
                labor_hours: None,
                labor_rate: None,
                taxable: false,
            }],
            tax_rate: 0.0,
            totals: InvoiceTotals {
                subtotal: total,
                tax: 0.0,
                total,
            },
            status: InvoiceStatus::Pending,
            ..Invoice::default()
        }
    }

    #[test]
    fn settling_mirrors_into_client_payment_fields() {
        let mut repo = MockRepository::new();
        repo.expect_get_invoice_by_id()
            .returning(|_| Ok(Some(pending_invoice(800.0, Some(5)))));
        repo.expect_update_invoice_payment()
            .withf(|_, update| update.status == InvoiceStatus::Paid)
            .times(1)
            .returning(|_, _| {
                let mut invoice = pending_invoice(800.0, Some(5));
                invoice.status = InvoiceStatus::Paid;
                invoice.paid_at = Some(Utc::now().naive_utc());
                Ok(invoice)
            });
        repo.expect_get_client_by_id().returning(|_| {
            Ok(Some(Client {
                id: 5,
                estimated_cost: Some(800.0),
                ..Client::default()
            }))
        });
        repo.expect_update_client_payment()
            .withf(|_, update| {
                update.payment_status == PaymentStatus::Paid
                    && update.partial_payment_amount == 800.0
            })
            .times(1)
            .returning(|_, update| {
                Ok(Client {
                    id: 5,
                    payment_status: update.payment_status,
                    partial_payment_amount: update.partial_payment_amount,
                    ..Client::default()
                })
            });
        repo.expect_append_payment()
            .withf(|entry| entry.invoice_id == Some(21) && entry.amount == 800.0)
            .times(1)
            .returning(|_| Err(RepositoryError::DatabaseError("ledger down".into())));
        repo.expect_append_audit_log()
            .returning(|_| Err(RepositoryError::NotFound));

        let invoice = settle_invoice(&repo, &accountant(), 21, None, None).unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Paid);
    }

    #[test]
    fn settling_an_orphaned_invoice_still_succeeds() {
        let mut repo = MockRepository::new();
        repo.expect_get_invoice_by_id()
            .returning(|_| Ok(Some(pending_invoice(800.0, Some(5)))));
        repo.expect_update_invoice_payment().returning(|_, _| {
            let mut invoice = pending_invoice(800.0, Some(5));
            invoice.status = InvoiceStatus::Paid;
            Ok(invoice)
        });
        // Related client already deleted.
        repo.expect_get_client_by_id().returning(|_| Ok(None));
        repo.expect_update_client_payment().times(0);
        repo.expect_append_audit_log()
            .returning(|_| Err(RepositoryError::NotFound));

        let invoice = settle_invoice(&repo, &accountant(), 21, None, None).unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Paid);
    }

    #[test]
    fn partial_settlement_keeps_invoice_pending() {
        let mut repo = MockRepository::new();
        repo.expect_get_invoice_by_id()
            .returning(|_| Ok(Some(pending_invoice(800.0, None))));
        repo.expect_update_invoice_payment()
            .withf(|_, update| update.status == InvoiceStatus::Pending)
            .times(1)
            .returning(|_, _| Ok(pending_invoice(800.0, None)));
        repo.expect_append_audit_log()
            .returning(|_| Err(RepositoryError::NotFound));

        settle_invoice(&repo, &accountant(), 21, Some(200.0), None).unwrap();
    }

    #[test]
    fn delete_invoice_is_admin_only() {
        let repo = MockRepository::new();
        assert!(matches!(
            delete_invoice(&repo, &accountant(), 21),
            Err(ServiceError::Unauthorized)
        ));
    }
}
