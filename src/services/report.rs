//! Dashboard aggregates for the reporting screen.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::client::RepairStatus;
use crate::domain::invoice::InvoiceStatus;
use crate::domain::user::AuthenticatedUser;
use crate::repository::{
    ClientListQuery, ClientReader, InvoiceListQuery, InvoiceReader, PaymentLedgerReader,
    PaymentListQuery,
};
use crate::services::{ServiceError, ServiceResult};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardSummary {
    pub active_clients: usize,
    pub waiting: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub payments_received: f64,
    pub outstanding_invoices: usize,
}

/// Computes the dashboard aggregates from live data. Callers decide whether
/// to serve a cached copy; this function always recomputes.
pub fn dashboard_summary<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<DashboardSummary>
where
    R: ClientReader + InvoiceReader + PaymentLedgerReader + ?Sized,
{
    if !user.permissions().view_reports {
        return Err(ServiceError::Unauthorized);
    }

    let (total, clients) = repo.list_clients(ClientListQuery::new())?;

    let mut summary = DashboardSummary {
        active_clients: total,
        ..DashboardSummary::default()
    };
    for client in &clients {
        match client.repair_status {
            RepairStatus::Waiting => summary.waiting += 1,
            RepairStatus::InProgress => summary.in_progress += 1,
            RepairStatus::Completed => summary.completed += 1,
            RepairStatus::Delivered | RepairStatus::Cancelled => {}
        }
    }

    // Payments received this calendar month.
    let now = Utc::now().naive_utc();
    let month_start = now
        .date()
        .with_day0(0)
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or(now))
        .unwrap_or(now);
    let payments = repo.list_payments(PaymentListQuery::new().between(month_start, now))?;
    summary.payments_received = payments.iter().map(|p| p.amount).sum();

    let (pending, _) =
        repo.list_invoices(InvoiceListQuery::new().status(InvoiceStatus::Pending).paginate(1, 1))?;
    let (overdue, _) =
        repo.list_invoices(InvoiceListQuery::new().status(InvoiceStatus::Overdue).paginate(1, 1))?;
    summary.outstanding_invoices = pending + overdue;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::Client;
    use crate::domain::payment::{PaymentEntryStatus, PaymentHistory, PaymentMethod};
    use crate::domain::user::Role;
    use crate::repository::mock::MockRepository;

    #[test]
    fn summary_counts_statuses_and_sums_payments() {
        let mut repo = MockRepository::new();
        repo.expect_list_clients().returning(|_| {
            Ok((
                2,
                vec![
                    Client {
                        repair_status: RepairStatus::Waiting,
                        ..Client::default()
                    },
                    Client {
                        repair_status: RepairStatus::InProgress,
                        ..Client::default()
                    },
                ],
            ))
        });
        repo.expect_list_payments().returning(|_| {
            Ok(vec![PaymentHistory {
                id: 1,
                client_id: 1,
                invoice_id: None,
                amount: 250.0,
                method: PaymentMethod::Cash,
                paid_at: Utc::now().naive_utc(),
                reference: "PAY-x".into(),
                status: PaymentEntryStatus::Completed,
                description: String::new(),
                recorded_by: 1,
                created_at: Utc::now().naive_utc(),
            }])
        });
        repo.expect_list_invoices().returning(|_| Ok((1, vec![])));

        let admin = AuthenticatedUser {
            id: 1,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: Role::Admin,
        };
        let summary = dashboard_summary(&repo, &admin).unwrap();
        assert_eq!(summary.active_clients, 2);
        assert_eq!(summary.waiting, 1);
        assert_eq!(summary.in_progress, 1);
        assert_eq!(summary.payments_received, 250.0);
        assert_eq!(summary.outstanding_invoices, 2);
    }

    #[test]
    fn mechanics_cannot_view_reports() {
        let repo = MockRepository::new();
        let mechanic = AuthenticatedUser {
            id: 3,
            name: "Max".into(),
            email: "max@example.com".into(),
            role: Role::Mechanic,
        };
        assert!(matches!(
            dashboard_summary(&repo, &mechanic),
            Err(ServiceError::Unauthorized)
        ));
    }
}
