//! Client (repair case) business logic.
//!
//! Every mutation here authorizes the caller, performs the primary write,
//! hands the old/new state to the synchronizer, and appends a best-effort
//! audit entry.

use chrono::Utc;
use serde_json::json;

use crate::domain::appointment::{AppointmentKind, NewAppointment};
use crate::domain::audit::{AuditAction, AuditEntityType, FieldChange, NewAuditLog};
use crate::domain::client::{
    Client, ClientSyncUpdate, NewClient, RecordState, RepairStatus, UpdateClient,
};
use crate::domain::user::{AuthenticatedUser, Role};
use crate::repository::{
    AppointmentReader, AppointmentWriter, AuditLogWriter, ClientListQuery, ClientReader,
    ClientWriter,
};
use crate::services::{ServiceError, ServiceResult, sync};

/// Fetches a live client or fails with `NotFound`. Soft-deleted records stay
/// visible to Admins only.
pub fn get_client<R>(repo: &R, user: &AuthenticatedUser, client_id: i32) -> ServiceResult<Client>
where
    R: ClientReader + ?Sized,
{
    let client = repo
        .get_client_by_id(client_id)?
        .ok_or(ServiceError::NotFound)?;
    if client.record_state == RecordState::Deleted && user.role != Role::Admin {
        return Err(ServiceError::NotFound);
    }
    Ok(client)
}

pub fn list_clients<R>(
    repo: &R,
    user: &AuthenticatedUser,
    mut query: ClientListQuery,
) -> ServiceResult<(usize, Vec<Client>)>
where
    R: ClientReader + ?Sized,
{
    // Only Admins may see soft-deleted records.
    if user.role != Role::Admin {
        query.include_deleted = false;
    }
    repo.list_clients(query).map_err(ServiceError::from)
}

/// Intake: creates the client together with its initial repair appointment.
pub fn create_client<R>(
    repo: &R,
    user: &AuthenticatedUser,
    new_client: NewClient,
    first_appointment_at: Option<chrono::NaiveDateTime>,
) -> ServiceResult<Client>
where
    R: ClientWriter + AppointmentWriter + AuditLogWriter + ?Sized,
{
    if !user.permissions().manage_clients {
        return Err(ServiceError::Unauthorized);
    }

    let client = repo.create_client(&new_client)?;

    let appointment = NewAppointment::new(
        format!("Repair - {}", client.name),
        first_appointment_at.unwrap_or_else(|| Utc::now().naive_utc()),
        AppointmentKind::Repair,
        sync::repair_to_appointment_status(client.repair_status),
        user.id,
    )?
    .for_client(client.id, &client.name, &client.vehicle.info());
    repo.create_appointment(&appointment)?;

    crate::services::audit::record_or_log(
        repo,
        &NewAuditLog::new(
            AuditEntityType::Client,
            client.id,
            AuditAction::Create,
            user.id,
            user.role,
        )
        .metadata(json!({ "name": client.name })),
    );

    Ok(client)
}

fn option_json<T: serde::Serialize>(value: &Option<T>) -> serde_json::Value {
    value
        .as_ref()
        .map(|v| json!(v))
        .unwrap_or(serde_json::Value::Null)
}

/// Before/after pairs for the fields a full update can touch; unchanged
/// fields are omitted from the audit entry.
fn collect_update_changes(before: &Client, after: &Client) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    if before.name != after.name {
        changes.push(FieldChange::new("name", json!(before.name), json!(after.name)));
    }
    if before.email != after.email {
        changes.push(FieldChange::new(
            "email",
            option_json(&before.email),
            option_json(&after.email),
        ));
    }
    if before.phone != after.phone {
        changes.push(FieldChange::new(
            "phone",
            option_json(&before.phone),
            option_json(&after.phone),
        ));
    }
    if before.address != after.address {
        changes.push(FieldChange::new(
            "address",
            option_json(&before.address),
            option_json(&after.address),
        ));
    }
    if before.vehicle != after.vehicle {
        changes.push(FieldChange::new(
            "vehicle",
            json!(before.vehicle.info()),
            json!(after.vehicle.info()),
        ));
    }
    if before.issue_description != after.issue_description {
        changes.push(FieldChange::new(
            "issue_description",
            option_json(&before.issue_description),
            option_json(&after.issue_description),
        ));
    }
    if before.procedures != after.procedures {
        changes.push(FieldChange::new(
            "procedures",
            option_json(&before.procedures),
            option_json(&after.procedures),
        ));
    }
    if before.estimated_cost != after.estimated_cost {
        changes.push(FieldChange::new(
            "estimated_cost",
            option_json(&before.estimated_cost),
            option_json(&after.estimated_cost),
        ));
    }
    changes
}

/// Full-field update (Admin/Accountant), with propagation to the client's
/// appointments afterwards.
pub fn update_client<R>(
    repo: &R,
    user: &AuthenticatedUser,
    client_id: i32,
    updates: UpdateClient,
) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + AppointmentReader + AppointmentWriter + AuditLogWriter + ?Sized,
{
    if !user.permissions().manage_clients {
        return Err(ServiceError::Unauthorized);
    }

    let before = get_client(repo, user, client_id)?;
    let after = repo.update_client(client_id, &updates)?;

    sync::propagate_client_update(repo, &before, &after)?;

    let changes = collect_update_changes(&before, &after);
    if !changes.is_empty() {
        crate::services::audit::record_or_log(
            repo,
            &NewAuditLog::new(
                AuditEntityType::Client,
                client_id,
                AuditAction::Update,
                user.id,
                user.role,
            )
            .changes(changes),
        );
    }

    Ok(after)
}

/// Repair-status transitions a Mechanic may initiate; anything else is a
/// permission error raised before any write.
const MECHANIC_ALLOWED_TARGETS: [RepairStatus; 2] =
    [RepairStatus::InProgress, RepairStatus::Completed];

/// Repair-status change, open to every authenticated role with per-role
/// restrictions. The delivery gate rejects `Delivered` until the bill is
/// settled.
pub fn update_repair_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    client_id: i32,
    new_status: RepairStatus,
) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + AppointmentReader + AppointmentWriter + AuditLogWriter + ?Sized,
{
    if user.role == Role::Mechanic && !MECHANIC_ALLOWED_TARGETS.contains(&new_status) {
        return Err(ServiceError::Unauthorized);
    }

    let before = get_client(repo, user, client_id)?;

    if new_status == RepairStatus::Delivered
        && before.payment_status != crate::domain::client::PaymentStatus::Paid
    {
        return Err(ServiceError::Validation(
            "client cannot be marked delivered until the payment is settled".to_string(),
        ));
    }

    if before.repair_status == new_status {
        return Ok(before);
    }

    let after = repo.apply_client_sync(
        client_id,
        &ClientSyncUpdate {
            repair_status: Some(new_status),
            updated_by: Some(user.id),
            ..ClientSyncUpdate::default()
        },
    )?;

    sync::propagate_client_update(repo, &before, &after)?;

    let action = if new_status == RepairStatus::Delivered {
        AuditAction::Delivery
    } else {
        AuditAction::StatusChange
    };
    crate::services::audit::record_or_log(
        repo,
        &NewAuditLog::new(AuditEntityType::Client, client_id, action, user.id, user.role).changes(
            vec![FieldChange::new(
                "repair_status",
                json!(before.repair_status),
                json!(new_status),
            )],
        ),
    );

    Ok(after)
}

/// Soft delete: the record is tagged, not removed, and drops out of default
/// listings. Admin only.
pub fn delete_client<R>(
    repo: &R,
    user: &AuthenticatedUser,
    client_id: i32,
) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + AuditLogWriter + ?Sized,
{
    if !user.permissions().delete_records {
        return Err(ServiceError::Unauthorized);
    }

    let before = repo
        .get_client_by_id(client_id)?
        .ok_or(ServiceError::NotFound)?;
    if before.record_state == RecordState::Deleted {
        return Ok(before);
    }

    let client = repo.set_client_record_state(client_id, RecordState::Deleted, user.id)?;

    crate::services::audit::record_or_log(
        repo,
        &NewAuditLog::new(
            AuditEntityType::Client,
            client_id,
            AuditAction::Delete,
            user.id,
            user.role,
        ),
    );

    Ok(client)
}

/// Brings a soft-deleted client back. Admin only.
pub fn restore_client<R>(
    repo: &R,
    user: &AuthenticatedUser,
    client_id: i32,
) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + AuditLogWriter + ?Sized,
{
    if !user.permissions().delete_records {
        return Err(ServiceError::Unauthorized);
    }

    let before = repo
        .get_client_by_id(client_id)?
        .ok_or(ServiceError::NotFound)?;
    if before.record_state == RecordState::Active {
        return Ok(before);
    }

    let client = repo.set_client_record_state(client_id, RecordState::Active, user.id)?;

    crate::services::audit::record_or_log(
        repo,
        &NewAuditLog::new(
            AuditEntityType::Client,
            client_id,
            AuditAction::Restore,
            user.id,
            user.role,
        ),
    );

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::PaymentStatus;
    use crate::repository::mock::MockRepository;

    fn admin() -> AuthenticatedUser {
        AuthenticatedUser {
            id: 1,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: Role::Admin,
        }
    }

    fn mechanic() -> AuthenticatedUser {
        AuthenticatedUser {
            id: 3,
            name: "Max".into(),
            email: "max@example.com".into(),
            role: Role::Mechanic,
        }
    }

    fn waiting_client() -> Client {
        Client {
            id: 7,
            name: "Alice".into(),
            repair_status: RepairStatus::Waiting,
            payment_status: PaymentStatus::NotPaid,
            ..Client::default()
        }
    }

    #[test]
    fn mechanic_may_only_start_or_finish_repairs() {
        let repo = MockRepository::new();
        for target in [
            RepairStatus::Waiting,
            RepairStatus::Delivered,
            RepairStatus::Cancelled,
        ] {
            // Rejected before any repository call.
            let result = update_repair_status(&repo, &mechanic(), 7, target);
            assert!(matches!(result, Err(ServiceError::Unauthorized)));
        }
    }

    #[test]
    fn delivery_gate_rejects_unpaid_client() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|_| Ok(Some(waiting_client())));
        repo.expect_apply_client_sync().times(0);
        repo.expect_append_audit_log().times(0);

        let result = update_repair_status(&repo, &admin(), 7, RepairStatus::Delivered);
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn delivery_succeeds_once_paid() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id().returning(|_| {
            Ok(Some(Client {
                payment_status: PaymentStatus::Paid,
                ..waiting_client()
            }))
        });
        repo.expect_apply_client_sync()
            .withf(|_, update| update.repair_status == Some(RepairStatus::Delivered))
            .times(1)
            .returning(|_, _| {
                Ok(Client {
                    repair_status: RepairStatus::Delivered,
                    payment_status: PaymentStatus::Paid,
                    ..waiting_client()
                })
            });
        repo.expect_list_appointments().returning(|_| Ok((0, vec![])));
        repo.expect_append_audit_log()
            .withf(|entry| entry.action == AuditAction::Delivery)
            .times(1)
            .returning(|_| Err(crate::repository::errors::RepositoryError::NotFound));

        // The audit failure above is swallowed; the call still succeeds.
        let client = update_repair_status(&repo, &admin(), 7, RepairStatus::Delivered).unwrap();
        assert_eq!(client.repair_status, RepairStatus::Delivered);
    }

    #[test]
    fn unchanged_status_issues_no_write() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|_| Ok(Some(waiting_client())));
        repo.expect_apply_client_sync().times(0);

        let client = update_repair_status(&repo, &admin(), 7, RepairStatus::Waiting).unwrap();
        assert_eq!(client.repair_status, RepairStatus::Waiting);
    }

    #[test]
    fn status_change_audits_old_and_new_value() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|_| Ok(Some(waiting_client())));
        repo.expect_apply_client_sync().returning(|_, _| {
            Ok(Client {
                repair_status: RepairStatus::Completed,
                ..waiting_client()
            })
        });
        repo.expect_list_appointments().returning(|_| Ok((0, vec![])));
        repo.expect_append_audit_log()
            .withf(|entry| {
                entry.action == AuditAction::StatusChange
                    && entry.changes.len() == 1
                    && entry.changes[0].field == "repair_status"
                    && entry.changes[0].old_value == json!("waiting")
                    && entry.changes[0].new_value == json!("completed")
            })
            .times(1)
            .returning(|entry| {
                Ok(crate::domain::audit::AuditLog {
                    id: 1,
                    entity_type: entry.entity_type,
                    entity_id: entry.entity_id,
                    action: entry.action,
                    user_id: entry.user_id,
                    user_role: entry.user_role,
                    changes: entry.changes.clone(),
                    metadata: entry.metadata.clone(),
                    created_at: Utc::now().naive_utc(),
                })
            });

        update_repair_status(&repo, &admin(), 7, RepairStatus::Completed).unwrap();
    }

    #[test]
    fn soft_deleted_client_is_hidden_from_non_admins() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id().returning(|_| {
            Ok(Some(Client {
                record_state: RecordState::Deleted,
                ..waiting_client()
            }))
        });

        assert!(matches!(
            get_client(&repo, &mechanic(), 7),
            Err(ServiceError::NotFound)
        ));
        assert!(get_client(&repo, &admin(), 7).is_ok());
    }

    #[test]
    fn delete_and_restore_are_admin_only() {
        let repo = MockRepository::new();
        let accountant = AuthenticatedUser {
            id: 2,
            name: "Acc".into(),
            email: "acc@example.com".into(),
            role: Role::Accountant,
        };
        assert!(matches!(
            delete_client(&repo, &accountant, 7),
            Err(ServiceError::Unauthorized)
        ));
        assert!(matches!(
            restore_client(&repo, &accountant, 7),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn create_client_schedules_initial_appointment() {
        let mut repo = MockRepository::new();
        repo.expect_create_client()
            .returning(|_| Ok(waiting_client()));
        repo.expect_create_appointment()
            .withf(|appointment| {
                appointment.title == "Repair - Alice"
                    && appointment.client_id == Some(7)
                    && appointment.kind == AppointmentKind::Repair
                    && appointment.status
                        == crate::domain::appointment::AppointmentStatus::Scheduled
            })
            .times(1)
            .returning(|_| Ok(crate::domain::appointment::Appointment::default()));
        repo.expect_append_audit_log()
            .withf(|entry| entry.action == AuditAction::Create)
            .times(1)
            .returning(|_| Err(crate::repository::errors::RepositoryError::NotFound));

        let new_client = NewClient::new(
            "Alice".into(),
            None,
            None,
            None,
            Default::default(),
            None,
            None,
            1,
        )
        .unwrap();
        create_client(&repo, &admin(), new_client, None).unwrap();
    }

    #[test]
    fn mechanic_cannot_create_clients() {
        let repo = MockRepository::new();
        let new_client = NewClient::new(
            "Alice".into(),
            None,
            None,
            None,
            Default::default(),
            None,
            None,
            3,
        )
        .unwrap();
        assert!(matches!(
            create_client(&repo, &mechanic(), new_client, None),
            Err(ServiceError::Unauthorized)
        ));
    }
}
