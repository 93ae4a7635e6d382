//! Appointment business logic. Any authenticated role may schedule, edit or
//! delete appointments; status changes flow back to the linked client
//! through the synchronizer.

use crate::domain::appointment::{Appointment, NewAppointment, UpdateAppointment};
use crate::domain::audit::{AuditAction, AuditEntityType, FieldChange, NewAuditLog};
use crate::repository::{
    AppointmentListQuery, AppointmentReader, AppointmentWriter, AuditLogWriter, ClientReader,
    ClientWriter,
};
use crate::domain::user::AuthenticatedUser;
use crate::services::{ServiceError, ServiceResult, sync};
use serde_json::json;

pub fn get_appointment<R>(repo: &R, appointment_id: i32) -> ServiceResult<Appointment>
where
    R: AppointmentReader + ?Sized,
{
    repo.get_appointment_by_id(appointment_id)?
        .ok_or(ServiceError::NotFound)
}

pub fn list_appointments<R>(
    repo: &R,
    query: AppointmentListQuery,
) -> ServiceResult<(usize, Vec<Appointment>)>
where
    R: AppointmentReader + ?Sized,
{
    repo.list_appointments(query).map_err(ServiceError::from)
}

/// Creates an appointment; when it is linked to a client the client's
/// derived fields (repair status, next appointment date) are brought in
/// step immediately.
pub fn create_appointment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    new_appointment: NewAppointment,
) -> ServiceResult<Appointment>
where
    R: AppointmentReader + AppointmentWriter + ClientReader + ClientWriter + AuditLogWriter + ?Sized,
{
    let appointment = repo.create_appointment(&new_appointment)?;

    sync::propagate_appointment_change(repo, None, &appointment)?;

    if appointment.client_id.is_some() {
        crate::services::audit::record_or_log(
            repo,
            &NewAuditLog::new(
                AuditEntityType::Appointment,
                appointment.id,
                AuditAction::Create,
                user.id,
                user.role,
            )
            .metadata(json!({ "title": appointment.title })),
        );
    }

    Ok(appointment)
}

/// Updates an appointment and propagates the result to the linked client.
pub fn update_appointment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    appointment_id: i32,
    updates: UpdateAppointment,
) -> ServiceResult<Appointment>
where
    R: AppointmentReader + AppointmentWriter + ClientReader + ClientWriter + AuditLogWriter + ?Sized,
{
    let before = get_appointment(repo, appointment_id)?;
    let after = repo.update_appointment(appointment_id, &updates)?;

    sync::propagate_appointment_change(repo, Some(&before), &after)?;

    if before.status != after.status {
        crate::services::audit::record_or_log(
            repo,
            &NewAuditLog::new(
                AuditEntityType::Appointment,
                appointment_id,
                AuditAction::StatusChange,
                user.id,
                user.role,
            )
            .changes(vec![FieldChange::new(
                "status",
                json!(before.status),
                json!(after.status),
            )]),
        );
    }

    Ok(after)
}

/// Hard delete; appointments carry no soft-delete state. The linked
/// client's next-appointment date is recomputed afterwards.
pub fn delete_appointment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    appointment_id: i32,
) -> ServiceResult<()>
where
    R: AppointmentReader + AppointmentWriter + ClientReader + ClientWriter + AuditLogWriter + ?Sized,
{
    let appointment = get_appointment(repo, appointment_id)?;
    repo.delete_appointment(appointment_id)?;

    // Removing a scheduled appointment may change which one is next.
    if let Some(client_id) = appointment.client_id
        && let Some(client) = repo.get_client_by_id(client_id)?
    {
        let next =
            repo.next_scheduled_for_client(client_id, chrono::Utc::now().naive_utc())?;
        if client.next_appointment_date != next {
            let update = crate::domain::client::ClientSyncUpdate {
                next_appointment_date: Some(next),
                ..Default::default()
            };
            match repo.apply_client_sync(client_id, &update) {
                // Client vanished mid-request; nothing left to sync.
                Ok(_) | Err(crate::repository::errors::RepositoryError::NotFound) => {}
                Err(err) => return Err(err.into()),
            }
        }
    }

    crate::services::audit::record_or_log(
        repo,
        &NewAuditLog::new(
            AuditEntityType::Appointment,
            appointment_id,
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
    use crate::domain::appointment::{AppointmentKind, AppointmentStatus};
    use crate::domain::client::Client;
    use crate::domain::user::Role;
    use crate::repository::mock::MockRepository;
    use chrono::Utc;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: 3,
            name: "Max".into(),
            email: "max@example.com".into(),
            role: Role::Mechanic,
        }
    }

    fn linked_appointment(status: AppointmentStatus) -> Appointment {
        Appointment {
            id: 11,
            title: "Repair - Alice".into(),
            client_id: Some(1),
            kind: AppointmentKind::Repair,
            status,
            ..Appointment::default()
        }
    }

    #[test]
    fn status_change_propagates_and_audits() {
        let mut repo = MockRepository::new();
        repo.expect_get_appointment_by_id()
            .returning(|_| Ok(Some(linked_appointment(AppointmentStatus::Scheduled))));
        repo.expect_update_appointment()
            .returning(|_, _| Ok(linked_appointment(AppointmentStatus::InProgress)));
        repo.expect_get_client_by_id().returning(|_| {
            Ok(Some(Client {
                id: 1,
                ..Client::default()
            }))
        });
        repo.expect_next_scheduled_for_client()
            .returning(|_, _| Ok(None));
        repo.expect_apply_client_sync()
            .withf(|_, update| {
                update.repair_status == Some(crate::domain::client::RepairStatus::InProgress)
            })
            .times(1)
            .returning(|_, _| Ok(Client::default()));
        repo.expect_append_audit_log()
            .withf(|entry| {
                entry.entity_type == AuditEntityType::Appointment
                    && entry.action == AuditAction::StatusChange
            })
            .times(1)
            .returning(|_| Err(crate::repository::errors::RepositoryError::NotFound));

        let updates = UpdateAppointment {
            title: "Repair - Alice".into(),
            scheduled_at: Utc::now().naive_utc(),
            kind: AppointmentKind::Repair,
            status: AppointmentStatus::InProgress,
            invoice_id: None,
        };
        update_appointment(&repo, &user(), 11, updates).unwrap();
    }

    #[test]
    fn delete_recomputes_next_appointment_date() {
        let later = Utc::now().naive_utc() + chrono::Duration::days(5);
        let mut repo = MockRepository::new();
        repo.expect_get_appointment_by_id()
            .returning(|_| Ok(Some(linked_appointment(AppointmentStatus::Scheduled))));
        repo.expect_delete_appointment()
            .times(1)
            .returning(|_| Ok(()));
        repo.expect_get_client_by_id().returning(move |_| {
            Ok(Some(Client {
                id: 1,
                next_appointment_date: Some(later),
                ..Client::default()
            }))
        });
        repo.expect_next_scheduled_for_client()
            .returning(|_, _| Ok(None));
        repo.expect_apply_client_sync()
            .withf(|_, update| update.next_appointment_date == Some(None))
            .times(1)
            .returning(|_, _| Ok(Client::default()));
        repo.expect_append_audit_log()
            .returning(|_| Err(crate::repository::errors::RepositoryError::NotFound));

        delete_appointment(&repo, &user(), 11).unwrap();
    }

    #[test]
    fn missing_appointment_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_appointment_by_id().returning(|_| Ok(None));
        assert!(matches!(
            get_appointment(&repo, 99),
            Err(ServiceError::NotFound)
        ));
    }
}
