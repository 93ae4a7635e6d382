//! Cross-entity synchronizer.
//!
//! Keeps `Client` and `Appointment` state mutually consistent after either is
//! independently edited. Runs synchronously inside the request that performed
//! the primary write; every propagation is idempotent, so re-running it with
//! unchanged inputs issues zero writes.

use chrono::Utc;

use crate::domain::appointment::{
    Appointment, AppointmentKind, AppointmentStatus, AppointmentSyncUpdate,
};
use crate::domain::client::{Client, ClientSyncUpdate, RepairStatus};
use crate::repository::errors::RepositoryError;
use crate::repository::{
    AppointmentListQuery, AppointmentReader, AppointmentWriter, ClientReader, ClientWriter,
};
use crate::services::ServiceResult;

/// Fixed mapping from a client's repair status to the status of its linked
/// repair appointments.
pub fn repair_to_appointment_status(status: RepairStatus) -> AppointmentStatus {
    match status {
        RepairStatus::Waiting => AppointmentStatus::Scheduled,
        RepairStatus::InProgress => AppointmentStatus::InProgress,
        RepairStatus::Completed | RepairStatus::Delivered => AppointmentStatus::Completed,
        RepairStatus::Cancelled => AppointmentStatus::Cancelled,
    }
}

/// Inverse mapping applied when a repair appointment's status changes. An
/// appointment in `Waiting` leaves the client untouched.
pub fn appointment_to_repair_status(status: AppointmentStatus) -> Option<RepairStatus> {
    match status {
        AppointmentStatus::Scheduled => Some(RepairStatus::Waiting),
        AppointmentStatus::InProgress => Some(RepairStatus::InProgress),
        AppointmentStatus::Completed => Some(RepairStatus::Completed),
        AppointmentStatus::Cancelled => Some(RepairStatus::Cancelled),
        AppointmentStatus::Waiting => None,
    }
}

/// Computes the derived write for one appointment after a client mutation.
/// Returns an empty update when nothing effectively changed.
fn appointment_changes(
    before: &Client,
    after: &Client,
    appointment: &Appointment,
) -> AppointmentSyncUpdate {
    let mut update = AppointmentSyncUpdate::default();

    // Denormalized name fix-up, including a stale occurrence inside the
    // title. Both are keyed on the stored client_name still being out of
    // date, so an already-synced appointment is left alone.
    if before.name != after.name
        && appointment.client_name.as_deref() != Some(after.name.as_str())
    {
        update.client_name = Some(after.name.clone());
        if appointment.title.contains(before.name.as_str()) {
            update.title = Some(appointment.title.replace(before.name.as_str(), &after.name));
        }
    }

    if before.vehicle != after.vehicle {
        let info = after.vehicle.info();
        if appointment.vehicle_info.as_deref() != Some(info.as_str()) {
            update.vehicle_info = Some(info);
        }
    }

    if before.repair_status != after.repair_status && appointment.kind == AppointmentKind::Repair {
        let mapped = repair_to_appointment_status(after.repair_status);
        if appointment.status != mapped {
            update.status = Some(mapped);
        }
        if after.repair_status == RepairStatus::Completed && appointment.delivery_date.is_none() {
            update.delivery_date = Some(Utc::now().naive_utc());
        }
    }

    update
}

/// Client → Appointment propagation, invoked after any client update.
///
/// Returns the number of appointments that actually received a write. An
/// appointment deleted between the lookup and the write is skipped.
pub fn propagate_client_update<R>(repo: &R, before: &Client, after: &Client) -> ServiceResult<usize>
where
    R: AppointmentReader + AppointmentWriter + ?Sized,
{
    let (_, appointments) = repo.list_appointments(AppointmentListQuery::new().client(after.id))?;

    let mut written = 0;
    for appointment in appointments {
        let update = appointment_changes(before, after, &appointment);
        if update.is_empty() {
            continue;
        }
        match repo.apply_appointment_sync(appointment.id, &update) {
            Ok(_) => written += 1,
            Err(RepositoryError::NotFound) => {}
            Err(err) => return Err(err.into()),
        }
    }
    Ok(written)
}

/// Appointment → Client propagation, invoked after an appointment is created
/// or updated. `before` is `None` on create.
///
/// A missing linked client (or a client deleted mid-request) is a silent
/// no-op: the appointment write already succeeded and stands on its own.
pub fn propagate_appointment_change<R>(
    repo: &R,
    before: Option<&Appointment>,
    after: &Appointment,
) -> ServiceResult<()>
where
    R: AppointmentReader + ClientReader + ClientWriter + ?Sized,
{
    let Some(client_id) = after.client_id else {
        return Ok(());
    };
    let Some(client) = repo.get_client_by_id(client_id)? else {
        return Ok(());
    };

    let mut update = ClientSyncUpdate::default();
    let now = Utc::now().naive_utc();

    if after.kind == AppointmentKind::Repair {
        if let Some(mapped) = appointment_to_repair_status(after.status)
            && client.repair_status != mapped
        {
            update.repair_status = Some(mapped);
        }

        let completed_now = after.status == AppointmentStatus::Completed
            && before.is_none_or(|b| b.status != AppointmentStatus::Completed);
        if completed_now {
            update.last_service_date = Some(now);
        }
    }

    // The earliest future scheduled appointment drives the client's
    // next-appointment display. Status flips also move appointments in and
    // out of the scheduled set, so both trigger the recompute.
    let schedule_changed =
        before.is_none_or(|b| b.scheduled_at != after.scheduled_at || b.status != after.status);
    if schedule_changed {
        let next = repo.next_scheduled_for_client(client_id, now)?;
        if client.next_appointment_date != next {
            update.next_appointment_date = Some(next);
        }
    }

    if update.is_empty() {
        return Ok(());
    }
    match repo.apply_client_sync(client_id, &update) {
        Ok(_) => Ok(()),
        Err(RepositoryError::NotFound) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::Vehicle;
    use crate::repository::mock::MockRepository;
    use chrono::{Duration, Utc};
    use mockall::predicate::eq;

    fn client(name: &str, status: RepairStatus) -> Client {
        Client {
            id: 1,
            name: name.to_string(),
            vehicle: Vehicle {
                year: Some(2019),
                make: "Toyota".into(),
                model: "Corolla".into(),
            },
            repair_status: status,
            ..Client::default()
        }
    }

    fn repair_appointment(status: AppointmentStatus) -> Appointment {
        Appointment {
            id: 10,
            title: "Repair - Alice".into(),
            client_id: Some(1),
            client_name: Some("Alice".into()),
            vehicle_info: Some("2019 Toyota Corolla".into()),
            kind: AppointmentKind::Repair,
            status,
            ..Appointment::default()
        }
    }

    #[test]
    fn status_mapping_matches_fixed_table() {
        assert_eq!(
            repair_to_appointment_status(RepairStatus::Waiting),
            AppointmentStatus::Scheduled
        );
        assert_eq!(
            repair_to_appointment_status(RepairStatus::InProgress),
            AppointmentStatus::InProgress
        );
        assert_eq!(
            repair_to_appointment_status(RepairStatus::Completed),
            AppointmentStatus::Completed
        );
        assert_eq!(
            repair_to_appointment_status(RepairStatus::Delivered),
            AppointmentStatus::Completed
        );
        assert_eq!(
            repair_to_appointment_status(RepairStatus::Cancelled),
            AppointmentStatus::Cancelled
        );
    }

    #[test]
    fn inverse_mapping_matches_fixed_table() {
        assert_eq!(
            appointment_to_repair_status(AppointmentStatus::Scheduled),
            Some(RepairStatus::Waiting)
        );
        assert_eq!(
            appointment_to_repair_status(AppointmentStatus::InProgress),
            Some(RepairStatus::InProgress)
        );
        assert_eq!(
            appointment_to_repair_status(AppointmentStatus::Completed),
            Some(RepairStatus::Completed)
        );
        assert_eq!(
            appointment_to_repair_status(AppointmentStatus::Cancelled),
            Some(RepairStatus::Cancelled)
        );
        assert_eq!(appointment_to_repair_status(AppointmentStatus::Waiting), None);
    }

    #[test]
    fn completed_repair_status_updates_appointment_and_sets_delivery_date() {
        let before = client("Alice", RepairStatus::Waiting);
        let after = client("Alice", RepairStatus::Completed);

        let mut repo = MockRepository::new();
        repo.expect_list_appointments()
            .returning(|_| Ok((1, vec![repair_appointment(AppointmentStatus::Scheduled)])));
        repo.expect_apply_appointment_sync()
            .withf(|id, update| {
                *id == 10
                    && update.status == Some(AppointmentStatus::Completed)
                    && update.delivery_date.is_some()
                    && update.client_name.is_none()
                    && update.vehicle_info.is_none()
            })
            .times(1)
            .returning(|_, _| Ok(repair_appointment(AppointmentStatus::Completed)));

        let written = propagate_client_update(&repo, &before, &after).unwrap();
        assert_eq!(written, 1);
    }

    #[test]
    fn delivery_date_is_not_overwritten() {
        let before = client("Alice", RepairStatus::InProgress);
        let after = client("Alice", RepairStatus::Completed);

        let mut repo = MockRepository::new();
        repo.expect_list_appointments().returning(|_| {
            let mut appointment = repair_appointment(AppointmentStatus::InProgress);
            appointment.delivery_date = Some(Utc::now().naive_utc());
            Ok((1, vec![appointment]))
        });
        repo.expect_apply_appointment_sync()
            .withf(|_, update| {
                update.status == Some(AppointmentStatus::Completed)
                    && update.delivery_date.is_none()
            })
            .times(1)
            .returning(|_, _| Ok(repair_appointment(AppointmentStatus::Completed)));

        propagate_client_update(&repo, &before, &after).unwrap();
    }

    #[test]
    fn propagation_is_idempotent_for_unchanged_appointment() {
        // The appointment already carries every derived value: second run of
        // the same propagation must issue zero writes.
        let before = client("Alice", RepairStatus::Waiting);
        let after = client("Alice", RepairStatus::Completed);

        let mut repo = MockRepository::new();
        repo.expect_list_appointments().returning(|_| {
            let mut appointment = repair_appointment(AppointmentStatus::Completed);
            appointment.delivery_date = Some(Utc::now().naive_utc());
            Ok((1, vec![appointment]))
        });
        repo.expect_apply_appointment_sync().times(0);

        let written = propagate_client_update(&repo, &before, &after).unwrap();
        assert_eq!(written, 0);
    }

    #[test]
    fn rename_fixes_denormalized_name_and_title_once() {
        let before = client("Bob", RepairStatus::Waiting);
        let after = client("Bobby", RepairStatus::Waiting);

        let mut repo = MockRepository::new();
        repo.expect_list_appointments().returning(|_| {
            let mut appointment = repair_appointment(AppointmentStatus::Scheduled);
            appointment.title = "Repair - Bob".into();
            appointment.client_name = Some("Bob".into());
            Ok((1, vec![appointment]))
        });
        repo.expect_apply_appointment_sync()
            .withf(|_, update| {
                update.client_name.as_deref() == Some("Bobby")
                    && update.title.as_deref() == Some("Repair - Bobby")
            })
            .times(1)
            .returning(|_, _| Ok(repair_appointment(AppointmentStatus::Scheduled)));

        propagate_client_update(&repo, &before, &after).unwrap();

        // Re-running against the synced appointment must not touch the title
        // again even though "Bob" is still a substring of "Bobby".
        let mut repo = MockRepository::new();
        repo.expect_list_appointments().returning(|_| {
            let mut appointment = repair_appointment(AppointmentStatus::Scheduled);
            appointment.title = "Repair - Bobby".into();
            appointment.client_name = Some("Bobby".into());
            Ok((1, vec![appointment]))
        });
        repo.expect_apply_appointment_sync().times(0);

        let written = propagate_client_update(&repo, &before, &after).unwrap();
        assert_eq!(written, 0);
    }

    #[test]
    fn vehicle_change_rewrites_denormalized_info() {
        let before = client("Alice", RepairStatus::Waiting);
        let mut after = client("Alice", RepairStatus::Waiting);
        after.vehicle.model = "Camry".into();

        let mut repo = MockRepository::new();
        repo.expect_list_appointments()
            .returning(|_| Ok((1, vec![repair_appointment(AppointmentStatus::Scheduled)])));
        repo.expect_apply_appointment_sync()
            .withf(|_, update| update.vehicle_info.as_deref() == Some("2019 Toyota Camry"))
            .times(1)
            .returning(|_, _| Ok(repair_appointment(AppointmentStatus::Scheduled)));

        propagate_client_update(&repo, &before, &after).unwrap();
    }

    #[test]
    fn non_repair_appointment_ignores_status_change() {
        let before = client("Alice", RepairStatus::Waiting);
        let after = client("Alice", RepairStatus::Cancelled);

        let mut repo = MockRepository::new();
        repo.expect_list_appointments().returning(|_| {
            let mut appointment = repair_appointment(AppointmentStatus::Scheduled);
            appointment.kind = AppointmentKind::Inspection;
            Ok((1, vec![appointment]))
        });
        repo.expect_apply_appointment_sync().times(0);

        let written = propagate_client_update(&repo, &before, &after).unwrap();
        assert_eq!(written, 0);
    }

    #[test]
    fn appointment_deleted_mid_propagation_is_skipped() {
        let before = client("Alice", RepairStatus::Waiting);
        let after = client("Alice", RepairStatus::InProgress);

        let mut repo = MockRepository::new();
        repo.expect_list_appointments()
            .returning(|_| Ok((1, vec![repair_appointment(AppointmentStatus::Scheduled)])));
        repo.expect_apply_appointment_sync()
            .returning(|_, _| Err(RepositoryError::NotFound));

        let written = propagate_client_update(&repo, &before, &after).unwrap();
        assert_eq!(written, 0);
    }

    #[test]
    fn appointment_status_flows_back_to_client() {
        let before = repair_appointment(AppointmentStatus::Scheduled);
        let mut after = repair_appointment(AppointmentStatus::InProgress);
        after.scheduled_at = before.scheduled_at;

        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .with(eq(1))
            .returning(|_| Ok(Some(client("Alice", RepairStatus::Waiting))));
        repo.expect_next_scheduled_for_client()
            .returning(|_, _| Ok(None));
        repo.expect_apply_client_sync()
            .withf(|id, update| {
                *id == 1 && update.repair_status == Some(RepairStatus::InProgress)
            })
            .times(1)
            .returning(|_, _| Ok(client("Alice", RepairStatus::InProgress)));

        propagate_appointment_change(&repo, Some(&before), &after).unwrap();
    }

    #[test]
    fn completed_repair_appointment_stamps_last_service_date() {
        let before = repair_appointment(AppointmentStatus::InProgress);
        let after = repair_appointment(AppointmentStatus::Completed);

        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|_| Ok(Some(client("Alice", RepairStatus::InProgress))));
        repo.expect_next_scheduled_for_client()
            .returning(|_, _| Ok(None));
        repo.expect_apply_client_sync()
            .withf(|_, update| {
                update.repair_status == Some(RepairStatus::Completed)
                    && update.last_service_date.is_some()
            })
            .times(1)
            .returning(|_, _| Ok(client("Alice", RepairStatus::Completed)));

        propagate_appointment_change(&repo, Some(&before), &after).unwrap();
    }

    #[test]
    fn waiting_appointment_status_leaves_client_untouched() {
        let before = repair_appointment(AppointmentStatus::Scheduled);
        let mut after = repair_appointment(AppointmentStatus::Waiting);
        after.scheduled_at = before.scheduled_at;

        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|_| Ok(Some(client("Alice", RepairStatus::Waiting))));
        // Status changed, so the schedule recompute still runs.
        repo.expect_next_scheduled_for_client()
            .returning(|_, _| Ok(None));
        repo.expect_apply_client_sync().times(0);

        propagate_appointment_change(&repo, Some(&before), &after).unwrap();
    }

    #[test]
    fn rescheduling_updates_next_appointment_date() {
        let soon = Utc::now().naive_utc() + Duration::days(3);
        let before = repair_appointment(AppointmentStatus::Scheduled);
        let mut after = repair_appointment(AppointmentStatus::Scheduled);
        after.scheduled_at = soon;

        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|_| Ok(Some(client("Alice", RepairStatus::Waiting))));
        repo.expect_next_scheduled_for_client()
            .returning(move |_, _| Ok(Some(soon)));
        repo.expect_apply_client_sync()
            .withf(move |_, update| update.next_appointment_date == Some(Some(soon)))
            .times(1)
            .returning(|_, _| Ok(client("Alice", RepairStatus::Waiting)));

        propagate_appointment_change(&repo, Some(&before), &after).unwrap();
    }

    #[test]
    fn unlinked_or_orphaned_appointment_is_a_no_op() {
        let mut unlinked = repair_appointment(AppointmentStatus::Completed);
        unlinked.client_id = None;
        let repo = MockRepository::new();
        propagate_appointment_change(&repo, None, &unlinked).unwrap();

        let orphaned = repair_appointment(AppointmentStatus::Completed);
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id().returning(|_| Ok(None));
        repo.expect_apply_client_sync().times(0);
        propagate_appointment_change(&repo, None, &orphaned).unwrap();
    }
}
