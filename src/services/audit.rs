//! Audit trail service.
//!
//! Writes are best-effort by design: callers invoke [`record`] through
//! [`record_or_log`], which logs a failure and deliberately discards it so
//! the primary mutation's outcome is never affected.

use crate::domain::audit::{AuditEntityType, AuditLog, NewAuditLog};
use crate::domain::client::Client;
use crate::repository::{AuditListQuery, AuditLogReader, AuditLogWriter, ClientReader};
use crate::services::{ServiceError, ServiceResult};

/// Appends one audit entry.
pub fn record<R>(repo: &R, entry: &NewAuditLog) -> ServiceResult<AuditLog>
where
    R: AuditLogWriter + ?Sized,
{
    repo.append_audit_log(entry).map_err(ServiceError::from)
}

/// Best-effort append: the error channel is consumed here, on purpose, and
/// only surfaces in the server log.
pub fn record_or_log<R>(repo: &R, entry: &NewAuditLog)
where
    R: AuditLogWriter + ?Sized,
{
    if let Err(err) = record(repo, entry) {
        log::error!(
            "Failed to write audit log for {} {}: {err}",
            entry.entity_type,
            entry.entity_id
        );
    }
}

/// Audit trail for one entity, newest first, capped by the query limit.
pub fn entity_audit_trail<R>(repo: &R, query: AuditListQuery) -> ServiceResult<Vec<AuditLog>>
where
    R: AuditLogReader + ?Sized,
{
    repo.list_audit_logs(query).map_err(ServiceError::from)
}

/// Audit trail for a client together with its display name. Soft-deleted
/// clients keep their trail readable.
pub fn client_audit_trail<R>(
    repo: &R,
    client_id: i32,
    limit: usize,
) -> ServiceResult<(Client, Vec<AuditLog>)>
where
    R: AuditLogReader + ClientReader + ?Sized,
{
    let client = repo
        .get_client_by_id(client_id)?
        .ok_or(ServiceError::NotFound)?;
    let logs = entity_audit_trail(
        repo,
        AuditListQuery::new(AuditEntityType::Client, client_id).limit(limit),
    )?;
    Ok((client, logs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audit::AuditAction;
    use crate::domain::user::Role;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    #[test]
    fn record_or_log_swallows_repository_failures() {
        let mut repo = MockRepository::new();
        repo.expect_append_audit_log()
            .returning(|_| Err(RepositoryError::DatabaseError("disk full".into())));

        let entry = NewAuditLog::new(AuditEntityType::Client, 1, AuditAction::Update, 2, Role::Admin);
        // Must not panic or propagate.
        record_or_log(&repo, &entry);
    }

    #[test]
    fn client_audit_trail_requires_existing_client() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id().returning(|_| Ok(None));

        let result = client_audit_trail(&repo, 9, 50);
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
