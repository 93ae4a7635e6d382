//! Diesel implementation of the append-only audit trail.

use diesel::prelude::*;

use crate::domain::audit::{AuditLog, NewAuditLog};
use crate::repository::{
    AuditListQuery, AuditLogReader, AuditLogWriter, DieselRepository, errors::RepositoryResult,
};

impl AuditLogReader for DieselRepository {
    fn list_audit_logs(&self, query: AuditListQuery) -> RepositoryResult<Vec<AuditLog>> {
        use crate::models::audit::AuditLog as DbAuditLog;
        use crate::schema::audit_logs;

        let mut conn = self.conn()?;
        audit_logs::table
            .filter(audit_logs::entity_type.eq(query.entity_type.to_string()))
            .filter(audit_logs::entity_id.eq(query.entity_id))
            .order((audit_logs::created_at.desc(), audit_logs::id.desc()))
            .limit(query.limit as i64)
            .load::<DbAuditLog>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<AuditLog>, _>>()
            .map_err(Into::into)
    }
}

impl AuditLogWriter for DieselRepository {
    fn append_audit_log(&self, entry: &NewAuditLog) -> RepositoryResult<AuditLog> {
        use crate::models::audit::{AuditLog as DbAuditLog, NewAuditLog as DbNewAuditLog};
        use crate::schema::audit_logs;

        let mut conn = self.conn()?;
        let insertable: DbNewAuditLog = entry.into();
        let created = diesel::insert_into(audit_logs::table)
            .values(&insertable)
            .get_result::<DbAuditLog>(&mut conn)?;

        created.try_into().map_err(Into::into)
    }
}
