//! Diesel models for the append-only audit trail.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::audit::{AuditLog as DomainAuditLog, NewAuditLog as DomainNewAuditLog};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::audit_logs)]
pub struct AuditLog {
    pub id: i32,
    pub entity_type: String,
    pub entity_id: i32,
    pub action: String,
    pub user_id: i32,
    pub user_role: String,
    pub changes: String, // JSON text in the DB
    pub metadata: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::audit_logs)]
pub struct NewAuditLog {
    pub entity_type: String,
    pub entity_id: i32,
    pub action: String,
    pub user_id: i32,
    pub user_role: String,
    pub changes: String,
    pub metadata: Option<String>,
}

impl TryFrom<AuditLog> for DomainAuditLog {
    type Error = TypeConstraintError;

    fn try_from(entry: AuditLog) -> Result<Self, Self::Error> {
        let changes = serde_json::from_str(&entry.changes)
            .map_err(|e| TypeConstraintError::InvalidValue(format!("audit changes: {e}")))?;
        let metadata = entry
            .metadata
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| TypeConstraintError::InvalidValue(format!("audit metadata: {e}")))?;
        Ok(Self {
            id: entry.id,
            entity_type: entry.entity_type.parse()?,
            entity_id: entry.entity_id,
            action: entry.action.parse()?,
            user_id: entry.user_id,
            user_role: entry.user_role.parse()?,
            changes,
            metadata,
            created_at: entry.created_at,
        })
    }
}

impl From<&DomainNewAuditLog> for NewAuditLog {
    fn from(entry: &DomainNewAuditLog) -> Self {
        Self {
            entity_type: entry.entity_type.to_string(),
            entity_id: entry.entity_id,
            action: entry.action.to_string(),
            user_id: entry.user_id,
            user_role: entry.user_role.to_string(),
            changes: serde_json::to_string(&entry.changes).unwrap_or_else(|_| "[]".to_string()),
            metadata: entry.metadata.as_ref().map(|m| m.to_string()),
        }
    }
}
