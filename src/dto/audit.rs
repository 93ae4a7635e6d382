//! DTOs exposed by the audit read endpoint.

use serde::Serialize;

use crate::domain::audit::AuditLog;

/// Payload returned by the client audit-trail endpoint, newest entry first.
#[derive(Debug, Clone, Serialize)]
pub struct ClientAuditTrail {
    pub client_id: i32,
    pub client_name: String,
    pub audit_logs: Vec<AuditLog>,
}

/// Generic audit-trail payload for the remaining entity types.
#[derive(Debug, Clone, Serialize)]
pub struct EntityAuditTrail {
    pub entity_type: String,
    pub entity_id: i32,
    pub audit_logs: Vec<AuditLog>,
}
