use actix_web::{HttpResponse, get, web};
use serde::Deserialize;

use crate::domain::audit::AuditEntityType;
use crate::domain::user::AuthenticatedUser;
use crate::dto::audit::{ClientAuditTrail, EntityAuditTrail};
use crate::repository::{AuditListQuery, DEFAULT_AUDIT_LIMIT, DieselRepository};
use crate::services::{ServiceError, audit as audit_service};

#[derive(Debug, Deserialize)]
struct AuditTrailParams {
    limit: Option<usize>,
}

#[get("/audit/{entity_type}/{entity_id}")]
pub async fn entity_audit_trail(
    path: web::Path<(String, i32)>,
    params: web::Query<AuditTrailParams>,
    _user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let (entity_type, entity_id) = path.into_inner();
    let entity_type: AuditEntityType = entity_type
        .parse()
        .map_err(|_| ServiceError::Validation(format!("unknown entity type: {entity_type}")))?;
    let limit = params.limit.unwrap_or(DEFAULT_AUDIT_LIMIT);

    // The client trail carries the display name alongside the entries.
    if entity_type == AuditEntityType::Client {
        let (client, audit_logs) =
            audit_service::client_audit_trail(repo.get_ref(), entity_id, limit)?;
        return Ok(HttpResponse::Ok().json(ClientAuditTrail {
            client_id: client.id,
            client_name: client.name,
            audit_logs,
        }));
    }

    let audit_logs = audit_service::entity_audit_trail(
        repo.get_ref(),
        AuditListQuery::new(entity_type, entity_id).limit(limit),
    )?;
    Ok(HttpResponse::Ok().json(EntityAuditTrail {
        entity_type: entity_type.to_string(),
        entity_id,
        audit_logs,
    }))
}
