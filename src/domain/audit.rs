//! Append-only audit records of who changed what, when, on which entity.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::types::status_enum_strings;
use crate::domain::user::Role;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AuditEntityType {
    Client,
    Appointment,
    Invoice,
    User,
}

status_enum_strings!(AuditEntityType {
    Client => "client",
    Appointment => "appointment",
    Invoice => "invoice",
    User => "user",
});

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Restore,
    StatusChange,
    PaymentUpdate,
    Delivery,
}

status_enum_strings!(AuditAction {
    Create => "create",
    Update => "update",
    Delete => "delete",
    Restore => "restore",
    StatusChange => "status_change",
    PaymentUpdate => "payment_update",
    Delivery => "delivery",
});

/// Before/after pair for one mutated field.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FieldChange {
    pub field: String,
    pub old_value: Value,
    pub new_value: Value,
}

impl FieldChange {
    pub fn new(field: impl Into<String>, old_value: Value, new_value: Value) -> Self {
        Self {
            field: field.into(),
            old_value,
            new_value,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuditLog {
    pub id: i32,
    pub entity_type: AuditEntityType,
    pub entity_id: i32,
    pub action: AuditAction,
    pub user_id: i32,
    pub user_role: Role,
    pub changes: Vec<FieldChange>,
    pub metadata: Option<Value>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewAuditLog {
    pub entity_type: AuditEntityType,
    pub entity_id: i32,
    pub action: AuditAction,
    pub user_id: i32,
    pub user_role: Role,
    pub changes: Vec<FieldChange>,
    pub metadata: Option<Value>,
}

impl NewAuditLog {
    pub fn new(
        entity_type: AuditEntityType,
        entity_id: i32,
        action: AuditAction,
        user_id: i32,
        user_role: Role,
    ) -> Self {
        Self {
            entity_type,
            entity_id,
            action,
            user_id,
            user_role,
            changes: Vec::new(),
            metadata: None,
        }
    }

    pub fn changes(mut self, changes: Vec<FieldChange>) -> Self {
        self.changes = changes;
        self
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn audit_action_round_trips_as_snake_case() {
        for action in [
            AuditAction::Create,
            AuditAction::Update,
            AuditAction::Delete,
            AuditAction::Restore,
            AuditAction::StatusChange,
            AuditAction::PaymentUpdate,
            AuditAction::Delivery,
        ] {
            assert_eq!(action.to_string().parse::<AuditAction>(), Ok(action));
        }
    }

    #[test]
    fn builder_collects_changes_and_metadata() {
        let entry = NewAuditLog::new(
            AuditEntityType::Client,
            3,
            AuditAction::StatusChange,
            1,
            Role::Admin,
        )
        .changes(vec![FieldChange::new(
            "repair_status",
            json!("waiting"),
            json!("completed"),
        )])
        .metadata(json!({"source": "status endpoint"}));

        assert_eq!(entry.changes.len(), 1);
        assert_eq!(entry.changes[0].field, "repair_status");
        assert!(entry.metadata.is_some());
    }
}
