use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{TypeConstraintError, normalize_email, status_enum_strings};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Accountant,
    Mechanic,
}

status_enum_strings!(Role {
    Admin => "admin",
    Accountant => "accountant",
    Mechanic => "mechanic",
});

/// Permission bag derived from a role. Stored per user as well, so an Admin
/// can grant or revoke individual permissions beyond the role default.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Permissions {
    pub manage_clients: bool,
    pub manage_invoices: bool,
    pub manage_budgets: bool,
    pub record_payments: bool,
    pub manage_users: bool,
    pub delete_records: bool,
    pub view_reports: bool,
}

impl Role {
    /// Default permission bag for the role.
    pub fn permissions(self) -> Permissions {
        match self {
            Role::Admin => Permissions {
                manage_clients: true,
                manage_invoices: true,
                manage_budgets: true,
                record_payments: true,
                manage_users: true,
                delete_records: true,
                view_reports: true,
            },
            Role::Accountant => Permissions {
                manage_clients: true,
                manage_invoices: true,
                manage_budgets: true,
                record_payments: true,
                manage_users: false,
                delete_records: false,
                view_reports: true,
            },
            // View-only; the restricted repair-status transitions a mechanic
            // may perform are checked separately in the client service.
            Role::Mechanic => Permissions {
                manage_clients: false,
                manage_invoices: false,
                manage_budgets: false,
                record_payments: false,
                manage_users: false,
                delete_records: false,
                view_reports: false,
            },
        }
    }
}

/// Authenticated actor with a role and an optional stored permission
/// override.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub permissions: Option<Permissions>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    /// Stored override when present, role default otherwise.
    pub fn effective_permissions(&self) -> Permissions {
        self.permissions.unwrap_or_else(|| self.role.permissions())
    }
}

/// Authenticated request actor, extracted from the bearer token. Carries
/// everything the services need for permission checks and audit stamping.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedUser {
    /// Role-derived permission bag used by the mutation gates.
    pub fn permissions(&self) -> Permissions {
        self.role.permissions()
    }
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub permissions: Option<Permissions>,
}

impl NewUser {
    pub fn new(
        name: String,
        email: String,
        role: Role,
        permissions: Option<Permissions>,
    ) -> Result<Self, TypeConstraintError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self {
            name,
            email: normalize_email(email)?,
            role,
            permissions,
        })
    }
}
