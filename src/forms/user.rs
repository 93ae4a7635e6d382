use serde::Deserialize;
use validator::Validate;

use crate::domain::types::TypeConstraintError;
use crate::domain::user::{NewUser, Permissions, Role};

#[derive(Debug, Deserialize, Validate)]
/// Payload for creating or updating a user account (Admin only).
pub struct SaveUserPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub role: Role,
    /// Optional per-user override of the role's default permission bag.
    pub permissions: Option<Permissions>,
}

impl SaveUserPayload {
    pub fn to_new_user(&self) -> Result<NewUser, TypeConstraintError> {
        NewUser::new(
            self.name.clone(),
            self.email.clone(),
            self.role,
            self.permissions,
        )
    }
}
