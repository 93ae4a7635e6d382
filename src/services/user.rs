//! User administration. Admin only; the permission bag stored per user lets
//! an Admin widen or narrow a single account beyond its role default.

use serde_json::json;

use crate::domain::audit::{AuditAction, AuditEntityType, NewAuditLog};
use crate::domain::user::{AuthenticatedUser, NewUser, User};
use crate::repository::{AuditLogWriter, UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};

pub fn list_users<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<User>>
where
    R: UserReader + ?Sized,
{
    if !user.permissions().manage_users {
        return Err(ServiceError::Unauthorized);
    }
    repo.list_users().map_err(ServiceError::from)
}

pub fn create_or_update_user<R>(
    repo: &R,
    user: &AuthenticatedUser,
    new_user: NewUser,
) -> ServiceResult<User>
where
    R: UserWriter + AuditLogWriter + ?Sized,
{
    if !user.permissions().manage_users {
        return Err(ServiceError::Unauthorized);
    }

    let saved = repo.create_or_update_user(&new_user)?;

    crate::services::audit::record_or_log(
        repo,
        &NewAuditLog::new(
            AuditEntityType::User,
            saved.id,
            AuditAction::Update,
            user.id,
            user.role,
        )
        .metadata(json!({ "email": saved.email, "role": saved.role })),
    );

    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::Role;
    use crate::repository::mock::MockRepository;

    #[test]
    fn only_admins_manage_users() {
        let repo = MockRepository::new();
        let accountant = AuthenticatedUser {
            id: 2,
            name: "Acc".into(),
            email: "acc@example.com".into(),
            role: Role::Accountant,
        };
        assert!(matches!(
            list_users(&repo, &accountant),
            Err(ServiceError::Unauthorized)
        ));
        let new_user = NewUser::new("Max".into(), "max@example.com".into(), Role::Mechanic, None)
            .unwrap();
        assert!(matches!(
            create_or_update_user(&repo, &accountant, new_user),
            Err(ServiceError::Unauthorized)
        ));
    }
}
