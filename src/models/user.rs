use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::types::TypeConstraintError;
use crate::domain::user::{NewUser as DomainNewUser, Permissions, User as DomainUser};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub permissions: Option<String>, // JSON text in the DB
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub role: String,
    pub permissions: Option<String>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::users)]
pub struct UpdateUser<'a> {
    pub name: &'a str,
    pub role: String,
    pub permissions: Option<Option<String>>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        let permissions: Option<Permissions> = user
            .permissions
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| TypeConstraintError::InvalidValue(format!("permissions: {e}")))?;
        Ok(Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role.parse()?,
            permissions,
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(user: &'a DomainNewUser) -> Self {
        Self {
            name: user.name.as_str(),
            email: user.email.as_str(),
            role: user.role.to_string(),
            permissions: user
                .permissions
                .as_ref()
                .and_then(|p| serde_json::to_string(p).ok()),
        }
    }
}

impl<'a> From<&'a DomainNewUser> for UpdateUser<'a> {
    fn from(user: &'a DomainNewUser) -> Self {
        Self {
            name: user.name.as_str(),
            role: user.role.to_string(),
            permissions: Some(
                user.permissions
                    .as_ref()
                    .and_then(|p| serde_json::to_string(p).ok()),
            ),
            updated_at: Utc::now().naive_utc(),
        }
    }
}
