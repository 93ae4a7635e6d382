use diesel::prelude::*;

use crate::domain::user::{NewUser, User};
use crate::repository::{DieselRepository, UserReader, UserWriter, errors::RepositoryResult};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>> {
        use crate::models::user::User as DbUser;
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table.find(id).first::<DbUser>(&mut conn).optional()?;

        user.map(TryInto::try_into).transpose().map_err(Into::into)
    }

    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        use crate::models::user::User as DbUser;
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::email.eq(email))
            .first::<DbUser>(&mut conn)
            .optional()?;

        user.map(TryInto::try_into).transpose().map_err(Into::into)
    }

    fn list_users(&self) -> RepositoryResult<Vec<User>> {
        use crate::models::user::User as DbUser;
        use crate::schema::users;

        let mut conn = self.conn()?;
        users::table
            .order(users::name.asc())
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<User>, _>>()
            .map_err(Into::into)
    }
}

impl UserWriter for DieselRepository {
    fn create_or_update_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        use crate::models::user::{NewUser as DbNewUser, UpdateUser as DbUpdateUser, User as DbUser};
        use crate::schema::users;

        let mut conn = self.conn()?;

        let existing = users::table
            .filter(users::email.eq(new_user.email.as_str()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        let row = match existing {
            Some(user) => {
                let db_updates: DbUpdateUser = new_user.into();
                diesel::update(users::table.find(user.id))
                    .set(&db_updates)
                    .get_result::<DbUser>(&mut conn)?
            }
            None => {
                let insertable: DbNewUser = new_user.into();
                diesel::insert_into(users::table)
                    .values(&insertable)
                    .get_result::<DbUser>(&mut conn)?
            }
        };

        row.try_into().map_err(Into::into)
    }
}
