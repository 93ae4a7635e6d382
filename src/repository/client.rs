use diesel::prelude::*;

use crate::domain::client::{
    Client, ClientPaymentUpdate, ClientSyncUpdate, NewClient, RecordState, UpdateClient,
};
use crate::repository::{
    ClientListQuery, ClientReader, ClientWriter, DieselRepository, errors::RepositoryResult,
};

impl ClientReader for DieselRepository {
    fn get_client_by_id(&self, id: i32) -> RepositoryResult<Option<Client>> {
        use crate::models::client::Client as DbClient;
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let client = clients::table
            .find(id)
            .first::<DbClient>(&mut conn)
            .optional()?;

        client.map(TryInto::try_into).transpose().map_err(Into::into)
    }

    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)> {
        use crate::models::client::Client as DbClient;
        use crate::schema::clients;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = clients::table.into_boxed::<diesel::sqlite::Sqlite>();

            if !query.include_deleted {
                items = items.filter(clients::record_state.eq(RecordState::Active.to_string()));
            }
            if let Some(search) = &query.search {
                let pattern = format!("%{search}%");
                items = items.filter(
                    clients::name
                        .like(pattern.clone())
                        .or(clients::email.like(pattern.clone()))
                        .or(clients::phone.like(pattern.clone()))
                        .or(clients::vehicle_make.like(pattern.clone()))
                        .or(clients::vehicle_model.like(pattern)),
                );
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let clients = items
            .order(clients::id.asc())
            .load::<DbClient>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Client>, _>>()?;

        Ok((total, clients))
    }
}

impl ClientWriter for DieselRepository {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        use crate::models::client::{Client as DbClient, NewClient as DbNewClient};
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let insertable: DbNewClient = new_client.into();
        let created = diesel::insert_into(clients::table)
            .values(&insertable)
            .get_result::<DbClient>(&mut conn)?;

        created.try_into().map_err(Into::into)
    }

    fn update_client(&self, client_id: i32, updates: &UpdateClient) -> RepositoryResult<Client> {
        use crate::models::client::{Client as DbClient, UpdateClient as DbUpdateClient};
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateClient = updates.into();

        let updated = diesel::update(clients::table.find(client_id))
            .set(&db_updates)
            .get_result::<DbClient>(&mut conn)?;

        updated.try_into().map_err(Into::into)
    }

    fn apply_client_sync(
        &self,
        client_id: i32,
        updates: &ClientSyncUpdate,
    ) -> RepositoryResult<Client> {
        use crate::models::client::{Client as DbClient, ClientSyncUpdate as DbClientSyncUpdate};
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let db_updates: DbClientSyncUpdate = updates.into();

        let updated = diesel::update(clients::table.find(client_id))
            .set(&db_updates)
            .get_result::<DbClient>(&mut conn)?;

        updated.try_into().map_err(Into::into)
    }

    fn update_client_payment(
        &self,
        client_id: i32,
        updates: &ClientPaymentUpdate,
    ) -> RepositoryResult<Client> {
        use crate::models::client::{
            Client as DbClient, ClientPaymentUpdate as DbClientPaymentUpdate,
        };
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let db_updates: DbClientPaymentUpdate = updates.into();

        let updated = diesel::update(clients::table.find(client_id))
            .set(&db_updates)
            .get_result::<DbClient>(&mut conn)?;

        updated.try_into().map_err(Into::into)
    }

    fn set_client_record_state(
        &self,
        client_id: i32,
        state: RecordState,
        updated_by: i32,
    ) -> RepositoryResult<Client> {
        use crate::models::client::{Client as DbClient, RecordStateUpdate};
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let db_updates = RecordStateUpdate {
            record_state: state.to_string(),
            updated_by,
            updated_at: chrono::Utc::now().naive_utc(),
        };

        let updated = diesel::update(clients::table.find(client_id))
            .set(&db_updates)
            .get_result::<DbClient>(&mut conn)?;

        updated.try_into().map_err(Into::into)
    }
}
