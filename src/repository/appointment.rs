use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::appointment::{
    Appointment, AppointmentStatus, AppointmentSyncUpdate, NewAppointment, UpdateAppointment,
};
use crate::repository::{
    AppointmentListQuery, AppointmentReader, AppointmentWriter, DieselRepository,
    errors::RepositoryResult,
};

impl AppointmentReader for DieselRepository {
    fn get_appointment_by_id(&self, id: i32) -> RepositoryResult<Option<Appointment>> {
        use crate::models::appointment::Appointment as DbAppointment;
        use crate::schema::appointments;

        let mut conn = self.conn()?;
        let appointment = appointments::table
            .find(id)
            .first::<DbAppointment>(&mut conn)
            .optional()?;

        appointment
            .map(TryInto::try_into)
            .transpose()
            .map_err(Into::into)
    }

    fn list_appointments(
        &self,
        query: AppointmentListQuery,
    ) -> RepositoryResult<(usize, Vec<Appointment>)> {
        use crate::models::appointment::Appointment as DbAppointment;
        use crate::schema::appointments;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = appointments::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(client_id) = query.client_id {
                items = items.filter(appointments::client_id.eq(client_id));
            }
            if let Some(status) = query.status {
                items = items.filter(appointments::status.eq(status.to_string()));
            }
            if let Some(kind) = query.kind {
                items = items.filter(appointments::kind.eq(kind.to_string()));
            }
            if let Some(from) = query.from {
                items = items.filter(appointments::scheduled_at.ge(from));
            }
            if let Some(to) = query.to {
                items = items.filter(appointments::scheduled_at.le(to));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let appointments = items
            .order(appointments::scheduled_at.asc())
            .load::<DbAppointment>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Appointment>, _>>()?;

        Ok((total, appointments))
    }

    fn next_scheduled_for_client(
        &self,
        client_id: i32,
        after: NaiveDateTime,
    ) -> RepositoryResult<Option<NaiveDateTime>> {
        use crate::schema::appointments;

        let mut conn = self.conn()?;
        let next = appointments::table
            .filter(appointments::client_id.eq(client_id))
            .filter(appointments::status.eq(AppointmentStatus::Scheduled.to_string()))
            .filter(appointments::scheduled_at.gt(after))
            .order(appointments::scheduled_at.asc())
            .select(appointments::scheduled_at)
            .first::<NaiveDateTime>(&mut conn)
            .optional()?;

        Ok(next)
    }
}

impl AppointmentWriter for DieselRepository {
    fn create_appointment(
        &self,
        new_appointment: &NewAppointment,
    ) -> RepositoryResult<Appointment> {
        use crate::models::appointment::{
            Appointment as DbAppointment, NewAppointment as DbNewAppointment,
        };
        use crate::schema::appointments;

        let mut conn = self.conn()?;
        let insertable: DbNewAppointment = new_appointment.into();
        let created = diesel::insert_into(appointments::table)
            .values(&insertable)
            .get_result::<DbAppointment>(&mut conn)?;

        created.try_into().map_err(Into::into)
    }

    fn update_appointment(
        &self,
        appointment_id: i32,
        updates: &UpdateAppointment,
    ) -> RepositoryResult<Appointment> {
        use crate::models::appointment::{
            Appointment as DbAppointment, UpdateAppointment as DbUpdateAppointment,
        };
        use crate::schema::appointments;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateAppointment = updates.into();

        let updated = diesel::update(appointments::table.find(appointment_id))
            .set(&db_updates)
            .get_result::<DbAppointment>(&mut conn)?;

        updated.try_into().map_err(Into::into)
    }

    fn apply_appointment_sync(
        &self,
        appointment_id: i32,
        updates: &AppointmentSyncUpdate,
    ) -> RepositoryResult<Appointment> {
        use crate::models::appointment::{
            Appointment as DbAppointment, AppointmentSyncUpdate as DbAppointmentSyncUpdate,
        };
        use crate::schema::appointments;

        let mut conn = self.conn()?;
        let db_updates: DbAppointmentSyncUpdate = updates.into();

        let updated = diesel::update(appointments::table.find(appointment_id))
            .set(&db_updates)
            .get_result::<DbAppointment>(&mut conn)?;

        updated.try_into().map_err(Into::into)
    }

    fn delete_appointment(&self, appointment_id: i32) -> RepositoryResult<()> {
        use crate::schema::appointments;

        let mut conn = self.conn()?;
        diesel::delete(appointments::table.find(appointment_id)).execute(&mut conn)?;
        Ok(())
    }
}
