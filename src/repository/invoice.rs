use diesel::prelude::*;

use crate::domain::invoice::{Invoice, InvoicePaymentUpdate, NewInvoice, UpdateInvoice};
use crate::repository::{
    DieselRepository, InvoiceListQuery, InvoiceReader, InvoiceWriter, errors::RepositoryResult,
};

impl InvoiceReader for DieselRepository {
    fn get_invoice_by_id(&self, id: i32) -> RepositoryResult<Option<Invoice>> {
        use crate::models::invoice::Invoice as DbInvoice;
        use crate::schema::invoices;

        let mut conn = self.conn()?;
        let invoice = invoices::table
            .find(id)
            .first::<DbInvoice>(&mut conn)
            .optional()?;

        invoice.map(TryInto::try_into).transpose().map_err(Into::into)
    }

    fn list_invoices(&self, query: InvoiceListQuery) -> RepositoryResult<(usize, Vec<Invoice>)> {
        use crate::models::invoice::Invoice as DbInvoice;
        use crate::schema::invoices;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = invoices::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(client_id) = query.client_id {
                items = items.filter(invoices::client_id.eq(client_id));
            }
            if let Some(status) = query.status {
                items = items.filter(invoices::status.eq(status.to_string()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let invoices = items
            .order(invoices::created_at.desc())
            .load::<DbInvoice>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Invoice>, _>>()?;

        Ok((total, invoices))
    }
}

impl InvoiceWriter for DieselRepository {
    fn create_invoice(&self, new_invoice: &NewInvoice) -> RepositoryResult<Invoice> {
        use crate::models::invoice::{Invoice as DbInvoice, NewInvoice as DbNewInvoice};
        use crate::schema::invoices;

        let mut conn = self.conn()?;
        let insertable: DbNewInvoice = new_invoice.into();
        let created = diesel::insert_into(invoices::table)
            .values(&insertable)
            .get_result::<DbInvoice>(&mut conn)?;

        created.try_into().map_err(Into::into)
    }

    fn update_invoice(
        &self,
        invoice_id: i32,
        updates: &UpdateInvoice,
    ) -> RepositoryResult<Invoice> {
        use crate::models::invoice::{Invoice as DbInvoice, UpdateInvoice as DbUpdateInvoice};
        use crate::schema::invoices;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateInvoice = updates.into();

        let updated = diesel::update(invoices::table.find(invoice_id))
            .set(&db_updates)
            .get_result::<DbInvoice>(&mut conn)?;

        updated.try_into().map_err(Into::into)
    }

    fn update_invoice_payment(
        &self,
        invoice_id: i32,
        updates: &InvoicePaymentUpdate,
    ) -> RepositoryResult<Invoice> {
        use crate::models::invoice::{
            Invoice as DbInvoice, InvoicePaymentUpdate as DbInvoicePaymentUpdate,
        };
        use crate::schema::invoices;

        let mut conn = self.conn()?;
        let db_updates: DbInvoicePaymentUpdate = updates.into();

        let updated = diesel::update(invoices::table.find(invoice_id))
            .set(&db_updates)
            .get_result::<DbInvoice>(&mut conn)?;

        updated.try_into().map_err(Into::into)
    }

    fn delete_invoice(&self, invoice_id: i32) -> RepositoryResult<()> {
        use crate::schema::invoices;

        let mut conn = self.conn()?;
        diesel::delete(invoices::table.find(invoice_id)).execute(&mut conn)?;
        Ok(())
    }
}
