//! Diesel implementation of the append-only payment ledger.

use diesel::prelude::*;

use crate::domain::payment::{NewPayment, PaymentHistory};
use crate::repository::{
    DieselRepository, PaymentLedgerReader, PaymentLedgerWriter, PaymentListQuery,
    errors::RepositoryResult,
};

impl PaymentLedgerReader for DieselRepository {
    fn list_payments(&self, query: PaymentListQuery) -> RepositoryResult<Vec<PaymentHistory>> {
        use crate::models::payment::PaymentHistory as DbPayment;
        use crate::schema::payment_history;

        let mut conn = self.conn()?;

        let mut items = payment_history::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(client_id) = query.client_id {
            items = items.filter(payment_history::client_id.eq(client_id));
        }
        if let Some(method) = query.method {
            items = items.filter(payment_history::method.eq(method.to_string()));
        }
        if let Some(status) = query.status {
            items = items.filter(payment_history::status.eq(status.to_string()));
        }
        if let Some(from) = query.from {
            items = items.filter(payment_history::paid_at.ge(from));
        }
        if let Some(to) = query.to {
            items = items.filter(payment_history::paid_at.le(to));
        }
        if let Some(limit) = query.limit {
            items = items.limit(limit as i64);
        }

        items
            .order((payment_history::paid_at.desc(), payment_history::id.desc()))
            .load::<DbPayment>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<PaymentHistory>, _>>()
            .map_err(Into::into)
    }
}

impl PaymentLedgerWriter for DieselRepository {
    fn append_payment(&self, payment: &NewPayment) -> RepositoryResult<PaymentHistory> {
        use crate::models::payment::{NewPayment as DbNewPayment, PaymentHistory as DbPayment};
        use crate::schema::payment_history;

        let mut conn = self.conn()?;
        let insertable: DbNewPayment = payment.into();
        let created = diesel::insert_into(payment_history::table)
            .values(&insertable)
            .get_result::<DbPayment>(&mut conn)?;

        created.try_into().map_err(Into::into)
    }
}
