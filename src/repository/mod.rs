use chrono::NaiveDateTime;

use crate::db::DbPool;
use crate::domain::appointment::{
    Appointment, AppointmentKind, AppointmentStatus, AppointmentSyncUpdate, NewAppointment,
    UpdateAppointment,
};
use crate::domain::audit::{AuditEntityType, AuditLog, NewAuditLog};
use crate::domain::budget::{Budget, NewBudget, UpdateBudget};
use crate::domain::client::{
    Client, ClientPaymentUpdate, ClientSyncUpdate, NewClient, RecordState, UpdateClient,
};
use crate::domain::invoice::{Invoice, InvoicePaymentUpdate, InvoiceStatus, NewInvoice, UpdateInvoice};
use crate::domain::payment::{NewPayment, PaymentEntryStatus, PaymentHistory, PaymentMethod};
use crate::domain::user::{NewUser, User};
use crate::repository::errors::RepositoryResult;

pub mod appointment;
pub mod audit;
pub mod budget;
pub mod client;
pub mod errors;
pub mod invoice;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod payment;
pub mod user;

/// Default number of audit rows returned when the caller supplies no limit.
pub const DEFAULT_AUDIT_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ClientListQuery {
    pub search: Option<String>,
    /// Soft-deleted records are excluded unless this is set.
    pub include_deleted: bool,
    pub pagination: Option<Pagination>,
}

impl ClientListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn include_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentListQuery {
    pub client_id: Option<i32>,
    pub status: Option<AppointmentStatus>,
    pub kind: Option<AppointmentKind>,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
    pub pagination: Option<Pagination>,
}

impl AppointmentListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(mut self, client_id: i32) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn status(mut self, status: AppointmentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn kind(mut self, kind: AppointmentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn between(mut self, from: NaiveDateTime, to: NaiveDateTime) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct InvoiceListQuery {
    pub client_id: Option<i32>,
    pub status: Option<InvoiceStatus>,
    pub pagination: Option<Pagination>,
}

impl InvoiceListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(mut self, client_id: i32) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn status(mut self, status: InvoiceStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Ledger read-back filter. Results are newest-first, capped by `limit`.
#[derive(Debug, Clone, Default)]
pub struct PaymentListQuery {
    pub client_id: Option<i32>,
    pub method: Option<PaymentMethod>,
    pub status: Option<PaymentEntryStatus>,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
    pub limit: Option<usize>,
}

impl PaymentListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(mut self, client_id: i32) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn method(mut self, method: PaymentMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn status(mut self, status: PaymentEntryStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn between(mut self, from: NaiveDateTime, to: NaiveDateTime) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Audit read-back filter: newest-first for one entity, capped by `limit`
/// (defaulting to [`DEFAULT_AUDIT_LIMIT`]).
#[derive(Debug, Clone)]
pub struct AuditListQuery {
    pub entity_type: AuditEntityType,
    pub entity_id: i32,
    pub limit: usize,
}

impl AuditListQuery {
    pub fn new(entity_type: AuditEntityType, entity_id: i32) -> Self {
        Self {
            entity_type,
            entity_id,
            limit: DEFAULT_AUDIT_LIMIT,
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

pub trait ClientReader {
    /// Fetches a client regardless of its soft-delete state; callers that
    /// only want live records filter on `record_state` themselves.
    fn get_client_by_id(&self, id: i32) -> RepositoryResult<Option<Client>>;
    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
}

pub trait ClientWriter {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
    fn update_client(&self, client_id: i32, updates: &UpdateClient) -> RepositoryResult<Client>;
    fn apply_client_sync(
        &self,
        client_id: i32,
        updates: &ClientSyncUpdate,
    ) -> RepositoryResult<Client>;
    fn update_client_payment(
        &self,
        client_id: i32,
        updates: &ClientPaymentUpdate,
    ) -> RepositoryResult<Client>;
    fn set_client_record_state(
        &self,
        client_id: i32,
        state: RecordState,
        updated_by: i32,
    ) -> RepositoryResult<Client>;
}

pub trait AppointmentReader {
    fn get_appointment_by_id(&self, id: i32) -> RepositoryResult<Option<Appointment>>;
    fn list_appointments(
        &self,
        query: AppointmentListQuery,
    ) -> RepositoryResult<(usize, Vec<Appointment>)>;
    /// Earliest future `scheduled` appointment date for the client, if any.
    fn next_scheduled_for_client(
        &self,
        client_id: i32,
        after: NaiveDateTime,
    ) -> RepositoryResult<Option<NaiveDateTime>>;
}

pub trait AppointmentWriter {
    fn create_appointment(&self, new_appointment: &NewAppointment)
    -> RepositoryResult<Appointment>;
    fn update_appointment(
        &self,
        appointment_id: i32,
        updates: &UpdateAppointment,
    ) -> RepositoryResult<Appointment>;
    fn apply_appointment_sync(
        &self,
        appointment_id: i32,
        updates: &AppointmentSyncUpdate,
    ) -> RepositoryResult<Appointment>;
    fn delete_appointment(&self, appointment_id: i32) -> RepositoryResult<()>;
}

pub trait InvoiceReader {
    fn get_invoice_by_id(&self, id: i32) -> RepositoryResult<Option<Invoice>>;
    fn list_invoices(&self, query: InvoiceListQuery) -> RepositoryResult<(usize, Vec<Invoice>)>;
}

pub trait InvoiceWriter {
    fn create_invoice(&self, new_invoice: &NewInvoice) -> RepositoryResult<Invoice>;
    fn update_invoice(
        &self,
        invoice_id: i32,
        updates: &UpdateInvoice,
    ) -> RepositoryResult<Invoice>;
    fn update_invoice_payment(
        &self,
        invoice_id: i32,
        updates: &InvoicePaymentUpdate,
    ) -> RepositoryResult<Invoice>;
    fn delete_invoice(&self, invoice_id: i32) -> RepositoryResult<()>;
}

/// Read side of the append-only payment ledger.
pub trait PaymentLedgerReader {
    fn list_payments(
        &self,
        query: PaymentListQuery,
    ) -> RepositoryResult<Vec<PaymentHistory>>;
}

/// Write side of the append-only payment ledger. There is deliberately no
/// update or delete operation.
pub trait PaymentLedgerWriter {
    fn append_payment(&self, payment: &NewPayment) -> RepositoryResult<PaymentHistory>;
}

/// Read side of the append-only audit trail.
pub trait AuditLogReader {
    fn list_audit_logs(&self, query: AuditListQuery) -> RepositoryResult<Vec<AuditLog>>;
}

/// Write side of the append-only audit trail. There is deliberately no
/// update or delete operation.
pub trait AuditLogWriter {
    fn append_audit_log(&self, entry: &NewAuditLog) -> RepositoryResult<AuditLog>;
}

pub trait BudgetReader {
    fn get_budget_by_id(&self, id: i32) -> RepositoryResult<Option<Budget>>;
    fn list_budgets(&self) -> RepositoryResult<Vec<Budget>>;
}

pub trait BudgetWriter {
    fn create_budget(&self, new_budget: &NewBudget) -> RepositoryResult<Budget>;
    fn update_budget(&self, budget_id: i32, updates: &UpdateBudget) -> RepositoryResult<Budget>;
    fn delete_budget(&self, budget_id: i32) -> RepositoryResult<()>;
}

pub trait UserReader {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    fn list_users(&self) -> RepositoryResult<Vec<User>>;
}

pub trait UserWriter {
    fn create_or_update_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
}

/// Diesel-backed implementation of every repository trait, shared across
/// handlers through `web::Data`.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn conn(&self) -> RepositoryResult<crate::db::DbConnection> {
        Ok(crate::db::get_connection(&self.pool)?)
    }
}
