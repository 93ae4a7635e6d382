//! Mock repository implementations for isolating services in tests.

use chrono::NaiveDateTime;
use mockall::mock;

use crate::domain::appointment::{
    Appointment, AppointmentSyncUpdate, NewAppointment, UpdateAppointment,
};
use crate::domain::audit::{AuditLog, NewAuditLog};
use crate::domain::budget::{Budget, NewBudget, UpdateBudget};
use crate::domain::client::{
    Client, ClientPaymentUpdate, ClientSyncUpdate, NewClient, RecordState, UpdateClient,
};
use crate::domain::invoice::{Invoice, InvoicePaymentUpdate, NewInvoice, UpdateInvoice};
use crate::domain::payment::{NewPayment, PaymentHistory};
use crate::domain::user::{NewUser, User};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    AppointmentListQuery, AppointmentReader, AppointmentWriter, AuditListQuery, AuditLogReader,
    AuditLogWriter, BudgetReader, BudgetWriter, ClientListQuery, ClientReader, ClientWriter,
    InvoiceListQuery, InvoiceReader, InvoiceWriter, PaymentLedgerReader, PaymentLedgerWriter,
    PaymentListQuery, UserReader, UserWriter,
};

mock! {
    pub Repository {}

    impl ClientReader for Repository {
        fn get_client_by_id(&self, id: i32) -> RepositoryResult<Option<Client>>;
        fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
    }

    impl ClientWriter for Repository {
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

    impl AppointmentReader for Repository {
        fn get_appointment_by_id(&self, id: i32) -> RepositoryResult<Option<Appointment>>;
        fn list_appointments(
            &self,
            query: AppointmentListQuery,
        ) -> RepositoryResult<(usize, Vec<Appointment>)>;
        fn next_scheduled_for_client(
            &self,
            client_id: i32,
            after: NaiveDateTime,
        ) -> RepositoryResult<Option<NaiveDateTime>>;
    }

    impl AppointmentWriter for Repository {
        fn create_appointment(
            &self,
            new_appointment: &NewAppointment,
        ) -> RepositoryResult<Appointment>;
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

    impl InvoiceReader for Repository {
        fn get_invoice_by_id(&self, id: i32) -> RepositoryResult<Option<Invoice>>;
        fn list_invoices(&self, query: InvoiceListQuery) -> RepositoryResult<(usize, Vec<Invoice>)>;
    }

    impl InvoiceWriter for Repository {
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

    impl PaymentLedgerReader for Repository {
        fn list_payments(&self, query: PaymentListQuery) -> RepositoryResult<Vec<PaymentHistory>>;
    }

    impl PaymentLedgerWriter for Repository {
        fn append_payment(&self, payment: &NewPayment) -> RepositoryResult<PaymentHistory>;
    }

    impl AuditLogReader for Repository {
        fn list_audit_logs(&self, query: AuditListQuery) -> RepositoryResult<Vec<AuditLog>>;
    }

    impl AuditLogWriter for Repository {
        fn append_audit_log(&self, entry: &NewAuditLog) -> RepositoryResult<AuditLog>;
    }

    impl BudgetReader for Repository {
        fn get_budget_by_id(&self, id: i32) -> RepositoryResult<Option<Budget>>;
        fn list_budgets(&self) -> RepositoryResult<Vec<Budget>>;
    }

    impl BudgetWriter for Repository {
        fn create_budget(&self, new_budget: &NewBudget) -> RepositoryResult<Budget>;
        fn update_budget(&self, budget_id: i32, updates: &UpdateBudget) -> RepositoryResult<Budget>;
        fn delete_budget(&self, budget_id: i32) -> RepositoryResult<()>;
    }

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
        fn list_users(&self) -> RepositoryResult<Vec<User>>;
    }

    impl UserWriter for Repository {
        fn create_or_update_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    }
}
