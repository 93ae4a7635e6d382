#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "data")]
pub mod cache;
#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod dto;
#[cfg(feature = "data")]
pub mod error_conversions;
#[cfg(feature = "data")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "data")]
pub mod services;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: crate::models::config::ServerConfig) -> std::io::Result<()> {
    use std::time::Duration;

    use actix_cors::Cors;
    use actix_web::{App, HttpServer, middleware, web};

    use crate::cache::TtlCache;
    use crate::db::establish_connection_pool;
    use crate::repository::DieselRepository;
    use crate::routes::appointment::{
        create_appointment, delete_appointment, list_appointments, save_appointment,
        show_appointment,
    };
    use crate::routes::audit::entity_audit_trail;
    use crate::routes::budget::{
        create_budget, delete_budget, list_budgets, save_budget, show_budget,
    };
    use crate::routes::client::{
        create_client, delete_client, list_clients, restore_client, save_client, show_client,
        update_client_payment, update_client_status,
    };
    use crate::routes::invoice::{
        create_invoice, delete_invoice, list_invoices, save_invoice, settle_invoice, show_invoice,
    };
    use crate::routes::payment::list_payments;
    use crate::routes::report::dashboard;
    use crate::routes::user::{list_users, save_user};
    use crate::services::report::DashboardSummary;

    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);

    // Dashboard aggregates are served through an explicit TTL cache owned
    // here and handed to the report route.
    let dashboard_cache = web::Data::new(TtlCache::<DashboardSummary>::new(Duration::from_secs(
        server_config.dashboard_cache_ttl_secs,
    )));

    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(
                web::scope("/api/v1")
                    .service(list_clients)
                    .service(create_client)
                    .service(show_client)
                    .service(save_client)
                    .service(update_client_status)
                    .service(update_client_payment)
                    .service(delete_client)
                    .service(restore_client)
                    .service(list_appointments)
                    .service(create_appointment)
                    .service(show_appointment)
                    .service(save_appointment)
                    .service(delete_appointment)
                    .service(list_invoices)
                    .service(create_invoice)
                    .service(show_invoice)
                    .service(save_invoice)
                    .service(settle_invoice)
                    .service(delete_invoice)
                    .service(list_payments)
                    .service(list_budgets)
                    .service(create_budget)
                    .service(show_budget)
                    .service(save_budget)
                    .service(delete_budget)
                    .service(entity_audit_trail)
                    .service(dashboard)
                    .service(list_users)
                    .service(save_user),
            )
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .app_data(dashboard_cache.clone())
    })
    .bind(bind_address)?
    .run()
    .await
}
