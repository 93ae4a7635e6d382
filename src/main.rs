use config::Config;
use garage_crm::models::config::ServerConfig;
use garage_crm::run;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config_path =
        std::env::var("GARAGE_CRM_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    let server_config: ServerConfig = Config::builder()
        .add_source(config::File::with_name(&config_path))
        .add_source(config::Environment::with_prefix("GARAGE_CRM"))
        .build()
        .and_then(Config::try_deserialize)
        .map_err(|e| std::io::Error::other(format!("Failed to load configuration: {e}")))?;

    run(server_config).await
}
