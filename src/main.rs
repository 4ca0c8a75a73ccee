use std::env;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use config::Config;
use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;
use tera::Tera;

use pushkind_registry::models::config::ServerConfig;
use pushkind_registry::repository::DieselRepository;
use pushkind_registry::routes::categories::{
    create_category, destroy_category, edit_category, new_category, show_categories,
    update_category,
};
use pushkind_registry::routes::main::{index, not_assigned};

fn load_config() -> Result<ServerConfig, config::ConfigError> {
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()?
        .try_deserialize()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server_config = match load_config() {
        Ok(server_config) => server_config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let locales = match server_config.locales.supported_locales() {
        Ok(locales) => locales,
        Err(e) => {
            log::error!("Invalid locale configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let tera = match Tera::new(&server_config.templates_dir) {
        Ok(tera) => tera,
        Err(e) => {
            log::error!("Failed to parse templates: {e}");
            std::process::exit(1);
        }
    };

    let secret_key = match Key::try_from(server_config.secret.as_bytes()) {
        Ok(key) => key,
        Err(e) => {
            log::error!("Secret must be at least 64 bytes long: {e}");
            std::process::exit(1);
        }
    };

    // Shared with the pushkind-common extractors and `base_context`.
    let common_config = web::Data::new(server_config.common());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Starting category admin on {}:{} ({} locales, default {})",
        bind_address.0,
        bind_address.1,
        locales.iter().count(),
        locales.default_locale()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .wrap(Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(index)
            .service(not_assigned)
            .service(show_categories)
            .service(new_category)
            .service(create_category)
            .service(edit_category)
            .service(update_category)
            .service(destroy_category)
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(tera.clone()))
            .app_data(common_config.clone())
            .app_data(web::Data::new(locales.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
