use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use taskhub::auth::JwtKeys;
use taskhub::config::Config;
use taskhub::db::{self, DbStatus};
use taskhub::error::AppError;
use taskhub::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let keys = JwtKeys::new(&config.jwt_secret, config.token_ttl_secs);

    let pool = db::lazy_pool(&config.database_url)
        .expect("DATABASE_URL must be a valid connection string");
    let status = DbStatus::new();

    // The listener comes up immediately; the gate answers 503 until this
    // task gets its first successful ping.
    tokio::spawn(db::connect_with_retry(pool.clone(), status.clone()));

    log::info!(
        "starting server at http://{}:{}",
        config.server_host,
        config.server_port
    );

    HttpServer::new(move || {
        // Body deserialization failures reuse the standard error envelope.
        let json_config = web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into());

        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(keys.clone()))
            .app_data(web::Data::new(status.clone()))
            .app_data(json_config)
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .service(web::scope("/api/v1").configure(routes::config))
            .default_service(web::route().to(routes::not_found))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
