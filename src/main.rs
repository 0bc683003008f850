use std::io;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use fittribe_api::auth::jwt;
use fittribe_api::db::schema::ensure_schema;
use fittribe_api::handlers;
use fittribe_api::openapi::ApiDoc;
use fittribe_api::services::media::MediaStorage;
use fittribe_api::Config;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting fittribe-api v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    if let Err(err) = jwt::initialize_jwt_secret(&config.auth.jwt_secret) {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to initialize JWT keys: {err}"),
        ));
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to create database pool: {e}"),
            )
        })?;

    tracing::info!("Connected to database");

    ensure_schema(&pool).await.map_err(|e| {
        io::Error::new(io::ErrorKind::Other, format!("Schema bootstrap failed: {e}"))
    })?;

    let storage = MediaStorage::new(&config.media);

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let pool_data = web::Data::new(pool);
    let config_data = web::Data::new(config);
    let storage_data = web::Data::new(storage);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        let openapi_doc = ApiDoc::openapi();

        App::new()
            .app_data(pool_data.clone())
            .app_data(config_data.clone())
            .app_data(storage_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/openapi.json", openapi_doc.clone()),
            )
            .configure(handlers::configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
