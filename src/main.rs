use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use anyhow::Context as _;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    config::Config,
    inference::{HuggingFaceClient, TipModel},
    store::{ExpenseStore, MongoExpenseStore},
};

mod config;
mod error;
mod inference;
mod prompt;
mod routes;
mod schemas;
mod store;
mod validation;

fn cors(origin: Option<&str>) -> Cors {
    match origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allowed_methods(vec!["GET", "POST"])
            .allowed_header(header::CONTENT_TYPE),
        None => Cors::default(),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("invalid configuration")?;

    let store: Arc<dyn ExpenseStore> = Arc::new(MongoExpenseStore::connect(&config.store).await?);
    info!("Connected to database {}", config.store.database);

    let client = HuggingFaceClient::new(&config.inference)?;
    info!("Using inference endpoint {}", client.url());
    let model: Arc<dyn TipModel> = Arc::new(client);

    let store = web::Data::from(store);
    let model = web::Data::from(model);
    let cors_origin = config.cors_origin.clone();

    info!("Listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(cors(cors_origin.as_deref()))
            .app_data(store.clone())
            .app_data(model.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
