#[macro_use]
extern crate diesel;

pub mod app;
pub mod database;
pub mod graphql;
pub mod schema;

mod auth;
mod routes;

use std::io;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use log::{info, warn};

use crate::{
    app::config::Config, app::AppState, database::store::Store,
    routes::graphql::graphql as graphql_route,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config =
        Config::from_env().map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    let store = match &config.database_url {
        Some(database_url) => Store::postgres(database_url, config.pool_size)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?,
        None => {
            warn!("DATABASE_URL not set, documents are kept in memory and lost on exit");
            Store::memory()
        }
    };

    let app_state = AppState::new(store);

    info!(
        "Server open on {}:{} using the {} store",
        config.host,
        config.port,
        app_state.store.kind()
    );
    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(app_state.clone()))
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .service(graphql_route)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
