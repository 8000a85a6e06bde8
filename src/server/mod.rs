//! main file for the server

pub(crate) mod model;
mod controller;
mod database;
mod routes;
mod state;

use actix_web::{middleware::Logger, web, App, HttpServer};
use tokio_postgres::Client;
use crate::server::database::pool::{DbClient, Pool};
use crate::server::model::config::ServerConfig;
use crate::server::state::AppState;

const DB_READ_POOL_NAME: &str = "read";

/// Run the server
pub(crate) async fn run(ServerConfig { addr, db }: ServerConfig) -> std::io::Result<()> {
    let read_pool = Pool::<Client>::new(
        DB_READ_POOL_NAME,
        db.conn_str,
        db.pool_size,
        db.acquire_timeout,
    );
    read_pool.warm_up().await;
    let state = web::Data::new(AppState::new(read_pool, db.query_timeout));

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(app_config(state.clone()))
    })
        .bind(addr)?
        .run()
        .await
}

/// Register the shared state and every route.
pub(crate) fn app_config<M: DbClient>(
    state: web::Data<AppState<M>>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(state)
            .configure(routes::orders::configure::<M>);
    }
}
