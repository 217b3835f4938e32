mod auth;
mod config;
mod db;
mod errors;
mod notifier;
mod services;
mod workflow;

use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;

use crate::config::AppConfig;
use crate::workflow::roles::{RoleCache, RoleDirectory};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let host = "127.0.0.1";
    let port = 8080;

    let cfg = AppConfig::from_env();
    let directory = bootstrap(&cfg).map_err(std::io::Error::other)?;
    info!(
        "database ready at {} with {} roles",
        cfg.db_path.display(),
        directory.len()
    );

    let cfg_data = web::Data::new(cfg);
    let roles_data = web::Data::new(RoleCache::new(directory));

    info!("Server running at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(1024 * 1024)) // 1 MB
            .app_data(cfg_data.clone())
            .app_data(roles_data.clone())
            .service(services::auth::configure_routes())
            .service(services::forms::configure_routes())
            .service(services::questions::configure_routes())
            .service(services::approvals::configure_routes())
            .service(services::responses::configure_routes())
            .service(services::notifications::configure_routes())
            .service(services::admin::configure_routes())
    })
    .bind((host, port))?
    .run()
    .await
}

/// Creates the schema, seeds the role directory when empty and loads the
/// initial directory snapshot.
fn bootstrap(cfg: &AppConfig) -> rusqlite::Result<RoleDirectory> {
    let conn = db::open(&cfg.db_path)?;
    db::init_schema(&conn)?;
    db::seed_roles(&conn)?;
    RoleDirectory::load(&conn)
}
