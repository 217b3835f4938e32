//! Question authoring for forms (admin only).

use actix_web::web::{post, put, scope};
use actix_web::Scope;

mod create;
mod delete;

const API_PATH: &str = "/api/questions";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(create::process))
        .route("/delete", put().to(delete::process))
}
