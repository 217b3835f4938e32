//! Administrative CRUD for the organizational entities the workflow
//! routes against. All endpoints are admin-gated.

use actix_web::web::{get, post, put, scope};
use actix_web::Scope;

mod colleges;
mod departments;
mod roles;
mod users;

const API_PATH: &str = "/api/admin";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/roles", get().to(roles::list))
        .route("/roles", post().to(roles::create))
        .route("/roles/delete", put().to(roles::delete))
        .route("/colleges", get().to(colleges::list))
        .route("/colleges", post().to(colleges::create))
        .route("/departments", get().to(departments::list))
        .route("/departments", post().to(departments::create))
        .route("/users", get().to(users::list))
        .route("/users/org", put().to(users::update_org))
        .route("/users/delete", put().to(users::delete))
}
