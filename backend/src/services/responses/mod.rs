//! Read-only views over submissions.

use actix_web::web::{get, scope};
use actix_web::Scope;

mod for_form;
mod mine;

const API_PATH: &str = "/api/responses";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/user", get().to(mine::process))
        .route("/form/{form_id}", get().to(for_form::process))
}
