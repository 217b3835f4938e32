//! Notification inbox for the authenticated user.

use actix_web::web::{get, put, scope};
use actix_web::Scope;

mod list;
mod mark_read;

const API_PATH: &str = "/api/notifications";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/read", put().to(mark_read::process))
}
