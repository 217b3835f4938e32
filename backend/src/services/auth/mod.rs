//! Signup and login. Login issues an opaque bearer token that the
//! `AuthUser` extractor resolves on every authenticated request.

use actix_web::web::{post, scope};
use actix_web::Scope;

mod login;
mod signup;

const API_PATH: &str = "/api/auth";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/signup", post().to(signup::process))
        .route("/login", post().to(login::process))
}
