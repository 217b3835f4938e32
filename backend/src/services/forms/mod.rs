//! Form management and submission.
//!
//! Registered routes:
//! - `POST   /api/forms`                         (admin) create a form
//! - `GET    /api/forms`                         list non-deleted forms
//! - `GET    /api/forms/{id}`                    form detail with questions
//! - `PUT    /api/forms/edit`                    (admin) update a form
//! - `PUT    /api/forms/delete`                  (admin) soft-delete a form
//! - `POST   /api/forms/{form_id}/submit`        submit answers, starting the
//!   approval workflow for the submission
//! - `GET    /api/forms/{response_id}/progress`  approval history + answers
//!   for one submission

use actix_web::web::{get, post, put, scope};
use actix_web::Scope;

mod create;
mod delete;
mod get_one;
mod list;
mod progress;
mod submit;
mod update;

const API_PATH: &str = "/api/forms";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(create::process))
        .route("", get().to(list::process))
        .route("/edit", put().to(update::process))
        .route("/delete", put().to(delete::process))
        .route("/{form_id}/submit", post().to(submit::process))
        .route("/{response_id}/progress", get().to(progress::process))
        .route("/{id}", get().to(get_one::process))
}
