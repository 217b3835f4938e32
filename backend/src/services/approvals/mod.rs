//! Approval inbox, decision handling and flow administration.
//!
//! Registered routes:
//! - `GET  /api/approval/pending`                open approvals assigned to
//!   the caller
//! - `POST /api/approval/{approval_id}/action`   approve or reject a pending
//!   approval, advancing or terminating the submission's workflow
//! - `GET  /api/approval/flow/{form_id}`         (admin) read a flow
//! - `POST /api/approval/flow`                   (admin) create a flow
//! - `PUT  /api/approval/flow`                   (admin) replace a flow

use actix_web::web::{get, post, put, scope};
use actix_web::Scope;

mod action;
mod flow_create;
mod flow_get;
mod flow_update;
mod pending;

const API_PATH: &str = "/api/approval";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/pending", get().to(pending::process))
        .route("/flow", post().to(flow_create::process))
        .route("/flow", put().to(flow_update::process))
        .route("/flow/{form_id}", get().to(flow_get::process))
        .route("/{approval_id}/action", post().to(action::process))
}
