//! Decision endpoint. The engine enforces that only the assigned
//! approver can act and that an approval is decided at most once.

use actix_web::{web, HttpResponse};
use serde_json::json;

use common::requests::ApprovalActionRequest;

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;
use crate::notifier;
use crate::workflow::engine::{self, DecideOutcome};
use crate::workflow::roles::RoleCache;

pub(crate) async fn process(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
    roles: web::Data<RoleCache>,
    path: web::Path<i64>,
    payload: web::Json<ApprovalActionRequest>,
) -> Result<HttpResponse, ApiError> {
    let approval_id = path.into_inner();
    let req = payload.into_inner();

    let mut conn = db::open(&cfg.db_path)?;
    let directory = roles.read();
    let (outcome, notices) = engine::decide(
        &mut conn,
        &directory,
        approval_id,
        &user,
        req.action,
        req.comment.as_deref(),
    )?;
    drop(directory);
    notifier::dispatch(&conn, &notices);

    let (message, data) = match outcome {
        DecideOutcome::Rejected { response_id } => (
            "Submission rejected.",
            json!({ "response_id": response_id, "status": "rejected" }),
        ),
        DecideOutcome::FinalApproved { response_id } => (
            "Submission has received final approval.",
            json!({ "response_id": response_id, "status": "approved" }),
        ),
        DecideOutcome::Advanced { response_id, next_step, .. } => (
            "Approval recorded; submission moved to the next step.",
            json!({ "response_id": response_id, "status": "pending", "next_step": next_step }),
        ),
    };

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": message,
        "data": data,
    })))
}
