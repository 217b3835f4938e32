use actix_web::{web, HttpResponse};
use rusqlite::{params, OptionalExtension};
use serde_json::json;

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;
use crate::workflow::flow;

pub(crate) async fn process(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;
    let form_id = path.into_inner();
    let conn = db::open(&cfg.db_path)?;

    let exists: Option<i64> = conn
        .query_row(
            "SELECT id FROM approval_flows WHERE form_id = ?1",
            params![form_id],
            |row| row.get(0),
        )
        .optional()?;
    if exists.is_none() {
        return Err(ApiError::NotFound("Approval flow not found".to_string()));
    }

    let steps = flow::load_flow(&conn, form_id)?.unwrap_or_default();
    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Approval flow retrieved successfully",
        "data": { "form_id": form_id, "flow_definition": steps },
    })))
}
