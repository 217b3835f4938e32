use actix_web::{web, HttpResponse};
use rusqlite::{params, OptionalExtension};
use serde_json::json;

use common::requests::SaveFlowRequest;

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;
use crate::workflow::flow;

pub(crate) async fn process(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
    payload: web::Json<SaveFlowRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;
    let req = payload.into_inner();

    // Surface configuration mistakes now rather than at routing time.
    let steps = flow::validate_definition(&req.flow_definition)
        .map_err(ApiError::Validation)?;

    let conn = db::open(&cfg.db_path)?;
    let form: Option<i64> = conn
        .query_row(
            "SELECT id FROM forms WHERE id = ?1 AND deleted_flag = 0",
            params![req.form_id],
            |row| row.get(0),
        )
        .optional()?;
    if form.is_none() {
        return Err(ApiError::NotFound("Form not found".to_string()));
    }

    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM approval_flows WHERE form_id = ?1",
            params![req.form_id],
            |row| row.get(0),
        )
        .optional()?;
    if existing.is_some() {
        return Err(ApiError::Conflict(
            "An approval flow already exists for this form".to_string(),
        ));
    }

    let definition = serde_json::to_string(&steps)
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    conn.execute(
        "INSERT INTO approval_flows (form_id, flow_definition) VALUES (?1, ?2)",
        params![req.form_id, definition],
    )?;

    Ok(HttpResponse::Created().json(json!({
        "status": "success",
        "message": "Approval flow created successfully",
        "data": { "form_id": req.form_id, "flow_definition": steps },
    })))
}
