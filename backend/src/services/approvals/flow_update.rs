use actix_web::{web, HttpResponse};
use rusqlite::params;
use serde_json::json;

use common::requests::SaveFlowRequest;

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;
use crate::workflow::flow;

/// Replaces a form's flow definition. In-flight submissions keep routing
/// against the new definition from their current step onward.
pub(crate) async fn process(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
    payload: web::Json<SaveFlowRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;
    let req = payload.into_inner();

    let steps = flow::validate_definition(&req.flow_definition)
        .map_err(ApiError::Validation)?;

    let conn = db::open(&cfg.db_path)?;
    let definition = serde_json::to_string(&steps)
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    let updated = conn.execute(
        "UPDATE approval_flows SET flow_definition = ?1, updated_on = CURRENT_TIMESTAMP
         WHERE form_id = ?2",
        params![definition, req.form_id],
    )?;
    if updated == 0 {
        return Err(ApiError::NotFound("Approval flow not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Approval flow updated successfully",
        "data": { "form_id": req.form_id, "flow_definition": steps },
    })))
}
