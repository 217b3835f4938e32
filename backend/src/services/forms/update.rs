use actix_web::{web, HttpResponse};
use rusqlite::params;
use serde_json::json;

use common::requests::UpdateFormRequest;

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;

pub(crate) async fn process(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
    payload: web::Json<UpdateFormRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;
    let req = payload.into_inner();
    if req.title.trim().is_empty() || req.description.trim().is_empty() {
        return Err(ApiError::Validation("All fields are required".to_string()));
    }

    let conn = db::open(&cfg.db_path)?;
    let updated = conn.execute(
        "UPDATE forms SET title = ?1, description = ?2, initiator = ?3,
                          updated_on = CURRENT_TIMESTAMP
         WHERE id = ?4 AND deleted_flag = 0",
        params![req.title.trim(), req.description.trim(), req.initiator, req.id],
    )?;
    if updated == 0 {
        return Err(ApiError::NotFound("Form not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Form updated successfully",
        "data": { "id": req.id },
    })))
}
