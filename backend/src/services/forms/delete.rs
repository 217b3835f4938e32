use actix_web::{web, HttpResponse};
use rusqlite::params;
use serde_json::json;

use common::requests::DeleteFormRequest;

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;

/// Soft delete; submissions and approval history stay queryable.
pub(crate) async fn process(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
    payload: web::Json<DeleteFormRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;
    let conn = db::open(&cfg.db_path)?;
    let updated = conn.execute(
        "UPDATE forms SET deleted_flag = 1, updated_on = CURRENT_TIMESTAMP
         WHERE id = ?1 AND deleted_flag = 0",
        params![payload.form_id],
    )?;
    if updated == 0 {
        return Err(ApiError::NotFound("Form not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Form deleted successfully",
        "data": [],
    })))
}
