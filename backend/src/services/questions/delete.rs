use actix_web::{web, HttpResponse};
use rusqlite::params;
use serde_json::json;

use common::requests::DeleteQuestionRequest;

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;

/// Soft delete so existing answers keep their question text.
pub(crate) async fn process(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
    payload: web::Json<DeleteQuestionRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;
    let conn = db::open(&cfg.db_path)?;
    let updated = conn.execute(
        "UPDATE questions SET deleted_flag = 1 WHERE id = ?1 AND deleted_flag = 0",
        params![payload.question_id],
    )?;
    if updated == 0 {
        return Err(ApiError::NotFound("Question not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Question deleted successfully",
        "data": [],
    })))
}
