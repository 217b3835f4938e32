use actix_web::{web, HttpResponse};
use rusqlite::{params, OptionalExtension};
use serde_json::json;

use common::requests::CreateQuestionRequest;

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;

pub(crate) async fn process(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
    payload: web::Json<CreateQuestionRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;
    let req = payload.into_inner();
    if req.question_text.trim().is_empty() {
        return Err(ApiError::Validation("Question text is required".to_string()));
    }

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

    conn.execute(
        "INSERT INTO questions (form_id, question_text) VALUES (?1, ?2)",
        params![req.form_id, req.question_text.trim()],
    )?;

    Ok(HttpResponse::Created().json(json!({
        "status": "success",
        "message": "Question created successfully",
        "data": { "id": conn.last_insert_rowid() },
    })))
}
