use actix_web::{web, HttpResponse};
use rusqlite::{params, OptionalExtension};
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;

/// Form detail including its non-deleted questions.
pub(crate) async fn process(
    _user: AuthUser,
    cfg: web::Data<AppConfig>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let form_id = path.into_inner();
    let conn = db::open(&cfg.db_path)?;

    let form = conn
        .query_row(
            "SELECT id, title, description, initiator FROM forms
             WHERE id = ?1 AND deleted_flag = 0",
            params![form_id],
            |row| {
                Ok(json!({
                    "id": row.get::<_, i64>(0)?,
                    "title": row.get::<_, String>(1)?,
                    "description": row.get::<_, String>(2)?,
                    "initiator": row.get::<_, Option<String>>(3)?,
                }))
            },
        )
        .optional()?;
    let mut form = form.ok_or_else(|| ApiError::NotFound("Form not found".to_string()))?;

    let mut stmt = conn.prepare(
        "SELECT id, question_text FROM questions
         WHERE form_id = ?1 AND deleted_flag = 0 ORDER BY id",
    )?;
    let questions = stmt
        .query_map(params![form_id], |row| {
            Ok(json!({
                "id": row.get::<_, i64>(0)?,
                "question_text": row.get::<_, String>(1)?,
            }))
        })?
        .collect::<Result<Vec<Value>, _>>()?;
    form["questions"] = Value::Array(questions);

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Form retrieved successfully",
        "data": form,
    })))
}
