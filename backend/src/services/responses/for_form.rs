use actix_web::{web, HttpResponse};
use rusqlite::params;
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;

/// All submissions for one form, with their answers (admin only).
pub(crate) async fn process(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;
    let form_id = path.into_inner();
    let conn = db::open(&cfg.db_path)?;

    let mut stmt = conn.prepare(
        "SELECT r.id, r.status, r.created_on, u.first_name, u.last_name
         FROM form_responses r JOIN users u ON u.id = r.user_id
         WHERE r.form_id = ?1 ORDER BY r.id",
    )?;
    let rows = stmt
        .query_map(params![form_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut detail_stmt = conn.prepare(
        "SELECT question_id, answer_text FROM response_details
         WHERE response_id = ?1 ORDER BY id",
    )?;
    let mut responses = Vec::with_capacity(rows.len());
    for (response_id, status, created_on, first_name, last_name) in rows {
        let details = detail_stmt
            .query_map(params![response_id], |row| {
                Ok(json!({
                    "question_id": row.get::<_, i64>(0)?,
                    "answer_text": row.get::<_, String>(1)?,
                }))
            })?
            .collect::<Result<Vec<Value>, _>>()?;
        responses.push(json!({
            "response_id": response_id,
            "status": status,
            "submitted_on": created_on,
            "submitted_by": format!("{first_name} {last_name}"),
            "details": details,
        }));
    }

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Responses retrieved successfully",
        "data": responses,
    })))
}
