use actix_web::{web, HttpResponse};
use rusqlite::params;
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;

/// The caller's own submissions with their overall status.
pub(crate) async fn process(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let conn = db::open(&cfg.db_path)?;
    let mut stmt = conn.prepare(
        "SELECT r.id, f.id, f.title, f.description, r.status, r.created_on
         FROM form_responses r JOIN forms f ON f.id = r.form_id
         WHERE r.user_id = ?1 ORDER BY r.created_on DESC",
    )?;
    let submissions = stmt
        .query_map(params![user.id], |row| {
            Ok(json!({
                "response_id": row.get::<_, i64>(0)?,
                "form_id": row.get::<_, i64>(1)?,
                "form_title": row.get::<_, String>(2)?,
                "form_description": row.get::<_, String>(3)?,
                "status": row.get::<_, String>(4)?,
                "submitted_on": row.get::<_, String>(5)?,
            }))
        })?
        .collect::<Result<Vec<Value>, _>>()?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Submitted forms retrieved successfully",
        "data": submissions,
    })))
}
