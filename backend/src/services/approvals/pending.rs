use actix_web::{web, HttpResponse};
use rusqlite::params;
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;

/// Open approvals assigned to the caller, oldest first.
pub(crate) async fn process(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let conn = db::open(&cfg.db_path)?;
    let mut stmt = conn.prepare(
        "SELECT a.id, a.response_id, a.step_number, a.role_required, a.created_on,
                f.title, u.first_name, u.last_name
         FROM approvals a
         JOIN form_responses r ON r.id = a.response_id
         JOIN forms f ON f.id = r.form_id
         JOIN users u ON u.id = r.user_id
         WHERE a.approver_id = ?1 AND a.status = 'pending'
         ORDER BY a.created_on",
    )?;
    let approvals = stmt
        .query_map(params![user.id], |row| {
            Ok(json!({
                "approval_id": row.get::<_, i64>(0)?,
                "response_id": row.get::<_, i64>(1)?,
                "step_number": row.get::<_, i64>(2)?,
                "role_required": row.get::<_, String>(3)?,
                "received_on": row.get::<_, String>(4)?,
                "form_title": row.get::<_, String>(5)?,
                "submitted_by": format!(
                    "{} {}",
                    row.get::<_, String>(6)?,
                    row.get::<_, String>(7)?
                ),
            }))
        })?
        .collect::<Result<Vec<Value>, _>>()?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Pending approvals retrieved successfully",
        "data": approvals,
    })))
}
