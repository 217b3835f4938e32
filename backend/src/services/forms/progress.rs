//! Per-submission progress: the ordered approval history plus the
//! submitted answers. Visible to the submission owner, any approver who
//! appears in the chain, or an admin.

use actix_web::{web, HttpResponse};
use rusqlite::{params, OptionalExtension};
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;

pub(crate) async fn process(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let response_id = path.into_inner();
    let conn = db::open(&cfg.db_path)?;

    let row = conn
        .query_row(
            "SELECT r.user_id, r.status, r.created_on, f.title
             FROM form_responses r JOIN forms f ON f.id = r.form_id
             WHERE r.id = ?1",
            params![response_id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )
        .optional()?;
    let (owner_id, status, submitted_on, form_title) =
        row.ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    let involved: i64 = conn.query_row(
        "SELECT COUNT(*) FROM approvals WHERE response_id = ?1 AND approver_id = ?2",
        params![response_id, user.id],
        |row| row.get(0),
    )?;
    if owner_id != user.id && involved == 0 && !user.is_admin() {
        return Err(ApiError::Forbidden(
            "You are not allowed to view this submission.".to_string(),
        ));
    }

    let mut stmt = conn.prepare(
        "SELECT a.step_number, a.role_required, a.status, a.comment, a.updated_on,
                u.first_name, u.last_name
         FROM approvals a LEFT JOIN users u ON u.id = a.approver_id
         WHERE a.response_id = ?1 ORDER BY a.step_number",
    )?;
    let approvals = stmt
        .query_map(params![response_id], |row| {
            let first: Option<String> = row.get(5)?;
            let last: Option<String> = row.get(6)?;
            let approver = match (first, last) {
                (Some(f), Some(l)) => Some(format!("{f} {l}")),
                _ => None,
            };
            Ok(json!({
                "step_number": row.get::<_, i64>(0)?,
                "role_required": row.get::<_, String>(1)?,
                "status": row.get::<_, String>(2)?,
                "comment": row.get::<_, Option<String>>(3)?,
                "decided_on": row.get::<_, String>(4)?,
                "approver": approver,
            }))
        })?
        .collect::<Result<Vec<Value>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT q.question_text, d.answer_text
         FROM response_details d JOIN questions q ON q.id = d.question_id
         WHERE d.response_id = ?1 ORDER BY d.id",
    )?;
    let answers = stmt
        .query_map(params![response_id], |row| {
            Ok(json!({
                "question": row.get::<_, String>(0)?,
                "answer": row.get::<_, String>(1)?,
            }))
        })?
        .collect::<Result<Vec<Value>, _>>()?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Submission progress retrieved successfully",
        "data": {
            "form_title": form_title,
            "status": status,
            "submitted_on": submitted_on,
            "approvals": approvals,
            "answers": answers,
        },
    })))
}
