//! User administration. Organizational reassignment runs inside a
//! transaction so role and scope changes land together.

use actix_web::{web, HttpResponse};
use rusqlite::{params, OptionalExtension, TransactionBehavior};
use serde_json::{json, Value};

use common::requests::{DeleteUserRequest, UpdateUserOrgRequest};

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;
use crate::workflow::roles::RoleCache;

pub(crate) async fn list(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;
    let conn = db::open(&cfg.db_path)?;
    let mut stmt = conn.prepare(
        "SELECT u.id, u.first_name, u.last_name, u.email, r.name, c.name, d.name
         FROM users u
         JOIN roles r ON r.id = u.role_id
         LEFT JOIN colleges c ON c.id = u.college_id
         LEFT JOIN departments d ON d.id = u.department_id
         ORDER BY u.id",
    )?;
    let users = stmt
        .query_map([], |row| {
            Ok(json!({
                "id": row.get::<_, i64>(0)?,
                "first_name": row.get::<_, String>(1)?,
                "last_name": row.get::<_, String>(2)?,
                "email": row.get::<_, String>(3)?,
                "role": row.get::<_, String>(4)?,
                "college": row.get::<_, Option<String>>(5)?,
                "department": row.get::<_, Option<String>>(6)?,
            }))
        })?
        .collect::<Result<Vec<Value>, _>>()?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Users retrieved successfully",
        "data": users,
    })))
}

pub(crate) async fn update_org(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
    roles: web::Data<RoleCache>,
    payload: web::Json<UpdateUserOrgRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;
    let req = payload.into_inner();

    let mut conn = db::open(&cfg.db_path)?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let exists: Option<i64> = tx
        .query_row("SELECT id FROM users WHERE id = ?1", params![req.user_id], |row| {
            row.get(0)
        })
        .optional()?;
    if exists.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    if let Some(role_name) = &req.role {
        let role_id = roles
            .read()
            .lookup(role_name)
            .map(|entry| entry.id)
            .ok_or_else(|| ApiError::Validation(format!("Unknown role '{role_name}'")))?;
        tx.execute(
            "UPDATE users SET role_id = ?1 WHERE id = ?2",
            params![role_id, req.user_id],
        )?;
    }
    tx.execute(
        "UPDATE users SET college_id = ?1, department_id = ?2 WHERE id = ?3",
        params![req.college_id, req.department_id, req.user_id],
    )?;
    tx.commit()?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "User updated successfully",
        "data": { "id": req.user_id },
    })))
}

pub(crate) async fn delete(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
    payload: web::Json<DeleteUserRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;
    if payload.user_id == user.id {
        return Err(ApiError::Validation("You cannot delete your own account".to_string()));
    }

    let mut conn = db::open(&cfg.db_path)?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let exists: Option<i64> = tx
        .query_row(
            "SELECT id FROM users WHERE id = ?1",
            params![payload.user_id],
            |row| row.get(0),
        )
        .optional()?;
    if exists.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    // Users woven into workflow history must stay for the audit trail.
    let referenced: i64 = tx.query_row(
        "SELECT (SELECT COUNT(*) FROM approvals WHERE approver_id = ?1)
              + (SELECT COUNT(*) FROM form_responses WHERE user_id = ?1)",
        params![payload.user_id],
        |row| row.get(0),
    )?;
    if referenced > 0 {
        return Err(ApiError::Conflict(
            "User is referenced by submissions or approvals and cannot be deleted".to_string(),
        ));
    }

    tx.execute("DELETE FROM sessions WHERE user_id = ?1", params![payload.user_id])?;
    tx.execute("DELETE FROM notifications WHERE user_id = ?1", params![payload.user_id])?;
    tx.execute("DELETE FROM users WHERE id = ?1", params![payload.user_id])?;
    tx.commit()?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "User deleted successfully",
        "data": [],
    })))
}
