//! Role directory administration. Mutations refresh the in-memory
//! `RoleCache` so the resolver never routes against a stale snapshot.

use actix_web::{web, HttpResponse};
use rusqlite::{params, OptionalExtension};
use serde_json::{json, Value};

use common::requests::{CreateRoleRequest, DeleteRoleRequest};

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;
use crate::workflow::flow;
use crate::workflow::roles::RoleCache;

pub(crate) async fn list(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;
    let conn = db::open(&cfg.db_path)?;
    let mut stmt = conn.prepare("SELECT id, name, scope FROM roles ORDER BY id")?;
    let roles = stmt
        .query_map([], |row| {
            Ok(json!({
                "id": row.get::<_, i64>(0)?,
                "name": row.get::<_, String>(1)?,
                "scope": row.get::<_, String>(2)?,
            }))
        })?
        .collect::<Result<Vec<Value>, _>>()?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Roles retrieved successfully",
        "data": roles,
    })))
}

pub(crate) async fn create(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
    roles: web::Data<RoleCache>,
    payload: web::Json<CreateRoleRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;
    let req = payload.into_inner();
    let name = req.name.trim().to_lowercase();
    if name.is_empty() {
        return Err(ApiError::Validation("Role name is required".to_string()));
    }

    let conn = db::open(&cfg.db_path)?;
    let existing: Option<i64> = conn
        .query_row("SELECT id FROM roles WHERE name = ?1", params![name], |row| {
            row.get(0)
        })
        .optional()?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Role already exists".to_string()));
    }

    conn.execute(
        "INSERT INTO roles (name, scope) VALUES (?1, ?2)",
        params![name, req.scope.as_str()],
    )?;
    let role_id = conn.last_insert_rowid();
    roles.refresh(&conn)?;

    Ok(HttpResponse::Created().json(json!({
        "status": "success",
        "message": "Role created successfully",
        "data": { "id": role_id, "name": name, "scope": req.scope.as_str() },
    })))
}

pub(crate) async fn delete(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
    roles: web::Data<RoleCache>,
    payload: web::Json<DeleteRoleRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;
    let conn = db::open(&cfg.db_path)?;

    let name: Option<String> = conn
        .query_row(
            "SELECT name FROM roles WHERE id = ?1",
            params![payload.role_id],
            |row| row.get(0),
        )
        .optional()?;
    let name = name.ok_or_else(|| ApiError::NotFound("Role not found".to_string()))?;

    let holders: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE role_id = ?1",
        params![payload.role_id],
        |row| row.get(0),
    )?;
    if holders > 0 {
        return Err(ApiError::Conflict(
            "Role is assigned to users and cannot be deleted".to_string(),
        ));
    }
    if role_used_in_flows(&conn, &name)? {
        return Err(ApiError::Conflict(
            "Role is referenced by an approval flow and cannot be deleted".to_string(),
        ));
    }

    conn.execute("DELETE FROM roles WHERE id = ?1", params![payload.role_id])?;
    roles.refresh(&conn)?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Role deleted successfully",
        "data": [],
    })))
}

/// Whether any stored flow definition names this role.
fn role_used_in_flows(conn: &rusqlite::Connection, role_name: &str) -> Result<bool, ApiError> {
    let mut stmt = conn.prepare("SELECT form_id FROM approval_flows")?;
    let form_ids = stmt
        .query_map([], |row| row.get::<_, i64>(0))?
        .collect::<Result<Vec<i64>, _>>()?;
    for form_id in form_ids {
        let steps = flow::load_flow(conn, form_id)?.unwrap_or_default();
        if steps
            .iter()
            .any(|s| s.role_required.eq_ignore_ascii_case(role_name))
        {
            return Ok(true);
        }
    }
    Ok(false)
}
