use actix_web::{web, HttpResponse};
use rusqlite::{params, OptionalExtension};
use serde_json::{json, Value};

use common::requests::CreateCollegeRequest;

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;

pub(crate) async fn list(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;
    let conn = db::open(&cfg.db_path)?;
    let mut stmt = conn.prepare("SELECT id, name FROM colleges ORDER BY id")?;
    let colleges = stmt
        .query_map([], |row| {
            Ok(json!({
                "id": row.get::<_, i64>(0)?,
                "name": row.get::<_, String>(1)?,
            }))
        })?
        .collect::<Result<Vec<Value>, _>>()?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Colleges retrieved successfully",
        "data": colleges,
    })))
}

pub(crate) async fn create(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
    payload: web::Json<CreateCollegeRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::Validation("College name is required".to_string()));
    }

    let conn = db::open(&cfg.db_path)?;
    let existing: Option<i64> = conn
        .query_row("SELECT id FROM colleges WHERE name = ?1", params![name], |row| {
            row.get(0)
        })
        .optional()?;
    if existing.is_some() {
        return Err(ApiError::Conflict("College already exists".to_string()));
    }

    conn.execute("INSERT INTO colleges (name) VALUES (?1)", params![name])?;
    Ok(HttpResponse::Created().json(json!({
        "status": "success",
        "message": "College created successfully",
        "data": { "id": conn.last_insert_rowid(), "name": name },
    })))
}
