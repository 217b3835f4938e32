use actix_web::{web, HttpResponse};
use rusqlite::{params, OptionalExtension};
use serde_json::{json, Value};

use common::requests::CreateDepartmentRequest;

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
    let mut stmt = conn.prepare(
        "SELECT d.id, d.name, d.college_id, c.name
         FROM departments d JOIN colleges c ON c.id = d.college_id
         ORDER BY d.id",
    )?;
    let departments = stmt
        .query_map([], |row| {
            Ok(json!({
                "id": row.get::<_, i64>(0)?,
                "name": row.get::<_, String>(1)?,
                "college_id": row.get::<_, i64>(2)?,
                "college": row.get::<_, String>(3)?,
            }))
        })?
        .collect::<Result<Vec<Value>, _>>()?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Departments retrieved successfully",
        "data": departments,
    })))
}

pub(crate) async fn create(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
    payload: web::Json<CreateDepartmentRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;
    let req = payload.into_inner();
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::Validation("Department name is required".to_string()));
    }

    let conn = db::open(&cfg.db_path)?;
    let college: Option<i64> = conn
        .query_row(
            "SELECT id FROM colleges WHERE id = ?1",
            params![req.college_id],
            |row| row.get(0),
        )
        .optional()?;
    if college.is_none() {
        return Err(ApiError::NotFound("College not found".to_string()));
    }

    conn.execute(
        "INSERT INTO departments (name, college_id) VALUES (?1, ?2)",
        params![name, req.college_id],
    )?;
    Ok(HttpResponse::Created().json(json!({
        "status": "success",
        "message": "Department created successfully",
        "data": { "id": conn.last_insert_rowid(), "name": name },
    })))
}
