use actix_web::{web, HttpResponse};
use rusqlite::{params, OptionalExtension};
use serde_json::json;

use common::requests::SignupRequest;

use crate::auth;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;
use crate::workflow::roles::RoleCache;

pub(crate) async fn process(
    cfg: web::Data<AppConfig>,
    roles: web::Data<RoleCache>,
    payload: web::Json<SignupRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = payload.into_inner();
    if req.first_name.trim().is_empty()
        || req.last_name.trim().is_empty()
        || req.email.trim().is_empty()
        || req.password.is_empty()
    {
        return Err(ApiError::Validation("All fields are required".to_string()));
    }

    let conn = db::open(&cfg.db_path)?;

    let role_id = roles
        .read()
        .lookup(&req.role)
        .map(|entry| entry.id)
        .ok_or_else(|| ApiError::Validation(format!("Unknown role '{}'", req.role)))?;

    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM users WHERE email = ?1",
            params![req.email],
            |row| row.get(0),
        )
        .optional()?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Email is already registered".to_string()));
    }

    let password_hash = auth::hash_password(&req.password);
    conn.execute(
        "INSERT INTO users (first_name, last_name, email, password_hash, role_id,
                            college_id, department_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            req.first_name.trim(),
            req.last_name.trim(),
            req.email.trim(),
            password_hash,
            role_id,
            req.college_id,
            req.department_id,
        ],
    )?;
    let user_id = conn.last_insert_rowid();

    Ok(HttpResponse::Created().json(json!({
        "status": "success",
        "message": "Account created successfully",
        "data": { "id": user_id },
    })))
}
