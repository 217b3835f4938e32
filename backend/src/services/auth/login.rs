use actix_web::{web, HttpResponse};
use rusqlite::{params, OptionalExtension};
use serde_json::json;

use common::requests::LoginRequest;

use crate::auth;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;

pub(crate) async fn process(
    cfg: web::Data<AppConfig>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = payload.into_inner();
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation("All fields are required".to_string()));
    }

    let conn = db::open(&cfg.db_path)?;
    let row = conn
        .query_row(
            "SELECT u.id, u.password_hash, u.first_name, u.last_name, r.name
             FROM users u JOIN roles r ON r.id = u.role_id
             WHERE u.email = ?1",
            params![req.email.trim()],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?;

    // One message for both failure modes so the endpoint does not leak
    // which emails exist.
    let (user_id, password_hash, first_name, last_name, role_name) =
        row.ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;
    if !auth::verify_password(&req.password, &password_hash) {
        return Err(ApiError::Unauthorized("Invalid email or password".to_string()));
    }

    let token = auth::issue_token(&conn, user_id)?;
    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Logged in successfully",
        "data": {
            "token": token,
            "user": {
                "id": user_id,
                "first_name": first_name,
                "last_name": last_name,
                "role": role_name,
            },
        },
    })))
}
