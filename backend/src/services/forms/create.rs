use actix_web::{web, HttpResponse};
use rusqlite::params;
use serde_json::json;

use common::requests::CreateFormRequest;

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;

pub(crate) async fn process(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
    payload: web::Json<CreateFormRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;
    let req = payload.into_inner();
    if req.title.trim().is_empty() || req.description.trim().is_empty() {
        return Err(ApiError::Validation("All fields are required".to_string()));
    }

    let conn = db::open(&cfg.db_path)?;
    conn.execute(
        "INSERT INTO forms (title, description, initiator, created_by) VALUES (?1, ?2, ?3, ?4)",
        params![req.title.trim(), req.description.trim(), req.initiator, user.id],
    )?;
    let form_id = conn.last_insert_rowid();

    Ok(HttpResponse::Created().json(json!({
        "status": "success",
        "message": "Form created successfully",
        "data": { "id": form_id },
    })))
}
