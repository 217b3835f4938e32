use actix_web::{web, HttpResponse};
use rusqlite::params;
use serde_json::json;

use common::requests::MarkReadRequest;

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;

pub(crate) async fn process(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
    payload: web::Json<MarkReadRequest>,
) -> Result<HttpResponse, ApiError> {
    let conn = db::open(&cfg.db_path)?;
    // Scoped to the caller so nobody can mark another user's rows.
    let updated = conn.execute(
        "UPDATE notifications SET read = 1 WHERE id = ?1 AND user_id = ?2",
        params![payload.notification_id, user.id],
    )?;
    if updated == 0 {
        return Err(ApiError::NotFound("Notification not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Notification marked as read",
        "data": [],
    })))
}
