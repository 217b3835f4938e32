use actix_web::{web, HttpResponse};
use rusqlite::params;
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;

pub(crate) async fn process(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let conn = db::open(&cfg.db_path)?;
    let mut stmt = conn.prepare(
        "SELECT id, title, description, kind, related_id, read, created_on
         FROM notifications WHERE user_id = ?1 ORDER BY created_on DESC, id DESC",
    )?;
    let notifications = stmt
        .query_map(params![user.id], |row| {
            Ok(json!({
                "id": row.get::<_, i64>(0)?,
                "title": row.get::<_, String>(1)?,
                "description": row.get::<_, String>(2)?,
                "kind": row.get::<_, String>(3)?,
                "related_id": row.get::<_, Option<i64>>(4)?,
                "read": row.get::<_, i64>(5)? != 0,
                "created_on": row.get::<_, String>(6)?,
            }))
        })?
        .collect::<Result<Vec<Value>, _>>()?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Notifications retrieved successfully",
        "data": notifications,
    })))
}
