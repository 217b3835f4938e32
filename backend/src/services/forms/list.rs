use actix_web::{web, HttpResponse};
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;

pub(crate) async fn process(
    _user: AuthUser,
    cfg: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let conn = db::open(&cfg.db_path)?;
    let mut stmt = conn.prepare(
        "SELECT id, title, description, initiator, created_on FROM forms
         WHERE deleted_flag = 0 ORDER BY id",
    )?;
    let forms = stmt
        .query_map([], |row| {
            Ok(json!({
                "id": row.get::<_, i64>(0)?,
                "title": row.get::<_, String>(1)?,
                "description": row.get::<_, String>(2)?,
                "initiator": row.get::<_, Option<String>>(3)?,
                "created_on": row.get::<_, String>(4)?,
            }))
        })?
        .collect::<Result<Vec<Value>, _>>()?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Forms retrieved successfully",
        "data": forms,
    })))
}
