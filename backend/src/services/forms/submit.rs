//! Submission ingestion: validates the submission and hands it to the
//! workflow engine, which creates the response and bootstraps the first
//! approval step (or auto-approves when the form has no workable flow).

use actix_web::{web, HttpResponse};
use rusqlite::{params, OptionalExtension};
use serde_json::json;

use common::requests::SubmitResponseRequest;

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;
use crate::notifier;
use crate::workflow::engine::{self, FormInfo, IngestOutcome};
use crate::workflow::roles::RoleCache;

pub(crate) async fn process(
    user: AuthUser,
    cfg: web::Data<AppConfig>,
    roles: web::Data<RoleCache>,
    path: web::Path<i64>,
    payload: web::Json<SubmitResponseRequest>,
) -> Result<HttpResponse, ApiError> {
    let form_id = path.into_inner();
    let req = payload.into_inner();
    if req.answers.is_empty() {
        return Err(ApiError::Validation("Answers are required".to_string()));
    }

    let mut conn = db::open(&cfg.db_path)?;
    let form = conn
        .query_row(
            "SELECT id, title, initiator FROM forms WHERE id = ?1 AND deleted_flag = 0",
            params![form_id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            },
        )
        .optional()?;
    let (form_id, title, initiator_role) =
        form.ok_or_else(|| ApiError::NotFound("Form not found".to_string()))?;

    // Forms that declare an initiator role only accept submissions from
    // holders of that role; admins may submit on anyone's behalf.
    if let Some(required) = &initiator_role {
        if !user.is_admin() && !user.role_name.eq_ignore_ascii_case(required) {
            return Err(ApiError::Forbidden(format!(
                "This form can only be submitted by '{required}'."
            )));
        }
    }

    let form = FormInfo { id: form_id, title };
    let directory = roles.read();
    let (outcome, notices) = engine::ingest(&mut conn, &directory, &form, &user, &req.answers)?;
    drop(directory);
    notifier::dispatch(&conn, &notices);

    let (message, data) = match outcome {
        IngestOutcome::AutoApproved { response_id } => (
            "Form submitted and approved automatically.",
            json!({ "response_id": response_id, "status": "approved" }),
        ),
        IngestOutcome::Routed { response_id, approval_id, .. } => (
            "Form submitted and routed for approval.",
            json!({ "response_id": response_id, "approval_id": approval_id, "status": "pending" }),
        ),
    };

    Ok(HttpResponse::Created().json(json!({
        "status": "success",
        "message": message,
        "data": data,
    })))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use rusqlite::Connection;

    use super::*;
    use crate::auth;
    use crate::workflow::roles::{RoleCache, RoleDirectory};

    fn session_for(conn: &Connection, email: &str, role: &str) -> String {
        conn.execute(
            "INSERT INTO users (first_name, last_name, email, password_hash, role_id)
             VALUES ('Test', 'User', ?1, 'x', (SELECT id FROM roles WHERE name = ?2))",
            params![email, role],
        )
        .expect("user");
        auth::issue_token(conn, conn.last_insert_rowid()).expect("token")
    }

    fn submit_request(form_id: i64, token: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri(&format!("/api/forms/{form_id}/submit"))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({
                "answers": [{ "question_id": 1, "answer_text": "Graduating" }]
            }))
    }

    #[actix_web::test]
    async fn initiator_role_gates_submission_with_admin_override() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = AppConfig { db_path: dir.path().join("forms.sqlite") };
        let conn = db::open(&cfg.db_path).expect("open");
        db::init_schema(&conn).expect("schema");
        db::seed_roles(&conn).expect("seed");
        conn.execute(
            "INSERT INTO forms (title, description, initiator)
             VALUES ('Clearance', 'Final clearance', 'student')",
            [],
        )
        .expect("form");
        let form_id = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO questions (form_id, question_text) VALUES (?1, 'Reason?')",
            params![form_id],
        )
        .expect("question");

        let hod_token = session_for(&conn, "hod@test", "hod");
        let student_token = session_for(&conn, "student@test", "student");
        let admin_token = session_for(&conn, "admin@test", "admin");
        let directory = RoleDirectory::load(&conn).expect("directory");

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(cfg))
                .app_data(web::Data::new(RoleCache::new(directory)))
                .service(super::super::configure_routes()),
        )
        .await;

        // A non-holder of the declared initiator role is turned away.
        let resp =
            test::call_service(&app, submit_request(form_id, &hod_token).to_request()).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp =
            test::call_service(&app, submit_request(form_id, &student_token).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        // Admins may submit on anyone's behalf.
        let resp =
            test::call_service(&app, submit_request(form_id, &admin_token).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn empty_answers_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = AppConfig { db_path: dir.path().join("forms.sqlite") };
        let conn = db::open(&cfg.db_path).expect("open");
        db::init_schema(&conn).expect("schema");
        db::seed_roles(&conn).expect("seed");
        conn.execute(
            "INSERT INTO forms (title, description) VALUES ('Clearance', 'Final clearance')",
            [],
        )
        .expect("form");
        let form_id = conn.last_insert_rowid();
        let token = session_for(&conn, "student@test", "student");
        let directory = RoleDirectory::load(&conn).expect("directory");

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(cfg))
                .app_data(web::Data::new(RoleCache::new(directory)))
                .service(super::super::configure_routes()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/forms/{form_id}/submit"))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({ "answers": [] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
