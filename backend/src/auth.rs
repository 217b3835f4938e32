//! Bearer-token authentication.
//!
//! `AuthUser` is an actix extractor: handlers that take it as a parameter
//! only run for requests carrying a valid `Authorization: Bearer <token>`
//! header whose token maps to a `sessions` row. The loaded user (with its
//! role name joined in) is the scoping context for the approval resolver.

use std::future::{ready, Ready};

use actix_web::{web, FromRequest, HttpRequest};
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db;
use crate::errors::ApiError;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role_id: i64,
    pub role_name: String,
    pub college_id: Option<i64>,
    pub department_id: Option<i64>,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role_name.eq_ignore_ascii_case(ADMIN_ROLE)
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Access denied.".to_string()))
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Result<String, ApiError> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("You are not logged in.".to_string()))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("You are not logged in.".to_string()))?;
    if token.is_empty() {
        return Err(ApiError::Unauthorized("Token is missing.".to_string()));
    }
    Ok(token.to_string())
}

/// Looks a session token up and loads the owning user with its role name.
pub fn user_for_token(conn: &Connection, token: &str) -> Result<AuthUser, ApiError> {
    let user = conn
        .query_row(
            "SELECT u.id, u.first_name, u.last_name, u.email, u.role_id, r.name,
                    u.college_id, u.department_id
             FROM sessions s
             JOIN users u ON u.id = s.user_id
             JOIN roles r ON r.id = u.role_id
             WHERE s.token = ?1",
            params![token],
            |row| {
                Ok(AuthUser {
                    id: row.get(0)?,
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                    email: row.get(3)?,
                    role_id: row.get(4)?,
                    role_name: row.get(5)?,
                    college_id: row.get(6)?,
                    department_id: row.get(7)?,
                })
            },
        )
        .optional()?;
    user.ok_or_else(|| ApiError::Unauthorized("Invalid token".to_string()))
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<AuthUser, ApiError>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(extract_user(req))
    }
}

fn extract_user(req: &HttpRequest) -> Result<AuthUser, ApiError> {
    let token = bearer_token(req)?;
    let cfg = req
        .app_data::<web::Data<AppConfig>>()
        .ok_or_else(|| ApiError::Config("application config not registered".to_string()))?;
    let conn = db::open(&cfg.db_path)?;
    user_for_token(&conn, &token)
}

/// Creates a session row and returns the opaque bearer token.
pub fn issue_token(conn: &Connection, user_id: i64) -> Result<String, ApiError> {
    let token = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO sessions (token, user_id) VALUES (?1, ?2)",
        params![token, user_id],
    )?;
    Ok(token)
}

/// Salted SHA-256 digest stored as `salt$hex`.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, digest(&salt, password))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, hash)) => digest(salt, password) == hash,
        None => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use actix_web::{App, HttpResponse};

    use super::*;

    #[test]
    fn password_round_trip() {
        let stored = hash_password("secret");
        assert!(verify_password("secret", &stored));
        assert!(!verify_password("wrong", &stored));
    }

    #[test]
    fn rejects_unsalted_hash() {
        assert!(!verify_password("secret", "notahash"));
    }

    #[actix_web::test]
    async fn extractor_rejects_missing_or_unknown_tokens() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = AppConfig { db_path: dir.path().join("auth.sqlite") };
        let conn = db::open(&cfg.db_path).expect("open");
        db::init_schema(&conn).expect("schema");
        db::seed_roles(&conn).expect("seed");
        conn.execute(
            "INSERT INTO users (first_name, last_name, email, password_hash, role_id)
             VALUES ('Test', 'User', 'who@test', 'x',
                     (SELECT id FROM roles WHERE name = 'student'))",
            [],
        )
        .expect("user");
        let token = issue_token(&conn, conn.last_insert_rowid()).expect("token");

        let app = actix_test::init_service(App::new().app_data(web::Data::new(cfg)).route(
            "/whoami",
            web::get().to(|user: AuthUser| async move { HttpResponse::Ok().body(user.email) }),
        ))
        .await;

        let resp =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/whoami").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/whoami")
                .insert_header(("Authorization", "Bearer not-a-session"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/whoami")
                .insert_header(("Authorization", format!("Bearer {token}")))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = actix_test::read_body(resp).await;
        assert_eq!(body, "who@test");
    }
}
