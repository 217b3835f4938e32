//! Database access: connection setup, schema creation and role seeding.
//!
//! Connections are opened per operation from the configured path, the
//! same way each service touches the store independently. The schema is
//! idempotent (`CREATE TABLE IF NOT EXISTS`) so startup can always run it.

use std::path::Path;

use log::info;
use rusqlite::Connection;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS roles (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    scope       TEXT NOT NULL DEFAULT 'global',
    created_on  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS colleges (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    created_on  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS departments (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    college_id  INTEGER NOT NULL REFERENCES colleges(id),
    created_on  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role_id       INTEGER NOT NULL REFERENCES roles(id),
    college_id    INTEGER REFERENCES colleges(id),
    department_id INTEGER REFERENCES departments(id),
    created_on    TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS sessions (
    token       TEXT PRIMARY KEY,
    user_id     INTEGER NOT NULL REFERENCES users(id),
    created_on  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS forms (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    title        TEXT NOT NULL,
    description  TEXT NOT NULL,
    initiator    TEXT,
    created_by   INTEGER REFERENCES users(id),
    deleted_flag INTEGER NOT NULL DEFAULT 0,
    created_on   TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_on   TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS questions (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    form_id       INTEGER NOT NULL REFERENCES forms(id),
    question_text TEXT NOT NULL,
    deleted_flag  INTEGER NOT NULL DEFAULT 0,
    created_on    TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS approval_flows (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    form_id         INTEGER NOT NULL UNIQUE REFERENCES forms(id),
    flow_definition TEXT NOT NULL,
    created_on      TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_on      TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS form_responses (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    form_id     INTEGER NOT NULL REFERENCES forms(id),
    user_id     INTEGER NOT NULL REFERENCES users(id),
    status      TEXT NOT NULL DEFAULT 'pending',
    created_on  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_on  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS response_details (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    response_id INTEGER NOT NULL REFERENCES form_responses(id),
    question_id INTEGER NOT NULL REFERENCES questions(id),
    answer_text TEXT NOT NULL,
    created_on  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS approvals (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    response_id   INTEGER NOT NULL REFERENCES form_responses(id),
    step_number   INTEGER NOT NULL,
    role_required TEXT NOT NULL,
    approver_id   INTEGER REFERENCES users(id),
    status        TEXT NOT NULL DEFAULT 'pending',
    comment       TEXT,
    created_on    TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_on    TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS notifications (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id),
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    kind        TEXT NOT NULL,
    related_id  INTEGER,
    read        INTEGER NOT NULL DEFAULT 0,
    created_on  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_approvals_approver ON approvals(approver_id, status);
CREATE INDEX IF NOT EXISTS idx_approvals_response ON approvals(response_id);
CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id);
";

/// Default role directory, written once into an empty `roles` table.
const SEED_ROLES: &[(&str, &str)] = &[
    ("student", "global"),
    ("admin", "global"),
    ("college dean", "college"),
    ("hod", "department"),
    ("dean sps", "global"),
    ("sub-dean sps", "global"),
    ("college pg coordinator", "college"),
    ("departmental pg coordinator", "department"),
];

/// Opens a connection with foreign keys enforced and a busy timeout so
/// concurrent requests queue on the write lock instead of failing.
pub fn open(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(std::time::Duration::from_secs(5))?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}

pub fn seed_roles(conn: &Connection) -> rusqlite::Result<()> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM roles", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(());
    }
    for (name, scope) in SEED_ROLES {
        conn.execute(
            "INSERT INTO roles (name, scope) VALUES (?1, ?2)",
            rusqlite::params![name, scope],
        )?;
    }
    info!("seeded {} roles", SEED_ROLES.len());
    Ok(())
}

#[cfg(test)]
pub fn open_test_db() -> Connection {
    let conn = Connection::open_in_memory().expect("in-memory db");
    conn.pragma_update(None, "foreign_keys", "ON").expect("pragma");
    init_schema(&conn).expect("schema");
    seed_roles(&conn).expect("seed");
    conn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_and_seed_persist_across_connections() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("forms.sqlite");
        {
            let conn = open(&path).expect("open");
            init_schema(&conn).expect("schema");
            seed_roles(&conn).expect("seed");
        }

        let conn = open(&path).expect("reopen");
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM roles", [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, SEED_ROLES.len() as i64);

        // Seeding a populated table is a no-op.
        seed_roles(&conn).expect("reseed");
        let again: i64 = conn
            .query_row("SELECT COUNT(*) FROM roles", [], |row| row.get(0))
            .expect("count");
        assert_eq!(again, count);
    }
}
