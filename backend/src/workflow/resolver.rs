//! Approver resolution.
//!
//! Maps a required role name plus the ORIGINAL initiator's organizational
//! context to a concrete user. Department-scoped roles search the
//! initiator's department first and widen to the college; college-scoped
//! roles search the college only; global roles prefer a college match
//! before falling back to any holder. One query per tier, lowest user id
//! wins within a tier.

use rusqlite::{params, Connection, OptionalExtension, ToSql};

use common::model::role::RoleScope;

use crate::errors::ApiError;
use crate::workflow::roles::RoleDirectory;

/// Organizational context of the user who started the workflow. Mid-flow
/// advancement keeps using the initiator's context, not the previous
/// approver's.
#[derive(Clone, Copy, Debug)]
pub struct InitiatorContext {
    pub department_id: Option<i64>,
    pub college_id: Option<i64>,
}

#[derive(Clone, Debug)]
pub struct Candidate {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// What a caller wants when no candidate exists at any tier. Ingestion
/// auto-approves; mid-flow advancement fails so a mandated approver is
/// never silently skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnresolvedPolicy {
    AutoApprove,
    Fail,
}

pub enum Resolution {
    Approver(Candidate),
    Unresolved,
}

/// Finds a candidate approver for `role_required`. `Ok(None)` means no
/// user holds the role within reach of the initiator; an unknown role
/// name is a configuration error.
pub fn resolve(
    conn: &Connection,
    directory: &RoleDirectory,
    role_required: &str,
    ctx: &InitiatorContext,
) -> Result<Option<Candidate>, ApiError> {
    let entry = directory.lookup(role_required).ok_or_else(|| {
        ApiError::Config(format!(
            "role '{role_required}' required by the flow is not in the role directory"
        ))
    })?;

    let candidate = match entry.scope {
        RoleScope::Department => {
            let in_department = match ctx.department_id {
                Some(dept) => find_scoped(conn, entry.id, "department_id", dept)?,
                None => None,
            };
            match in_department {
                Some(c) => Some(c),
                // Widen to the initiator's college.
                None => match ctx.college_id {
                    Some(college) => find_scoped(conn, entry.id, "college_id", college)?,
                    None => None,
                },
            }
        }
        RoleScope::College => match ctx.college_id {
            Some(college) => find_scoped(conn, entry.id, "college_id", college)?,
            None => None,
        },
        RoleScope::Global => {
            let in_college = match ctx.college_id {
                Some(college) => find_scoped(conn, entry.id, "college_id", college)?,
                None => None,
            };
            match in_college {
                Some(c) => Some(c),
                None => find_any(conn, entry.id)?,
            }
        }
    };
    Ok(candidate)
}

/// `resolve` with the caller's unresolved policy applied.
pub fn resolve_with_policy(
    conn: &Connection,
    directory: &RoleDirectory,
    role_required: &str,
    ctx: &InitiatorContext,
    policy: UnresolvedPolicy,
) -> Result<Resolution, ApiError> {
    match resolve(conn, directory, role_required, ctx)? {
        Some(candidate) => Ok(Resolution::Approver(candidate)),
        None => match policy {
            UnresolvedPolicy::AutoApprove => Ok(Resolution::Unresolved),
            UnresolvedPolicy::Fail => Err(ApiError::Config(format!(
                "no approver available for role '{role_required}'"
            ))),
        },
    }
}

fn find_scoped(
    conn: &Connection,
    role_id: i64,
    scope_column: &str,
    scope_id: i64,
) -> Result<Option<Candidate>, ApiError> {
    // scope_column is one of two fixed identifiers, never user input.
    let sql = format!(
        "SELECT id, first_name, last_name, email FROM users
         WHERE role_id = ?1 AND {scope_column} = ?2
         ORDER BY id LIMIT 1"
    );
    query_candidate(conn, &sql, params![role_id, scope_id])
}

fn find_any(conn: &Connection, role_id: i64) -> Result<Option<Candidate>, ApiError> {
    query_candidate(
        conn,
        "SELECT id, first_name, last_name, email FROM users
         WHERE role_id = ?1 ORDER BY id LIMIT 1",
        params![role_id],
    )
}

fn query_candidate(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> Result<Option<Candidate>, ApiError> {
    let candidate = conn
        .query_row(sql, params, |row| {
            Ok(Candidate {
                id: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                email: row.get(3)?,
            })
        })
        .optional()?;
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::workflow::roles::RoleDirectory;

    struct Fixture {
        conn: Connection,
        college_a: i64,
        dept_cs: i64,
        dept_me: i64,
    }

    fn fixture() -> Fixture {
        let conn = db::open_test_db();
        conn.execute("INSERT INTO colleges (name) VALUES ('Engineering')", [])
            .expect("college");
        let college_a = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO departments (name, college_id) VALUES ('Computer Science', ?1)",
            params![college_a],
        )
        .expect("dept");
        let dept_cs = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO departments (name, college_id) VALUES ('Mechanical', ?1)",
            params![college_a],
        )
        .expect("dept");
        let dept_me = conn.last_insert_rowid();
        Fixture { conn, college_a, dept_cs, dept_me }
    }

    fn add_user(
        f: &Fixture,
        email: &str,
        role: &str,
        college_id: Option<i64>,
        department_id: Option<i64>,
    ) -> i64 {
        f.conn
            .execute(
                "INSERT INTO users (first_name, last_name, email, password_hash, role_id,
                                    college_id, department_id)
                 VALUES ('Test', 'User', ?1, 'x',
                         (SELECT id FROM roles WHERE name = ?2), ?3, ?4)",
                params![email, role, college_id, department_id],
            )
            .expect("user");
        f.conn.last_insert_rowid()
    }

    fn directory(f: &Fixture) -> RoleDirectory {
        RoleDirectory::load(&f.conn).expect("directory")
    }

    fn ctx(f: &Fixture) -> InitiatorContext {
        InitiatorContext {
            department_id: Some(f.dept_cs),
            college_id: Some(f.college_a),
        }
    }

    #[test]
    fn department_role_matches_within_department() {
        let f = fixture();
        let hod = add_user(&f, "hod@test", "hod", Some(f.college_a), Some(f.dept_cs));
        add_user(&f, "hod2@test", "hod", Some(f.college_a), Some(f.dept_me));
        let found = resolve(&f.conn, &directory(&f), "hod", &ctx(&f)).expect("resolve");
        assert_eq!(found.map(|c| c.id), Some(hod));
    }

    #[test]
    fn department_role_widens_to_college() {
        let f = fixture();
        // Coordinator sits in another department of the same college.
        let coord = add_user(
            &f,
            "coord@test",
            "departmental pg coordinator",
            Some(f.college_a),
            Some(f.dept_me),
        );
        let found = resolve(&f.conn, &directory(&f), "departmental pg coordinator", &ctx(&f))
            .expect("resolve");
        assert_eq!(found.map(|c| c.id), Some(coord));
    }

    #[test]
    fn college_role_does_not_widen() {
        let f = fixture();
        f.conn
            .execute("INSERT INTO colleges (name) VALUES ('Science')", [])
            .expect("college");
        let other_college = f.conn.last_insert_rowid();
        add_user(&f, "dean@test", "college dean", Some(other_college), None);
        let found =
            resolve(&f.conn, &directory(&f), "college dean", &ctx(&f)).expect("resolve");
        assert!(found.is_none());
    }

    #[test]
    fn global_role_prefers_college_match() {
        let f = fixture();
        add_user(&f, "dean1@test", "dean sps", None, None);
        let local = add_user(&f, "dean2@test", "dean sps", Some(f.college_a), None);
        let found = resolve(&f.conn, &directory(&f), "dean sps", &ctx(&f)).expect("resolve");
        assert_eq!(found.map(|c| c.id), Some(local));
    }

    #[test]
    fn global_role_falls_back_to_any_holder() {
        let f = fixture();
        let dean = add_user(&f, "dean@test", "dean sps", None, None);
        let found = resolve(&f.conn, &directory(&f), "Dean SPS", &ctx(&f)).expect("resolve");
        assert_eq!(found.map(|c| c.id), Some(dean));
    }

    #[test]
    fn unknown_role_is_a_config_error() {
        let f = fixture();
        let err = resolve(&f.conn, &directory(&f), "registrar", &ctx(&f)).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn fail_policy_turns_empty_resolution_into_error() {
        let f = fixture();
        let dir = directory(&f);
        let err =
            resolve_with_policy(&f.conn, &dir, "hod", &ctx(&f), UnresolvedPolicy::Fail)
                .err()
                .expect("should fail");
        assert!(matches!(err, ApiError::Config(_)));
        let resolution =
            resolve_with_policy(&f.conn, &dir, "hod", &ctx(&f), UnresolvedPolicy::AutoApprove)
                .expect("ok");
        assert!(matches!(resolution, Resolution::Unresolved));
    }
}
