//! The per-submission workflow state machine.
//!
//! A `form_responses` row moves `pending -> approved | rejected` and both
//! end states are terminal. While pending it owns exactly one open
//! approval, the highest-numbered one created so far. `ingest` bootstraps
//! the chain (fail-open: a form without workable governance auto-approves)
//! and `decide` advances or terminates it (fail-closed: a mid-flow
//! resolution failure aborts the decision).
//!
//! Both operations run inside a single IMMEDIATE transaction; the status
//! write in `decide` is a conditional update that claims the pending row,
//! so two concurrent decisions on the same approval cannot both advance
//! the flow. Notices are queued during the transaction and dispatched by
//! the caller after commit.

use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use common::model::status::{ApprovalStatus, Decision, ResponseStatus};
use common::requests::AnswerInput;

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::notifier::Notice;
use crate::workflow::flow;
use crate::workflow::resolver::{
    self, InitiatorContext, Resolution, UnresolvedPolicy,
};
use crate::workflow::roles::RoleDirectory;

/// The form a submission targets, as loaded by the submit handler.
pub struct FormInfo {
    pub id: i64,
    pub title: String,
}

#[derive(Debug)]
pub enum IngestOutcome {
    /// No workable flow or no approver for the first step; the response
    /// was approved immediately.
    AutoApproved { response_id: i64 },
    Routed {
        response_id: i64,
        approval_id: i64,
        approver_id: i64,
    },
}

#[derive(Debug)]
pub enum DecideOutcome {
    Rejected { response_id: i64 },
    /// The decided approval was the last step of the flow.
    FinalApproved { response_id: i64 },
    Advanced {
        response_id: i64,
        next_approval_id: i64,
        next_step: u32,
        approver_id: i64,
    },
}

/// Creates the workflow instance for a submission: response row, answer
/// rows, and the first pending approval when one can be routed.
pub fn ingest(
    conn: &mut Connection,
    directory: &RoleDirectory,
    form: &FormInfo,
    initiator: &AuthUser,
    answers: &[AnswerInput],
) -> Result<(IngestOutcome, Vec<Notice>), ApiError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    tx.execute(
        "INSERT INTO form_responses (form_id, user_id, status) VALUES (?1, ?2, ?3)",
        params![form.id, initiator.id, ResponseStatus::Pending.as_str()],
    )?;
    let response_id = tx.last_insert_rowid();
    for answer in answers {
        tx.execute(
            "INSERT INTO response_details (response_id, question_id, answer_text)
             VALUES (?1, ?2, ?3)",
            params![response_id, answer.question_id, answer.answer_text],
        )?;
    }

    let steps = flow::load_flow(&tx, form.id)?.unwrap_or_default();
    let first = steps.first().filter(|s| flow::step_is_routable(s));

    let (outcome, notices) = match first {
        None => auto_approve(
            &tx,
            response_id,
            form,
            initiator,
            "no approval flow is configured for this form",
        )?,
        Some(step) => {
            let ctx = InitiatorContext {
                department_id: initiator.department_id,
                college_id: initiator.college_id,
            };
            let resolution = resolver::resolve_with_policy(
                &tx,
                directory,
                &step.role_required,
                &ctx,
                UnresolvedPolicy::AutoApprove,
            )?;
            match resolution {
                Resolution::Unresolved => auto_approve(
                    &tx,
                    response_id,
                    form,
                    initiator,
                    &format!("no approver could be found for role '{}'", step.role_required),
                )?,
                Resolution::Approver(approver) => {
                    let approval_id = create_approval(
                        &tx,
                        response_id,
                        step.step,
                        &step.role_required,
                        approver.id,
                    )?;
                    let notices = vec![
                        Notice::submission(
                            initiator.id,
                            format!(
                                "Your submission for '{}' was received and routed for approval.",
                                form.title
                            ),
                            response_id,
                        ),
                        Notice::approval(
                            approver.id,
                            format!("A submission for '{}' is awaiting your approval.", form.title),
                            approval_id,
                        ),
                    ];
                    (
                        IngestOutcome::Routed {
                            response_id,
                            approval_id,
                            approver_id: approver.id,
                        },
                        notices,
                    )
                }
            }
        }
    };

    check_open_approval_invariant(&tx, response_id)?;
    tx.commit()?;
    Ok((outcome, notices))
}

fn auto_approve(
    tx: &Connection,
    response_id: i64,
    form: &FormInfo,
    initiator: &AuthUser,
    reason: &str,
) -> Result<(IngestOutcome, Vec<Notice>), ApiError> {
    tx.execute(
        "UPDATE form_responses SET status = ?1, updated_on = CURRENT_TIMESTAMP
         WHERE id = ?2",
        params![ResponseStatus::Approved.as_str(), response_id],
    )?;
    info!("response {response_id} auto-approved: {reason}");
    let notices = vec![Notice::form(
        initiator.id,
        format!(
            "Your submission for '{}' was approved automatically: {}.",
            form.title, reason
        ),
        form.id,
    )];
    Ok((IngestOutcome::AutoApproved { response_id }, notices))
}

struct PendingApproval {
    response_id: i64,
    step_number: u32,
    approver_id: Option<i64>,
    status: String,
    form_id: i64,
    form_title: String,
    initiator_id: i64,
    initiator_department: Option<i64>,
    initiator_college: Option<i64>,
}

/// Applies an approver's decision and advances or terminates the
/// workflow. The acting user must be the assigned approver and the
/// approval must still be pending.
pub fn decide(
    conn: &mut Connection,
    directory: &RoleDirectory,
    approval_id: i64,
    acting: &AuthUser,
    action: Decision,
    comment: Option<&str>,
) -> Result<(DecideOutcome, Vec<Notice>), ApiError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let row = tx
        .query_row(
            "SELECT a.response_id, a.step_number, a.approver_id, a.status,
                    r.form_id, f.title, r.user_id, u.department_id, u.college_id
             FROM approvals a
             JOIN form_responses r ON r.id = a.response_id
             JOIN forms f ON f.id = r.form_id
             JOIN users u ON u.id = r.user_id
             WHERE a.id = ?1",
            params![approval_id],
            |row| {
                Ok(PendingApproval {
                    response_id: row.get(0)?,
                    step_number: row.get(1)?,
                    approver_id: row.get(2)?,
                    status: row.get(3)?,
                    form_id: row.get(4)?,
                    form_title: row.get(5)?,
                    initiator_id: row.get(6)?,
                    initiator_department: row.get(7)?,
                    initiator_college: row.get(8)?,
                })
            },
        )
        .optional()?;
    let approval = row.ok_or_else(|| ApiError::NotFound("Approval not found".to_string()))?;

    if approval.approver_id != Some(acting.id) {
        return Err(ApiError::Forbidden(
            "You are not the approver assigned to this request.".to_string(),
        ));
    }
    if ApprovalStatus::parse(&approval.status) != Some(ApprovalStatus::Pending) {
        return Err(ApiError::Forbidden(
            "This approval has already been decided.".to_string(),
        ));
    }

    // Claim the row. A concurrent decision that won the race leaves zero
    // rows for this update even though the read above saw 'pending'.
    let claimed = tx.execute(
        "UPDATE approvals SET status = ?1, comment = ?2, updated_on = CURRENT_TIMESTAMP
         WHERE id = ?3 AND status = ?4",
        params![action.as_str(), comment, approval_id, ApprovalStatus::Pending.as_str()],
    )?;
    if claimed == 0 {
        return Err(ApiError::Forbidden(
            "This approval has already been decided.".to_string(),
        ));
    }

    let (outcome, notices) = match action {
        Decision::Rejected => {
            tx.execute(
                "UPDATE form_responses SET status = ?1, updated_on = CURRENT_TIMESTAMP
                 WHERE id = ?2",
                params![ResponseStatus::Rejected.as_str(), approval.response_id],
            )?;
            let notices = vec![Notice::submission(
                approval.initiator_id,
                format!(
                    "Your submission for '{}' was rejected at step {}.",
                    approval.form_title, approval.step_number
                ),
                approval.response_id,
            )];
            (
                DecideOutcome::Rejected {
                    response_id: approval.response_id,
                },
                notices,
            )
        }
        Decision::Approved => {
            let steps = flow::load_flow(&tx, approval.form_id)?.unwrap_or_default();
            match flow::step_after(&steps, approval.step_number) {
                None => {
                    tx.execute(
                        "UPDATE form_responses
                         SET status = ?1, updated_on = CURRENT_TIMESTAMP
                         WHERE id = ?2",
                        params![ResponseStatus::Approved.as_str(), approval.response_id],
                    )?;
                    let notices = vec![Notice::submission(
                        approval.initiator_id,
                        format!(
                            "Your submission for '{}' has received final approval.",
                            approval.form_title
                        ),
                        approval.response_id,
                    )];
                    (
                        DecideOutcome::FinalApproved {
                            response_id: approval.response_id,
                        },
                        notices,
                    )
                }
                Some(next) => {
                    let ctx = InitiatorContext {
                        department_id: approval.initiator_department,
                        college_id: approval.initiator_college,
                    };
                    // Fail-closed: an unresolved mid-flow approver aborts
                    // the whole decision and rolls the claim back.
                    let resolution = resolver::resolve_with_policy(
                        &tx,
                        directory,
                        &next.role_required,
                        &ctx,
                        UnresolvedPolicy::Fail,
                    )?;
                    let approver = match resolution {
                        Resolution::Approver(c) => c,
                        Resolution::Unresolved => unreachable!("Fail policy returns Err"),
                    };
                    let next_approval_id = create_approval(
                        &tx,
                        approval.response_id,
                        next.step,
                        &next.role_required,
                        approver.id,
                    )?;
                    let notices = vec![
                        Notice::submission(
                            approval.initiator_id,
                            format!(
                                "Your submission for '{}' was approved at step {} and moved to step {}.",
                                approval.form_title, approval.step_number, next.step
                            ),
                            approval.response_id,
                        ),
                        Notice::approval(
                            approver.id,
                            format!(
                                "A submission for '{}' is awaiting your approval.",
                                approval.form_title
                            ),
                            next_approval_id,
                        ),
                    ];
                    (
                        DecideOutcome::Advanced {
                            response_id: approval.response_id,
                            next_approval_id,
                            next_step: next.step,
                            approver_id: approver.id,
                        },
                        notices,
                    )
                }
            }
        }
    };

    check_open_approval_invariant(&tx, approval.response_id)?;
    tx.commit()?;
    Ok((outcome, notices))
}

fn create_approval(
    tx: &Connection,
    response_id: i64,
    step_number: u32,
    role_required: &str,
    approver_id: i64,
) -> Result<i64, ApiError> {
    tx.execute(
        "INSERT INTO approvals (response_id, step_number, role_required, approver_id, status)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            response_id,
            step_number,
            role_required,
            approver_id,
            ApprovalStatus::Pending.as_str()
        ],
    )?;
    Ok(tx.last_insert_rowid())
}

/// A pending response must own exactly one open approval. Logged as an
/// invariant violation rather than surfaced to the caller, since by the
/// time it fires the damage is already persisted state.
fn check_open_approval_invariant(tx: &Connection, response_id: i64) -> Result<(), ApiError> {
    let status: String = tx.query_row(
        "SELECT status FROM form_responses WHERE id = ?1",
        params![response_id],
        |row| row.get(0),
    )?;
    if ResponseStatus::parse(&status) != Some(ResponseStatus::Pending) {
        return Ok(());
    }
    let open: i64 = tx.query_row(
        "SELECT COUNT(*) FROM approvals WHERE response_id = ?1 AND status = ?2",
        params![response_id, ApprovalStatus::Pending.as_str()],
        |row| row.get(0),
    )?;
    if open != 1 {
        error!("invariant violation: pending response {response_id} has {open} open approvals");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::workflow::roles::RoleDirectory;
    use common::requests::AnswerInput;

    struct Fixture {
        conn: Connection,
        directory: RoleDirectory,
        form: FormInfo,
        student: AuthUser,
        hod_id: i64,
        dean_id: i64,
    }

    fn auth_user(
        conn: &Connection,
        email: &str,
        role: &str,
        college_id: Option<i64>,
        department_id: Option<i64>,
    ) -> AuthUser {
        conn.execute(
            "INSERT INTO users (first_name, last_name, email, password_hash, role_id,
                                college_id, department_id)
             VALUES ('Test', 'User', ?1, 'x',
                     (SELECT id FROM roles WHERE name = ?2), ?3, ?4)",
            params![email, role, college_id, department_id],
        )
        .expect("user");
        let id = conn.last_insert_rowid();
        AuthUser {
            id,
            first_name: "Test".into(),
            last_name: "User".into(),
            email: email.into(),
            role_id: 0,
            role_name: role.into(),
            college_id,
            department_id,
        }
    }

    /// One college, one department, a student initiator, an HOD and a
    /// college dean, plus a form with a question.
    fn fixture(flow_definition: Option<&str>) -> Fixture {
        let conn = db::open_test_db();
        conn.execute("INSERT INTO colleges (name) VALUES ('Engineering')", [])
            .expect("college");
        let college = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO departments (name, college_id) VALUES ('Computer Science', ?1)",
            params![college],
        )
        .expect("dept");
        let dept = conn.last_insert_rowid();

        let student = auth_user(&conn, "student@test", "student", Some(college), Some(dept));
        let hod = auth_user(&conn, "hod@test", "hod", Some(college), Some(dept));
        let dean = auth_user(&conn, "dean@test", "college dean", Some(college), None);

        conn.execute(
            "INSERT INTO forms (title, description) VALUES ('Clearance', 'Final clearance')",
            [],
        )
        .expect("form");
        let form_id = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO questions (form_id, question_text) VALUES (?1, 'Reason?')",
            params![form_id],
        )
        .expect("question");
        if let Some(def) = flow_definition {
            conn.execute(
                "INSERT INTO approval_flows (form_id, flow_definition) VALUES (?1, ?2)",
                params![form_id, def],
            )
            .expect("flow");
        }

        let directory = RoleDirectory::load(&conn).expect("directory");
        Fixture {
            conn,
            directory,
            form: FormInfo { id: form_id, title: "Clearance".into() },
            student,
            hod_id: hod.id,
            dean_id: dean.id,
        }
    }

    fn answers() -> Vec<AnswerInput> {
        vec![AnswerInput { question_id: 1, answer_text: "Graduating".into() }]
    }

    fn response_status(conn: &Connection, response_id: i64) -> String {
        conn.query_row(
            "SELECT status FROM form_responses WHERE id = ?1",
            params![response_id],
            |row| row.get(0),
        )
        .expect("status")
    }

    fn approvals_for(conn: &Connection, response_id: i64) -> Vec<(u32, String, String)> {
        let mut stmt = conn
            .prepare(
                "SELECT step_number, role_required, status FROM approvals
                 WHERE response_id = ?1 ORDER BY id",
            )
            .expect("prepare");
        stmt.query_map(params![response_id], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })
        .expect("query")
        .collect::<Result<_, _>>()
        .expect("rows")
    }

    const TWO_STEP_FLOW: &str =
        r#"[{"step":1,"role_required":"hod"},{"step":2,"role_required":"college dean"}]"#;

    #[test]
    fn ingest_routes_first_step_to_hod() {
        let mut f = fixture(Some(TWO_STEP_FLOW));
        let (outcome, notices) =
            ingest(&mut f.conn, &f.directory, &f.form, &f.student, &answers())
                .expect("ingest");
        let (response_id, approver_id) = match outcome {
            IngestOutcome::Routed { response_id, approver_id, .. } => (response_id, approver_id),
            _ => panic!("expected routed outcome"),
        };
        assert_eq!(approver_id, f.hod_id);
        assert_eq!(response_status(&f.conn, response_id), "pending");
        let approvals = approvals_for(&f.conn, response_id);
        assert_eq!(approvals.len(), 1);
        assert_eq!(approvals[0], (1, "hod".to_string(), "pending".to_string()));
        // Initiator and approver each get one notice.
        assert_eq!(notices.len(), 2);
    }

    #[test]
    fn ingest_without_flow_auto_approves() {
        let mut f = fixture(None);
        let (outcome, _) = ingest(&mut f.conn, &f.directory, &f.form, &f.student, &answers())
            .expect("ingest");
        let response_id = match outcome {
            IngestOutcome::AutoApproved { response_id } => response_id,
            _ => panic!("expected auto-approval"),
        };
        assert_eq!(response_status(&f.conn, response_id), "approved");
        assert!(approvals_for(&f.conn, response_id).is_empty());
    }

    #[test]
    fn ingest_with_malformed_flow_auto_approves() {
        let mut f = fixture(Some("not even json"));
        let (outcome, _) = ingest(&mut f.conn, &f.directory, &f.form, &f.student, &answers())
            .expect("ingest");
        assert!(matches!(outcome, IngestOutcome::AutoApproved { .. }));
    }

    #[test]
    fn ingest_with_no_approver_auto_approves() {
        // dean sps is seeded but nobody holds it.
        let mut f = fixture(Some(r#"[{"step":1,"role_required":"dean sps"}]"#));
        let (outcome, notices) =
            ingest(&mut f.conn, &f.directory, &f.form, &f.student, &answers())
                .expect("ingest");
        assert!(matches!(outcome, IngestOutcome::AutoApproved { .. }));
        assert!(notices[0].description.contains("no approver could be found"));
    }

    #[test]
    fn approving_first_step_advances_to_college_dean() {
        let mut f = fixture(Some(TWO_STEP_FLOW));
        let (outcome, _) = ingest(&mut f.conn, &f.directory, &f.form, &f.student, &answers())
            .expect("ingest");
        let (response_id, approval_id) = match outcome {
            IngestOutcome::Routed { response_id, approval_id, .. } => (response_id, approval_id),
            _ => panic!("expected routed outcome"),
        };

        let hod = auth_user_by_id(&f.conn, f.hod_id);
        let (decide_outcome, _) = decide(
            &mut f.conn,
            &f.directory,
            approval_id,
            &hod,
            Decision::Approved,
            Some("ok"),
        )
        .expect("decide");
        match decide_outcome {
            DecideOutcome::Advanced { next_step, approver_id, .. } => {
                assert_eq!(next_step, 2);
                assert_eq!(approver_id, f.dean_id);
            }
            _ => panic!("expected advancement"),
        }

        assert_eq!(response_status(&f.conn, response_id), "pending");
        let approvals = approvals_for(&f.conn, response_id);
        assert_eq!(approvals.len(), 2);
        assert_eq!(approvals[0].2, "approved");
        assert_eq!(approvals[1], (2, "college dean".to_string(), "pending".to_string()));
    }

    #[test]
    fn rejection_terminates_without_creating_next_step() {
        let mut f = fixture(Some(TWO_STEP_FLOW));
        let (outcome, _) = ingest(&mut f.conn, &f.directory, &f.form, &f.student, &answers())
            .expect("ingest");
        let (response_id, approval_id) = match outcome {
            IngestOutcome::Routed { response_id, approval_id, .. } => (response_id, approval_id),
            _ => panic!("expected routed outcome"),
        };

        let hod = auth_user_by_id(&f.conn, f.hod_id);
        let (decide_outcome, _) = decide(
            &mut f.conn,
            &f.directory,
            approval_id,
            &hod,
            Decision::Rejected,
            Some("incomplete"),
        )
        .expect("decide");
        assert!(matches!(decide_outcome, DecideOutcome::Rejected { .. }));
        assert_eq!(response_status(&f.conn, response_id), "rejected");
        assert_eq!(approvals_for(&f.conn, response_id).len(), 1);
    }

    #[test]
    fn approving_final_step_terminates() {
        let mut f = fixture(Some(r#"[{"step":1,"role_required":"hod"}]"#));
        let (outcome, _) = ingest(&mut f.conn, &f.directory, &f.form, &f.student, &answers())
            .expect("ingest");
        let (response_id, approval_id) = match outcome {
            IngestOutcome::Routed { response_id, approval_id, .. } => (response_id, approval_id),
            _ => panic!("expected routed outcome"),
        };

        let hod = auth_user_by_id(&f.conn, f.hod_id);
        let (decide_outcome, _) = decide(
            &mut f.conn,
            &f.directory,
            approval_id,
            &hod,
            Decision::Approved,
            None,
        )
        .expect("decide");
        assert!(matches!(decide_outcome, DecideOutcome::FinalApproved { .. }));
        assert_eq!(response_status(&f.conn, response_id), "approved");
        assert_eq!(approvals_for(&f.conn, response_id).len(), 1);
    }

    #[test]
    fn second_decision_on_same_approval_is_rejected() {
        let mut f = fixture(Some(TWO_STEP_FLOW));
        let (outcome, _) = ingest(&mut f.conn, &f.directory, &f.form, &f.student, &answers())
            .expect("ingest");
        let (response_id, approval_id) = match outcome {
            IngestOutcome::Routed { response_id, approval_id, .. } => (response_id, approval_id),
            _ => panic!("expected routed outcome"),
        };

        let hod = auth_user_by_id(&f.conn, f.hod_id);
        decide(&mut f.conn, &f.directory, approval_id, &hod, Decision::Approved, None)
            .expect("first decide");
        let err = decide(&mut f.conn, &f.directory, approval_id, &hod, Decision::Rejected, None)
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
        // No duplicate step-2 approval was created.
        assert_eq!(approvals_for(&f.conn, response_id).len(), 2);
    }

    #[test]
    fn only_the_assigned_approver_may_decide() {
        let mut f = fixture(Some(TWO_STEP_FLOW));
        let (outcome, _) = ingest(&mut f.conn, &f.directory, &f.form, &f.student, &answers())
            .expect("ingest");
        let approval_id = match outcome {
            IngestOutcome::Routed { approval_id, .. } => approval_id,
            _ => panic!("expected routed outcome"),
        };

        let dean = auth_user_by_id(&f.conn, f.dean_id);
        let err = decide(&mut f.conn, &f.directory, approval_id, &dean, Decision::Approved, None)
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn mid_flow_resolution_failure_rolls_back_the_decision() {
        // Step 2 names a seeded role nobody holds.
        let mut f = fixture(Some(
            r#"[{"step":1,"role_required":"hod"},{"step":2,"role_required":"dean sps"}]"#,
        ));
        let (outcome, _) = ingest(&mut f.conn, &f.directory, &f.form, &f.student, &answers())
            .expect("ingest");
        let (response_id, approval_id) = match outcome {
            IngestOutcome::Routed { response_id, approval_id, .. } => (response_id, approval_id),
            _ => panic!("expected routed outcome"),
        };

        let hod = auth_user_by_id(&f.conn, f.hod_id);
        let err = decide(&mut f.conn, &f.directory, approval_id, &hod, Decision::Approved, None)
            .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
        // The claim rolled back with the transaction.
        let approvals = approvals_for(&f.conn, response_id);
        assert_eq!(approvals.len(), 1);
        assert_eq!(approvals[0].2, "pending");
        assert_eq!(response_status(&f.conn, response_id), "pending");
    }

    #[test]
    fn unknown_role_mid_flow_is_a_config_error() {
        let mut f = fixture(Some(
            r#"[{"step":1,"role_required":"hod"},{"step":2,"role_required":"registrar"}]"#,
        ));
        let (outcome, _) = ingest(&mut f.conn, &f.directory, &f.form, &f.student, &answers())
            .expect("ingest");
        let approval_id = match outcome {
            IngestOutcome::Routed { approval_id, .. } => approval_id,
            _ => panic!("expected routed outcome"),
        };
        let hod = auth_user_by_id(&f.conn, f.hod_id);
        let err = decide(&mut f.conn, &f.directory, approval_id, &hod, Decision::Approved, None)
            .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn step_numbers_increase_across_the_chain() {
        let mut f = fixture(Some(TWO_STEP_FLOW));
        let (outcome, _) = ingest(&mut f.conn, &f.directory, &f.form, &f.student, &answers())
            .expect("ingest");
        let (response_id, approval_id) = match outcome {
            IngestOutcome::Routed { response_id, approval_id, .. } => (response_id, approval_id),
            _ => panic!("expected routed outcome"),
        };
        let hod = auth_user_by_id(&f.conn, f.hod_id);
        decide(&mut f.conn, &f.directory, approval_id, &hod, Decision::Approved, None)
            .expect("decide");
        let steps: Vec<u32> = approvals_for(&f.conn, response_id)
            .iter()
            .map(|(s, _, _)| *s)
            .collect();
        assert_eq!(steps, vec![1, 2]);
    }

    fn auth_user_by_id(conn: &Connection, id: i64) -> AuthUser {
        conn.query_row(
            "SELECT u.id, u.first_name, u.last_name, u.email, u.role_id, r.name,
                    u.college_id, u.department_id
             FROM users u JOIN roles r ON r.id = u.role_id WHERE u.id = ?1",
            params![id],
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
        .expect("user")
    }
}
