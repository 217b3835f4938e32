//! Fire-and-forget notification sink.
//!
//! The workflow engine queues `Notice`s while a transaction is open and
//! the caller dispatches them after the commit, so a delivery failure can
//! never roll back a workflow transition.

use log::warn;
use rusqlite::{params, Connection};

use common::model::notification::NotificationKind;

#[derive(Debug)]
pub struct Notice {
    pub user_id: i64,
    pub kind: NotificationKind,
    pub description: String,
    pub related_id: Option<i64>,
}

impl Notice {
    pub fn approval(user_id: i64, description: String, approval_id: i64) -> Notice {
        Notice {
            user_id,
            kind: NotificationKind::Approval,
            description,
            related_id: Some(approval_id),
        }
    }

    pub fn submission(user_id: i64, description: String, response_id: i64) -> Notice {
        Notice {
            user_id,
            kind: NotificationKind::Submission,
            description,
            related_id: Some(response_id),
        }
    }

    pub fn form(user_id: i64, description: String, form_id: i64) -> Notice {
        Notice {
            user_id,
            kind: NotificationKind::Form,
            description,
            related_id: Some(form_id),
        }
    }
}

/// Inserts each notice, logging failures instead of propagating them.
pub fn dispatch(conn: &Connection, notices: &[Notice]) {
    for notice in notices {
        let result = conn.execute(
            "INSERT INTO notifications (user_id, title, description, kind, related_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                notice.user_id,
                notice.kind.default_title(),
                notice.description,
                notice.kind.as_str(),
                notice.related_id,
            ],
        );
        if let Err(e) = result {
            warn!(
                "failed to deliver {} notification to user {}: {}",
                notice.kind.as_str(),
                notice.user_id,
                e
            );
        }
    }
}
