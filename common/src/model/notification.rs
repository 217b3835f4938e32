use serde::{Deserialize, Serialize};

/// Category of a notification row, used by clients to pick an icon and
/// by the backend to fill a default title.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Approval,
    Submission,
    Form,
    System,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Approval => "approval",
            NotificationKind::Submission => "submission",
            NotificationKind::Form => "form",
            NotificationKind::System => "system",
        }
    }

    /// Title used when the caller does not supply one.
    pub fn default_title(&self) -> &'static str {
        match self {
            NotificationKind::Approval => "Action Required: New Approval Request",
            NotificationKind::Submission => "New Submission Received",
            NotificationKind::Form => "Form Update",
            NotificationKind::System => "System Notification",
        }
    }
}
