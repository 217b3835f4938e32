use serde::{Deserialize, Serialize};

/// Terminal-or-not state of a whole submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Pending,
    Approved,
    Rejected,
}

/// Outcome of a single approval step. `Pending` means the assigned
/// approver has not acted yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// The two decisions an approver may take on a pending approval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Rejected,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Pending => "pending",
            ResponseStatus::Approved => "approved",
            ResponseStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<ResponseStatus> {
        match s {
            "pending" => Some(ResponseStatus::Pending),
            "approved" => Some(ResponseStatus::Approved),
            "rejected" => Some(ResponseStatus::Rejected),
            _ => None,
        }
    }
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<ApprovalStatus> {
        match s {
            "pending" => Some(ApprovalStatus::Pending),
            "approved" => Some(ApprovalStatus::Approved),
            "rejected" => Some(ApprovalStatus::Rejected),
            _ => None,
        }
    }
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approved => "approved",
            Decision::Rejected => "rejected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_status_strings_parse_back() {
        for status in [
            ResponseStatus::Pending,
            ResponseStatus::Approved,
            ResponseStatus::Rejected,
        ] {
            assert_eq!(ResponseStatus::parse(status.as_str()), Some(status));
        }
        for status in [
            ApprovalStatus::Pending,
            ApprovalStatus::Approved,
            ApprovalStatus::Rejected,
        ] {
            assert_eq!(ApprovalStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ResponseStatus::parse("archived"), None);
        assert_eq!(ApprovalStatus::parse(""), None);
    }
}
