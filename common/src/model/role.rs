use serde::{Deserialize, Serialize};

/// Organizational scope class of a role. Decides how the approver
/// resolver narrows its candidate search for a required role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleScope {
    /// Holder must sit in the initiator's department (e.g. "hod",
    /// "departmental pg coordinator"). Widens to the college when the
    /// department has no holder.
    Department,
    /// Holder must sit in the initiator's college (e.g. "college dean").
    College,
    /// No organizational constraint (e.g. "dean sps", "admin").
    Global,
}

impl RoleScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleScope::Department => "department",
            RoleScope::College => "college",
            RoleScope::Global => "global",
        }
    }

    pub fn parse(s: &str) -> Option<RoleScope> {
        match s {
            "department" => Some(RoleScope::Department),
            "college" => Some(RoleScope::College),
            "global" => Some(RoleScope::Global),
            _ => None,
        }
    }
}
