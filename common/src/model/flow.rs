use serde::{Deserialize, Serialize};

/// One entry of a form's approval chain. The `step` numbers define the
/// routing order; step `n` is followed by step `n + 1`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowStep {
    pub step: u32,
    pub role_required: String,
}
