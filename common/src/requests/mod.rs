use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::status::Decision;

#[derive(Serialize, Deserialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub college_id: Option<i64>,
    pub department_id: Option<i64>,
}

#[derive(Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct CreateFormRequest {
    pub title: String,
    pub description: String,
    /// Role name expected to start this form's workflow. `None` allows
    /// any authenticated user to submit.
    pub initiator: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct UpdateFormRequest {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub initiator: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct DeleteFormRequest {
    pub form_id: i64,
}

#[derive(Serialize, Deserialize)]
pub struct AnswerInput {
    pub question_id: i64,
    pub answer_text: String,
}

/// Payload for `POST /api/forms/{form_id}/submit`.
#[derive(Serialize, Deserialize)]
pub struct SubmitResponseRequest {
    pub answers: Vec<AnswerInput>,
}

/// Payload for `POST /api/approval/{approval_id}/action`.
#[derive(Serialize, Deserialize)]
pub struct ApprovalActionRequest {
    pub action: Decision,
    pub comment: Option<String>,
}

/// Payload for creating or replacing a form's approval flow. The
/// definition is carried as raw JSON and validated server-side.
#[derive(Serialize, Deserialize)]
pub struct SaveFlowRequest {
    pub form_id: i64,
    pub flow_definition: Value,
}

#[derive(Serialize, Deserialize)]
pub struct CreateQuestionRequest {
    pub form_id: i64,
    pub question_text: String,
}

#[derive(Serialize, Deserialize)]
pub struct DeleteQuestionRequest {
    pub question_id: i64,
}

#[derive(Serialize, Deserialize)]
pub struct MarkReadRequest {
    pub notification_id: i64,
}

#[derive(Serialize, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    pub scope: crate::model::role::RoleScope,
}

#[derive(Serialize, Deserialize)]
pub struct DeleteRoleRequest {
    pub role_id: i64,
}

#[derive(Serialize, Deserialize)]
pub struct CreateCollegeRequest {
    pub name: String,
}

#[derive(Serialize, Deserialize)]
pub struct CreateDepartmentRequest {
    pub name: String,
    pub college_id: i64,
}

#[derive(Serialize, Deserialize)]
pub struct UpdateUserOrgRequest {
    pub user_id: i64,
    pub role: Option<String>,
    pub college_id: Option<i64>,
    pub department_id: Option<i64>,
}

#[derive(Serialize, Deserialize)]
pub struct DeleteUserRequest {
    pub user_id: i64,
}
