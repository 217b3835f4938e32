pub mod admin;
pub mod approvals;
pub mod auth;
pub mod forms;
pub mod notifications;
pub mod questions;
pub mod responses;
