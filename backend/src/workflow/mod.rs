//! The approval-routing core: role directory, flow store, approver
//! resolver and the per-submission state machine. Everything here talks
//! to the database directly and is independent of the HTTP layer.

pub mod engine;
pub mod flow;
pub mod resolver;
pub mod roles;
