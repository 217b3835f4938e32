pub mod flow;
pub mod notification;
pub mod role;
pub mod status;
