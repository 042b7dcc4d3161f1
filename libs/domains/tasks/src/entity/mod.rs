//! Sea-ORM entities for the task tables.

pub mod assignee;
pub mod audit_log;
pub mod comment;
pub mod task;
