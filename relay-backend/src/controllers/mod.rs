pub mod audit_logs;
pub mod health;
pub mod members;
pub mod messages;
pub mod roles;
pub mod servers;
