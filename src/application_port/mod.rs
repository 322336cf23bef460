mod auth_flow_service;
mod poll_service;

pub use auth_flow_service::*;
pub use poll_service::*;
