mod auth_flow_service_impl;
mod poll_service_impl;
mod search_gateway_fake;

pub use auth_flow_service_impl::*;
pub use poll_service_impl::*;
pub use search_gateway_fake::*;
