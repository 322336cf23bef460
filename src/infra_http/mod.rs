mod search_gateway_meli;
mod token_client_http;

pub use search_gateway_meli::*;
pub use token_client_http::*;
