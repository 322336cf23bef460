// stores

mod attempt_store;
mod token_holder;

pub use attempt_store::*;
pub use token_holder::*;

// upstream

mod search_gateway;
mod token_client;

pub use search_gateway::*;
pub use token_client::*;

// tracking

mod delta_tracker;

pub use delta_tracker::*;
