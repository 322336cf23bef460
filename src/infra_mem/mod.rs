mod attempt_store_mem;
mod delta_tracker_mem;
mod token_holder_mem;

pub use attempt_store_mem::*;
pub use delta_tracker_mem::*;
pub use token_holder_mem::*;
