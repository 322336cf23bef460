mod credential;
mod item;
mod pkce;
mod session;

pub use credential::*;
pub use item::*;
pub use pkce::*;
pub use session::*;
