//! Web server module
//!
//! JSON chat API over the conversation step.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
