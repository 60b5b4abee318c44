//! Search sources
//!
//! Each backend implements [`Source`] (request building and response
//! parsing); [`FetchingStrategy`] pairs it with the Fetcher to provide the
//! uniform [`Strategy::attempt`] contract.

mod loader;
mod traits;

pub mod duckduckgo;
pub mod google_news;

pub use loader::SourceLoader;
pub use traits::*;
