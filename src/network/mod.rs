//! HTTP networking module
//!
//! Provides the Fetcher used by every search source.

mod client;
mod user_agent;

pub use client::{FetchRequest, HttpClient, HttpMethod};
pub use user_agent::{accept_feed, accept_html, accept_json, generate_user_agent};
