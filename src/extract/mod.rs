//! Extractor
//!
//! Turns raw search text into a short, denoised, length-bounded summary.
//! Everything here is pure: no I/O, no shared state.

mod condense;
mod sentences;

pub use condense::{condense, Extractor};
pub use sentences::{
    char_len, is_noise, looks_like_url, normalize_whitespace, split_sentences, strip_urls,
    truncate_chars,
};
