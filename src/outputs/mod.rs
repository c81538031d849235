//! Feed output.
//!
//! # Submodules
//!
//! - [`rss`]: sorts accepted articles and serializes them as RSS 2.0
//! - [`sink`]: persists a finished feed document under its feed name

pub mod rss;
pub mod sink;
