//! YouTube Data API v3 adapters: paginated comment collection and video
//! title lookup.
//!
//! [`client::YouTubeClient`] owns the HTTP plumbing; the comment and
//! metadata adapters on top of it own the collection policies — page cap,
//! identity verification, all-or-nothing error handling, and placeholder
//! titles.

pub mod client;
pub mod error;
pub mod types;

mod comments;
mod metadata;
mod retry;

pub use client::YouTubeClient;
pub use comments::MAX_COMMENT_PAGES;
pub use error::YouTubeError;
