// Analytics API module.
// Client, typed endpoint accessors, response cache, retry policy, and the
// notice/loading surfaces the UI consumes.

pub mod cache;
pub mod client;
pub mod endpoints;
pub mod notify;
pub mod retry;
pub mod types;

pub use client::ApiClient;
pub use notify::{LoadingFlag, Notice, NoticeLevel};
pub use types::*;
