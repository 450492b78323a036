// Copyright (c) 2026 Pagelift Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session and page API
//!
//! A session owns one HTTP client, one route table, and exactly one page.
//! Dropping the session releases everything, whichever path got there.

mod config;
mod page;
#[allow(clippy::module_inception)]
mod session;

pub use config::{ProxyConfig, SessionConfig, Settle};
pub use page::Page;
pub use session::Session;
