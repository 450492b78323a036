// Copyright (c) 2026 Pagelift Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request interception and monitoring
//!
//! Every request a page issues goes through the session's `RouteTable`.
//! A matching rule can abort the request before any network activity or
//! fetch the real response and rewrite its body. All outcomes are recorded
//! in the session's `NetworkLog`.

mod log;
mod route;

pub use log::{Disposition, NetworkLog, RequestEntry, ResourceKind};
pub use route::{BodyRewriter, ReplaceRewriter, RouteRule, RouteTable};
