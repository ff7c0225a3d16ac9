//! HTTP API: error taxonomy, shared context, router, server lifecycle.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;
