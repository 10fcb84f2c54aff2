//! HTTP surface of the relay.
//!
//! - [`routes`]: shared state, router construction and route handlers

pub mod routes;
