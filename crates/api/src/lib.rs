//! Instrument catalog API server library.
//!
//! Exposes the building blocks (config, state, error handling, extractors,
//! representations, routes) so integration tests, the server binary and the
//! admin seed command can all use them.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod representation;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod storage;
