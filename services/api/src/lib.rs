//! Herald API Library Crate
//!
//! Configuration, application state, handlers and routing for the Herald web
//! service. The `api` binary is a thin wrapper around this library.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
