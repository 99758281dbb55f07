//! # Gradebook application library
//!
//! Exposes the HTTP API and CLI modules so integration tests can exercise
//! the router without starting a real server.

pub mod api;
pub mod cli;
