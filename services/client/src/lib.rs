//! services/client/src/lib.rs
//!
//! The myFlix client: an HTTP adapter for the movie API, session storage, and
//! the views that drive them.

pub mod adapters;
pub mod config;
pub mod error;
pub mod views;
