//! Core module - Configuration, shared state, events, and shutdown

pub mod config;
pub mod events;
pub mod shutdown;
pub mod state;
