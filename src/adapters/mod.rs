//! Driven adapters for the port traits in [`crate::app::ports`].

pub mod log_sink;
pub mod memory;
