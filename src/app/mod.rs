//! Application core: ports, the compliance service, and outbound events.

pub mod events;
pub mod ports;
pub mod service;
