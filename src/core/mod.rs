//! Core application primitives (HTTP surface, startup wiring)

pub mod bootstrap;
pub mod http;

pub use bootstrap::*;
pub use http::*;
