//! Application layer - Use cases and orchestration
//!
//! Contains the proximity matcher, the live tracking loop, the rider and
//! staff use-case services, and the port definitions they depend on.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
