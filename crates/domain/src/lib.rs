//! Domain layer for Smart Transit
//!
//! Contains the transit directory records, coordinates, tracking session state
//! and domain errors. This layer performs no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
