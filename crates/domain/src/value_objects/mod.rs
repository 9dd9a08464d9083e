//! Value Objects - Immutable, identity-less domain primitives

mod address_fragments;
mod coordinate;
mod transit_id;

pub use address_fragments::{AddressFragments, normalize_token};
pub use coordinate::{Coordinate, EARTH_RADIUS_KM, InvalidCoordinates, haversine_km};
pub use transit_id::TransitId;
