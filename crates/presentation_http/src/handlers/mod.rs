//! HTTP request handlers

pub mod buses;
mod common;
pub mod health;
pub mod home;
pub mod nearby;
pub mod staff;

pub use common::{CoordinateView, RecordView};
