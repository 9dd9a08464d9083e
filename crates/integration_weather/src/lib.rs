//! WeatherAPI.com weather integration
//!
//! Client for the WeatherAPI.com current-conditions endpoint
//! (<https://www.weatherapi.com/docs/>). Requires an API key.

pub mod client;
mod models;

pub use client::{WeatherApiClient, WeatherClient, WeatherConfig, WeatherError};
pub use models::{CurrentConditions, WeatherLocation};
