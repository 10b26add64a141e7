// enrich/mod.rs
// Geolocation enrichment module

mod client;
mod types;

pub use client::GeoClient;
pub use types::{GeoInfo, Location, NamedEntity, Names, Traits};
