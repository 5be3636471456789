//! Export du ring converti (KML)

pub mod kml;

pub use kml::{serialize, KmlStyle, DEFAULT_FILENAME};
