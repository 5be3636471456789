//! # nordsahara
//!
//! Conversion de levés UTM Nord Sahara 1959 vers WGS84 (géographique et UTM).
//!
//! ## Features
//!
//! - Registre immuable des systèmes (Nord Sahara, WGS84), zone UTM choisie à la conversion
//! - UTM inverse/direct et Helmert 7 paramètres en Rust pur
//! - Aire plane (formule du lacet) et fermeture de ring
//! - Intersection avec des limites de référence (`geo::BooleanOps`)
//! - Export KML du ring converti
//! - Moteur PROJ optionnel (feature `proj`) pour contre-vérification
//!
//! ## Usage
//!
//! ```rust,ignore
//! use geo::Coord;
//! use nordsahara::{convert, geometry, Survey, SmartReprojector};
//!
//! let record = convert(Coord { x: 612345.0, y: 3654321.0 }, "NordSahara", 31)?;
//! println!("{:?}", record.geographic());
//!
//! let mut survey = Survey::from_raw(points);
//! survey.convert_all(&SmartReprojector::default(), "NordSahara", 31)?;
//! let hectares = geometry::area(&survey.raw_ring()) / 10_000.0;
//! let lon_lat = survey.geographic_ring().expect("levé converti");
//! ```

pub mod error;
pub mod export;
pub mod geometry;
pub mod intersect;
pub mod registry;
pub mod reproject;
pub mod survey;
pub mod types;

pub use error::GeodesyError;
pub use geometry::{close, signed_area, AreaUnit, Ring};
pub use intersect::{intersect, BoundaryFeature, BoundarySource, IntersectionResult, MatchPolicy};
pub use registry::{GeodeticParameters, Hemisphere, Registry, UtmZone};
pub use reproject::{Reprojector, SmartReprojector};
pub use survey::Survey;
pub use types::{Axis, CoordinateRecord, LatLon, PlanarPoint};

/// Convertit un point avec le registre prédéfini et le moteur natif
///
/// # Errors
///
/// `UnknownSystem`, `InvalidZone` ou `ProjectionDomain`.
pub fn convert(
    point: PlanarPoint,
    source_system: &str,
    utm_zone: u32,
) -> Result<CoordinateRecord, GeodesyError> {
    Reprojector::default().convert(point, source_system, utm_zone)
}
