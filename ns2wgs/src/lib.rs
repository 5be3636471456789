//! # ns2wgs
//!
//! Conversion de levés UTM Nord Sahara 1959 vers WGS84, surface et export KML.
//!
//! ## Features
//!
//! - Lecture de levés texte (`x,y` par ligne)
//! - Configuration JSON + variables `NS2WGS_*` + options CLI
//! - Intersection avec des limites GeoJSON (communes, wilayas)
//! - Rapport console et JSON
//!
//! ## Usage CLI
//!
//! ```bash
//! # Conversion (commande par défaut)
//! ns2wgs --input leve.csv --zone 31
//! ns2wgs convert --input leve.csv --zone 32 --boundaries communes.geojson --report rapport.json
//!
//! # Surface seule, sans conversion
//! ns2wgs area --input leve.csv --unit m2
//! ```

pub mod boundaries;
pub mod cli;
pub mod config;
pub mod ingest;
pub mod report;

pub use boundaries::GeoJsonBoundaries;
pub use config::Config;
pub use report::{ConversionReport, IntersectionStatus};
