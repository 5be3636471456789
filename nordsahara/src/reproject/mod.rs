//! Reprojection Nord Sahara → WGS84 en Rust pur
//!
//! Chaîne de conversion d'un point :
//! 1. UTM inverse sur l'ellipsoïde source
//! 2. Helmert 7 paramètres vers WGS84
//! 3. UTM direct sur WGS84, dans la même zone que la source
//!
//! La zone cible n'est jamais recalculée depuis la longitude : les résultats
//! restent comparables à la grille du levé d'origine.

pub mod helmert;
#[cfg(feature = "proj")]
pub mod proj;
mod smart;
pub mod utm;

pub use smart::SmartReprojector;

use geo::Coord;
use tracing::trace;

use crate::registry::{Ellipsoid, Hemisphere, Registry, UtmZone};
use crate::types::{CoordinateRecord, Derived, LatLon, PlanarPoint};
use crate::GeodesyError;

/// Point en coordonnées géographiques (radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geographic {
    /// Longitude en radians
    pub lon: f64,
    /// Latitude en radians
    pub lat: f64,
}

impl Geographic {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Convertit en degrés (lon, lat)
    pub fn to_degrees(self) -> (f64, f64) {
        (self.lon.to_degrees(), self.lat.to_degrees())
    }

    /// Crée depuis des degrés
    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> Self {
        Self {
            lon: lon_deg.to_radians(),
            lat: lat_deg.to_radians(),
        }
    }

    pub fn to_lat_lon(self) -> LatLon {
        let (lon, lat) = self.to_degrees();
        LatLon { lat, lon }
    }
}

/// Moteur de reprojection natif, adossé à un registre immuable
#[derive(Debug, Clone, Default)]
pub struct Reprojector {
    registry: Registry,
}

impl Reprojector {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// UTM source → géographique WGS84 (étapes 1 et 2)
    pub fn to_geographic(
        &self,
        point: PlanarPoint,
        source_system: &str,
        utm_zone: u32,
    ) -> Result<Geographic, GeodesyError> {
        let params = self.registry.lookup(source_system, utm_zone)?;

        let local = utm::utm_to_geographic(
            point.x,
            point.y,
            params.zone,
            params.hemisphere,
            &params.ellipsoid,
        )?;
        let wgs84 = helmert::shift_to_wgs84(local, &params.ellipsoid, &params.to_wgs84);
        utm::check_latitude(wgs84.lat)?;

        Ok(wgs84)
    }

    /// Géographique WGS84 → UTM WGS84 dans la zone donnée (étape 3)
    pub fn to_utm(
        &self,
        geo: Geographic,
        utm_zone: u32,
        hemisphere: Hemisphere,
    ) -> Result<PlanarPoint, GeodesyError> {
        let zone = UtmZone::new(utm_zone)?;
        let (x, y) = utm::geographic_to_utm(geo, zone, hemisphere, &Ellipsoid::WGS84)?;
        Ok(Coord { x, y })
    }

    /// Conversion complète d'un point levé
    pub fn convert(
        &self,
        point: PlanarPoint,
        source_system: &str,
        utm_zone: u32,
    ) -> Result<CoordinateRecord, GeodesyError> {
        let hemisphere = self.registry.definition(source_system)?.hemisphere;
        let geo = self.to_geographic(point, source_system, utm_zone)?;
        let utm_wgs84 = self.to_utm(geo, utm_zone, hemisphere)?;

        trace!(
            x = point.x,
            y = point.y,
            system = source_system,
            zone = utm_zone,
            "Point converted"
        );

        Ok(CoordinateRecord::converted(
            point,
            Derived {
                geographic: geo.to_lat_lon(),
                utm_wgs84,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{DatumDefinition, HelmertParams};

    fn ground_distance(a: LatLon, b: LatLon) -> f64 {
        // Approximation équirectangulaire, suffisante sur quelques centaines de mètres
        let mean_lat = ((a.lat + b.lat) / 2.0).to_radians();
        let dy = (a.lat - b.lat).to_radians() * 6_371_000.0;
        let dx = (a.lon - b.lon).to_radians() * 6_371_000.0 * mean_lat.cos();
        (dx * dx + dy * dy).sqrt()
    }

    #[test]
    fn test_convert_populates_all_fields() {
        let reproj = Reprojector::default();
        let raw = Coord {
            x: 500000.0,
            y: 3500000.0,
        };
        let record = reproj.convert(raw, "NordSahara", 31).unwrap();

        assert_eq!(record.raw(), raw);
        let derived = record.derived().unwrap();
        assert!((derived.geographic.lat - 31.638).abs() < 0.01, "{:?}", derived);
        assert!((derived.geographic.lon - 2.999).abs() < 0.01, "{:?}", derived);
        // Décalage de quelques centaines de mètres sur la grille WGS84
        assert!((derived.utm_wgs84.x - 499_931.5).abs() < 1.0, "{:?}", derived);
        assert!((derived.utm_wgs84.y - 3_500_305.4).abs() < 1.0, "{:?}", derived);
    }

    #[test]
    fn test_datum_shift_is_applied() {
        let reproj = Reprojector::default();
        for raw in [
            Coord { x: 500000.0, y: 3500000.0 },
            Coord { x: 720000.0, y: 3200000.0 },
            Coord { x: 280000.0, y: 4000000.0 },
        ] {
            let ns = reproj.convert(raw, "NordSahara", 31).unwrap();
            let wgs = reproj.convert(raw, "WGS84", 31).unwrap();
            let d = ground_distance(ns.geographic().unwrap(), wgs.geographic().unwrap());
            assert!(d > 10.0, "shift only {} m at {:?}", d, raw);
        }
    }

    #[test]
    fn test_identity_roundtrip() {
        let reproj = Reprojector::default();
        for (lon, lat) in [(3.4, 31.2), (-0.6, 35.7), (5.9, 27.0), (1.0, 0.2)] {
            let geo = Geographic::from_degrees(lon, lat);
            let utm = reproj.to_utm(geo, 31, Hemisphere::North).unwrap();
            let record = reproj.convert(utm, "WGS84", 31).unwrap();
            let back = record.geographic().unwrap();

            assert!((back.lat - lat).abs() < 1e-6, "lat {} vs {}", back.lat, lat);
            assert!((back.lon - lon).abs() < 1e-6, "lon {} vs {}", back.lon, lon);
            // Séries de Snyder : résidu millimétrique à ±4° du méridien central
            let utm2 = record.utm_wgs84().unwrap();
            assert!((utm2.x - utm.x).abs() < 1e-2, "dx={}", utm2.x - utm.x);
            assert!((utm2.y - utm.y).abs() < 1e-2, "dy={}", utm2.y - utm.y);
        }
    }

    #[test]
    fn test_same_zone_is_kept() {
        // Longitude ~ -0.3°, zone naturelle 30, mais on force la zone 31
        let reproj = Reprojector::default();
        let geo = Geographic::from_degrees(-0.3, 33.0);
        let utm31 = reproj.to_utm(geo, 31, Hemisphere::North).unwrap();
        let record = reproj.convert(utm31, "WGS84", 31).unwrap();
        assert!(record.utm_wgs84().unwrap().x < 300_000.0);
    }

    #[test]
    fn test_errors() {
        let reproj = Reprojector::default();
        let p = Coord { x: 500000.0, y: 3500000.0 };

        assert_eq!(
            reproj.convert(p, "Voirol", 31),
            Err(GeodesyError::UnknownSystem("Voirol".to_string()))
        );
        assert_eq!(
            reproj.convert(p, "NordSahara", 0),
            Err(GeodesyError::InvalidZone(0))
        );
        assert_eq!(
            reproj.convert(p, "NordSahara", 61),
            Err(GeodesyError::InvalidZone(61))
        );
        assert!(matches!(
            reproj.convert(Coord { x: 500000.0, y: 9_600_000.0 }, "NordSahara", 31),
            Err(GeodesyError::ProjectionDomain { .. })
        ));
    }

    #[test]
    fn test_latitude_checked_after_datum_shift() {
        // Translation de 200 km vers le nord : 83.95° local dépasse 84° en WGS84
        let registry = Registry::builtin().with_system(DatumDefinition {
            name: "Decale".to_string(),
            ellipsoid: Ellipsoid::WGS84,
            to_wgs84: HelmertParams::from_towgs84([0.0, 0.0, 200_000.0, 0.0, 0.0, 0.0, 0.0]),
            hemisphere: Hemisphere::North,
        });
        let reproj = Reprojector::new(registry);
        let local = reproj
            .to_utm(Geographic::from_degrees(3.0, 83.95), 31, Hemisphere::North)
            .unwrap();

        assert!(reproj.convert(local, "WGS84", 31).is_ok());
        assert!(matches!(
            reproj.convert(local, "Decale", 31),
            Err(GeodesyError::ProjectionDomain { .. })
        ));
    }

    #[test]
    fn test_south_hemisphere_convert() {
        // Saint-Denis de La Réunion, zone 40S
        let registry = Registry::builtin().with_system(DatumDefinition {
            hemisphere: Hemisphere::South,
            ..Registry::builtin().definition("WGS84").unwrap().clone()
        });
        let reproj = Reprojector::new(registry);
        let utm = reproj
            .to_utm(Geographic::from_degrees(55.45, -20.88), 40, Hemisphere::South)
            .unwrap();
        assert!(utm.y > 7_000_000.0, "y={}", utm.y);

        let record = reproj.convert(utm, "WGS84", 40).unwrap();
        let geo = record.geographic().unwrap();
        assert!((geo.lat - (-20.88)).abs() < 1e-6, "lat={}", geo.lat);
        assert!((geo.lon - 55.45).abs() < 1e-6, "lon={}", geo.lon);

        let utm2 = record.utm_wgs84().unwrap();
        assert!((utm2.x - utm.x).abs() < 1e-2);
        assert!((utm2.y - utm.y).abs() < 1e-2);
    }
}
