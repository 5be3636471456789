//! Reprojection via PROJ
//!
//! Ce module est disponible uniquement avec la feature `proj`. Il pilote PROJ
//! avec la définition `+proj=utm ... +towgs84=...` équivalente au registre.

use geo::Coord;
use proj::Proj;

use super::utm::check_latitude;
use crate::registry::{Hemisphere, Registry};
use crate::types::{CoordinateRecord, Derived, LatLon, PlanarPoint};
use crate::GeodesyError;

/// Reprojection de points via la bibliothèque PROJ
///
/// Un contexte PROJ est créé par appel : `Proj` n'est pas partageable entre threads.
#[derive(Debug, Clone, Default)]
pub struct ProjReprojector {
    registry: Registry,
}

fn backend_error(e: impl std::fmt::Display) -> GeodesyError {
    GeodesyError::Backend(format!("PROJ: {}", e))
}

impl ProjReprojector {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Conversion complète d'un point levé
    pub fn convert(
        &self,
        point: PlanarPoint,
        source_system: &str,
        utm_zone: u32,
    ) -> Result<CoordinateRecord, GeodesyError> {
        let params = self.registry.lookup(source_system, utm_zone)?;

        let to_geographic = Proj::new_known_crs(&params.proj_definition(), "EPSG:4326", None)
            .map_err(backend_error)?;
        let (lon, lat) = to_geographic
            .convert((point.x, point.y))
            .map_err(backend_error)?;
        check_latitude(lat.to_radians())?;

        let south = match params.hemisphere {
            Hemisphere::North => "",
            Hemisphere::South => " +south",
        };
        let target = format!(
            "+proj=utm +zone={}{} +datum=WGS84 +units=m +no_defs +type=crs",
            params.zone, south
        );
        let to_utm = Proj::new_known_crs("EPSG:4326", &target, None).map_err(backend_error)?;
        let (x, y) = to_utm.convert((lon, lat)).map_err(backend_error)?;

        Ok(CoordinateRecord::converted(
            point,
            Derived {
                geographic: LatLon::new(lat, lon),
                utm_wgs84: Coord { x, y },
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reproject::Reprojector;

    #[test]
    fn test_matches_native_engine() {
        let native = Reprojector::default();
        let proj = ProjReprojector::default();
        let raw = Coord {
            x: 612345.0,
            y: 3654321.0,
        };

        let a = native.convert(raw, "NordSahara", 31).unwrap();
        let b = proj.convert(raw, "NordSahara", 31).unwrap();

        let (ua, ub) = (a.utm_wgs84().unwrap(), b.utm_wgs84().unwrap());
        assert!((ua.x - ub.x).abs() < 0.05, "x {} vs {}", ua.x, ub.x);
        assert!((ua.y - ub.y).abs() < 0.05, "y {} vs {}", ua.y, ub.y);
    }

    #[test]
    fn test_unknown_system() {
        let proj = ProjReprojector::default();
        let raw = Coord { x: 0.0, y: 0.0 };
        assert!(matches!(
            proj.convert(raw, "Unknown", 31),
            Err(GeodesyError::UnknownSystem(_))
        ));
    }
}
