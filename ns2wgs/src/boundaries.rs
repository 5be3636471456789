//! Limites de référence chargées depuis un FeatureCollection GeoJSON
//!
//! Coordonnées attendues en lon/lat (WGS84). Chaque extérieur de polygone
//! devient une limite ; un MultiPolygon en donne plusieurs sous le même nom.

use std::path::Path;

use geojson::{Feature, FeatureCollection, GeoJson};
use nordsahara::{BoundaryFeature, BoundarySource, GeodesyError, Ring};
use tracing::{debug, warn};

/// Propriétés consultées, dans l'ordre, pour nommer une limite
const NAME_PROPERTIES: &[&str] = &["name", "NAME", "nom"];

/// Source de limites GeoJSON
///
/// Un échec de chargement est conservé et restitué à chaque interrogation
/// sous forme de `BoundaryDataUnavailable`.
#[derive(Debug, Clone)]
pub struct GeoJsonBoundaries {
    loaded: Result<Vec<BoundaryFeature>, String>,
}

impl GeoJsonBoundaries {
    /// Charge un fichier GeoJSON
    pub fn load(path: &Path) -> Self {
        let loaded = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| parse_features(&text));

        match loaded {
            Ok(features) => {
                debug!(path = %path.display(), boundaries = features.len(), "Boundaries loaded");
                Self {
                    loaded: Ok(features),
                }
            }
            Err(e) => {
                let reason = format!("{}: {}", path.display(), e);
                warn!(reason = %reason, "Boundary data unavailable");
                Self::unavailable(reason)
            }
        }
    }

    /// Parse un document GeoJSON en mémoire
    pub fn parse(text: &str) -> Self {
        Self {
            loaded: parse_features(text),
        }
    }

    /// Source explicitement indisponible
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            loaded: Err(reason.into()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.loaded.is_ok()
    }

    /// Nombre de limites chargées (0 si indisponible)
    pub fn len(&self) -> usize {
        self.loaded.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BoundarySource for GeoJsonBoundaries {
    fn features(&self) -> Result<&[BoundaryFeature], GeodesyError> {
        match &self.loaded {
            Ok(features) => Ok(features),
            Err(reason) => Err(GeodesyError::boundaries_unavailable(reason.clone())),
        }
    }
}

/// Nom d'une feature : propriétés connues, sinon `feature-<index>`
fn feature_name(feature: &Feature, index: usize) -> String {
    NAME_PROPERTIES
        .iter()
        .find_map(|key| {
            feature
                .property(*key)
                .and_then(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
        .map(str::to_string)
        .unwrap_or_else(|| format!("feature-{}", index))
}

fn parse_features(text: &str) -> Result<Vec<BoundaryFeature>, String> {
    let geojson: GeoJson = text.parse().map_err(|e| format!("invalid GeoJSON: {}", e))?;
    let collection = FeatureCollection::try_from(geojson)
        .map_err(|e| format!("expected a FeatureCollection: {}", e))?;

    let mut boundaries = Vec::new();

    for (index, feature) in collection.features.into_iter().enumerate() {
        let name = feature_name(&feature, index);

        let Some(geometry) = feature.geometry else {
            debug!(feature = %name, "Feature without geometry skipped");
            continue;
        };

        let geometry: geo::Geometry<f64> = match geometry.try_into() {
            Ok(g) => g,
            Err(e) => {
                warn!(feature = %name, error = %e, "Unsupported geometry skipped");
                continue;
            }
        };

        match geometry {
            geo::Geometry::Polygon(polygon) => {
                boundaries.push(BoundaryFeature::new(name, Ring::from(polygon.exterior())));
            }
            geo::Geometry::MultiPolygon(multi) => {
                for polygon in multi.iter() {
                    boundaries.push(BoundaryFeature::new(
                        name.clone(),
                        Ring::from(polygon.exterior()),
                    ));
                }
            }
            _ => debug!(feature = %name, "Non-polygonal feature skipped"),
        }
    }

    Ok(boundaries)
}
