//! Intersection d'un polygone candidat avec des limites de référence
//!
//! Les limites sont parcourues dans l'ordre fourni. La politique par défaut
//! (`FirstMatch`) s'arrête sur la première intersection non vide, sans
//! chercher la meilleure.

use geo::{Area, BooleanOps, Intersects, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::Ring;
use crate::GeodesyError;

/// Limite de référence nommée (commune, wilaya, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub name: String,
    pub ring: Ring,
}

impl BoundaryFeature {
    pub fn new(name: impl Into<String>, ring: Ring) -> Self {
        Self {
            name: name.into(),
            ring,
        }
    }
}

/// Source de limites chargée une fois par un collaborateur externe
///
/// Un échec de chargement est remonté tel quel (`BoundaryDataUnavailable`).
pub trait BoundarySource {
    fn features(&self) -> Result<&[BoundaryFeature], GeodesyError>;
}

impl BoundarySource for [BoundaryFeature] {
    fn features(&self) -> Result<&[BoundaryFeature], GeodesyError> {
        Ok(self)
    }
}

impl BoundarySource for Vec<BoundaryFeature> {
    fn features(&self) -> Result<&[BoundaryFeature], GeodesyError> {
        Ok(self.as_slice())
    }
}

/// Politique de sélection des intersections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// Première limite avec une intersection non vide
    #[default]
    FirstMatch,
    /// Limite avec la plus grande surface d'intersection
    LargestOverlap,
    /// Toutes les limites intersectées, dans l'ordre
    AllOverlaps,
}

impl std::str::FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "first-match" | "first" => Ok(MatchPolicy::FirstMatch),
            "largest-overlap" | "largest" => Ok(MatchPolicy::LargestOverlap),
            "all-overlaps" | "all" => Ok(MatchPolicy::AllOverlaps),
            _ => Err(format!(
                "Invalid match policy: {}. Use: first-match, largest-overlap, all-overlaps",
                s
            )),
        }
    }
}

/// Intersection avec une limite
#[derive(Debug, Clone, PartialEq)]
pub struct Overlap {
    /// Position de la limite dans la source
    pub boundary_index: usize,
    pub boundary_name: String,
    /// Région d'intersection (plusieurs parties possibles pour des polygones non convexes)
    pub region: MultiPolygon<f64>,
    /// Surface de la région, dans l'unité² des coordonnées
    pub area: f64,
}

impl Overlap {
    /// Extérieurs de chaque partie de la région
    pub fn rings(&self) -> Vec<Ring> {
        self.region
            .iter()
            .map(|polygon| Ring::from(polygon.exterior()))
            .collect()
    }

    /// Extérieur de la plus grande partie
    pub fn ring(&self) -> Ring {
        self.region
            .iter()
            .max_by(|a, b| a.unsigned_area().total_cmp(&b.unsigned_area()))
            .map(|polygon| Ring::from(polygon.exterior()))
            .unwrap_or_default()
    }
}

/// Résultat d'intersection : vide si aucune limite n'est touchée
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntersectionResult {
    overlaps: Vec<Overlap>,
}

impl IntersectionResult {
    pub fn is_empty(&self) -> bool {
        self.overlaps.is_empty()
    }

    pub fn first(&self) -> Option<&Overlap> {
        self.overlaps.first()
    }

    pub fn overlaps(&self) -> &[Overlap] {
        &self.overlaps
    }
}

/// Intersection non vide entre le candidat et une limite
fn overlap_with(
    candidate: &Polygon<f64>,
    index: usize,
    boundary: &BoundaryFeature,
) -> Option<Overlap> {
    if boundary.ring.len() < 3 {
        return None;
    }

    let boundary_polygon = boundary.ring.to_polygon();

    // Pré-filtre sur les emprises
    let (Some(a), Some(b)) = (
        geo::BoundingRect::bounding_rect(candidate),
        geo::BoundingRect::bounding_rect(&boundary_polygon),
    ) else {
        return None;
    };
    if !a.intersects(&b) {
        return None;
    }

    let region = candidate.intersection(&boundary_polygon);
    let area = region.unsigned_area();
    if region.0.is_empty() || area <= 0.0 {
        return None;
    }

    Some(Overlap {
        boundary_index: index,
        boundary_name: boundary.name.clone(),
        region,
        area,
    })
}

/// Teste le candidat contre les limites de la source selon la politique donnée
pub fn intersect<S: BoundarySource + ?Sized>(
    candidate: &Ring,
    source: &S,
    policy: MatchPolicy,
) -> Result<IntersectionResult, GeodesyError> {
    let boundaries = source.features()?;

    if candidate.len() < 3 {
        return Ok(IntersectionResult::default());
    }

    let candidate_polygon = candidate.to_polygon();
    let mut overlaps: Vec<Overlap> = Vec::new();

    for (index, boundary) in boundaries.iter().enumerate() {
        let Some(overlap) = overlap_with(&candidate_polygon, index, boundary) else {
            continue;
        };

        debug!(
            boundary = %overlap.boundary_name,
            index = index,
            area = overlap.area,
            "Overlap found"
        );

        match policy {
            MatchPolicy::FirstMatch => {
                overlaps.push(overlap);
                break;
            }
            MatchPolicy::LargestOverlap => {
                let is_larger = overlaps.first().map_or(true, |best| overlap.area > best.area);
                if is_larger {
                    overlaps.clear();
                    overlaps.push(overlap);
                }
            }
            MatchPolicy::AllOverlaps => overlaps.push(overlap),
        }
    }

    Ok(IntersectionResult { overlaps })
}
