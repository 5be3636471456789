//! Géométrie plane : fermeture de ring et aire (formule du lacet)

mod ring;

pub use ring::{close, Ring};

use serde::{Deserialize, Serialize};

/// Aire signée d'un ring considéré fermé (formule du lacet)
///
/// - Positive pour un sens anti-horaire, négative pour un sens horaire
/// - Exactement 0 pour moins de 3 sommets
/// - Unité : carré de l'unité d'entrée (m² pour un ring UTM)
///
/// Les sommets sont recentrés sur le premier point : en UTM les produits
/// croisés bruts (~10¹²) perdraient plusieurs décimales.
pub fn signed_area(ring: &Ring) -> f64 {
    let points = ring.coords();
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let origin = points[0];
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        let (xi, yi) = (points[i].x - origin.x, points[i].y - origin.y);
        let (xj, yj) = (points[j].x - origin.x, points[j].y - origin.y);
        sum += xi * yj - xj * yi;
    }
    sum / 2.0
}

/// Aire non signée
pub fn area(ring: &Ring) -> f64 {
    signed_area(ring).abs()
}

/// Unité d'affichage d'une aire exprimée en m²
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaUnit {
    #[serde(rename = "m2", alias = "square_meters")]
    SquareMeters,
    #[default]
    #[serde(rename = "ha", alias = "hectares")]
    Hectares,
    #[serde(rename = "km2", alias = "square_kilometers")]
    SquareKilometers,
}

impl AreaUnit {
    /// Convertit une aire en m² vers cette unité
    pub fn from_square_meters(self, square_meters: f64) -> f64 {
        match self {
            AreaUnit::SquareMeters => square_meters,
            AreaUnit::Hectares => square_meters / 10_000.0,
            AreaUnit::SquareKilometers => square_meters / 1_000_000.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            AreaUnit::SquareMeters => "m²",
            AreaUnit::Hectares => "ha",
            AreaUnit::SquareKilometers => "km²",
        }
    }
}

impl std::str::FromStr for AreaUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "m2" | "m²" | "sqm" | "square_meters" => Ok(AreaUnit::SquareMeters),
            "ha" | "hectares" => Ok(AreaUnit::Hectares),
            "km2" | "km²" | "square_kilometers" => Ok(AreaUnit::SquareKilometers),
            _ => Err(format!("Invalid area unit: {}. Use: m2, ha, km2", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    fn square() -> Ring {
        Ring::from(vec![(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)])
    }

    #[test]
    fn test_square_ccw() {
        assert_eq!(signed_area(&square()), 10000.0);
    }

    #[test]
    fn test_square_cw_negative() {
        let cw: Ring = square().coords().iter().rev().copied().collect();
        assert_eq!(signed_area(&cw), -10000.0);
        assert_eq!(area(&cw), 10000.0);
    }

    #[test]
    fn test_explicitly_closed_same_area() {
        assert_eq!(signed_area(&close(&square())), 10000.0);
    }

    #[test]
    fn test_degenerate() {
        assert_eq!(signed_area(&Ring::default()), 0.0);
        assert_eq!(signed_area(&Ring::from(vec![(1.0, 1.0)])), 0.0);
        assert_eq!(signed_area(&Ring::from(vec![(1.0, 1.0), (5.0, 7.0)])), 0.0);
    }

    #[test]
    fn test_utm_scale_precision() {
        // Parcelle de 1 ha en coordonnées UTM réalistes
        let ring = Ring::from(vec![
            (612_345.25, 3_654_321.5),
            (612_445.25, 3_654_321.5),
            (612_445.25, 3_654_421.5),
            (612_345.25, 3_654_421.5),
        ]);
        assert_eq!(area(&ring), 10000.0);
        assert!((ring.to_polygon().unsigned_area() - 10000.0).abs() < 1e-3);
    }

    #[test]
    fn test_area_units() {
        assert_eq!(AreaUnit::Hectares.from_square_meters(25_000.0), 2.5);
        assert_eq!(AreaUnit::SquareKilometers.from_square_meters(2_500_000.0), 2.5);
        assert_eq!(AreaUnit::SquareMeters.from_square_meters(12.0), 12.0);
        assert_eq!("HA".parse::<AreaUnit>().unwrap(), AreaUnit::Hectares);
        assert!("acres".parse::<AreaUnit>().is_err());
    }
}
