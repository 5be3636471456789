//! Ring : séquence ordonnée de sommets d'un polygone simple

use geo::{BoundingRect, Coord, LineString, Polygon, Rect};

use crate::types::PlanarPoint;

/// Compare deux coordonnées avec tolérance
///
/// Tolérance assez faible pour rester valable en mètres comme en degrés.
pub(crate) fn coords_equal(a: Coord, b: Coord) -> bool {
    const TOLERANCE: f64 = 1e-9;
    (a.x - b.x).abs() < TOLERANCE && (a.y - b.y).abs() < TOLERANCE
}

/// Séquence ordonnée de points dans un seul système de coordonnées
///
/// La fermeture est implicite : le premier sommet n'a pas besoin d'être répété à la fin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ring(Vec<PlanarPoint>);

impl Ring {
    pub fn new(coords: Vec<PlanarPoint>) -> Self {
        Self(coords)
    }

    pub fn coords(&self) -> &[PlanarPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Vrai si le dernier sommet répète le premier
    pub fn is_closed(&self) -> bool {
        self.0.len() > 1 && coords_equal(self.0[0], self.0[self.0.len() - 1])
    }

    /// Sommets sans la répétition finale éventuelle
    pub fn open_coords(&self) -> &[PlanarPoint] {
        if self.is_closed() {
            &self.0[..self.0.len() - 1]
        } else {
            &self.0
        }
    }

    /// Nouveau ring explicitement fermé (voir [`close`])
    pub fn closed(&self) -> Ring {
        close(self)
    }

    /// Aire signée (voir [`super::signed_area`])
    pub fn signed_area(&self) -> f64 {
        super::signed_area(self)
    }

    /// Polygone `geo` sans trou ; `geo` ferme lui-même l'extérieur
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(LineString::new(self.0.clone()), vec![])
    }

    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        LineString::new(self.0.clone()).bounding_rect()
    }
}

impl From<Vec<PlanarPoint>> for Ring {
    fn from(coords: Vec<PlanarPoint>) -> Self {
        Self(coords)
    }
}

impl From<Vec<(f64, f64)>> for Ring {
    fn from(coords: Vec<(f64, f64)>) -> Self {
        Self(coords.into_iter().map(|(x, y)| Coord { x, y }).collect())
    }
}

impl From<&LineString<f64>> for Ring {
    fn from(ls: &LineString<f64>) -> Self {
        Self(ls.0.clone())
    }
}

impl FromIterator<PlanarPoint> for Ring {
    fn from_iter<I: IntoIterator<Item = PlanarPoint>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Retourne un ring fermé (premier sommet ajouté à la fin si absent) ; idempotent
pub fn close(ring: &Ring) -> Ring {
    if ring.is_empty() || ring.is_closed() {
        return ring.clone();
    }

    let mut coords = ring.0.clone();
    coords.push(coords[0]);
    Ring(coords)
}
