//! Types de données pour le crate nordsahara

use geo::Coord;

/// Point plan (x, y) : mètres en UTM, degrés (x = longitude, y = latitude) en géographique
pub type PlanarPoint = Coord<f64>;

/// Position géographique WGS84 en degrés décimaux
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    /// Latitude en degrés
    pub lat: f64,
    /// Longitude en degrés
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Point plan avec x = longitude, y = latitude
    pub fn to_lon_lat(self) -> PlanarPoint {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }
}

/// Valeurs dérivées d'une conversion : toujours renseignées ensemble
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derived {
    /// Position géographique WGS84
    pub geographic: LatLon,
    /// Coordonnées UTM WGS84 (même zone que la source)
    pub utm_wgs84: PlanarPoint,
}

/// Axe d'une coordonnée brute (édition d'un champ)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Un sommet levé : coordonnées UTM brutes et, après conversion, les valeurs dérivées
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateRecord {
    raw: PlanarPoint,
    derived: Option<Derived>,
}

impl Default for CoordinateRecord {
    fn default() -> Self {
        Self::new(Coord { x: 0.0, y: 0.0 })
    }
}

impl CoordinateRecord {
    /// Crée un enregistrement non converti
    pub fn new(raw: PlanarPoint) -> Self {
        Self { raw, derived: None }
    }

    /// Crée un enregistrement converti
    pub fn converted(raw: PlanarPoint, derived: Derived) -> Self {
        Self {
            raw,
            derived: Some(derived),
        }
    }

    pub fn raw(&self) -> PlanarPoint {
        self.raw
    }

    /// Remplace les coordonnées brutes ; invalide les valeurs dérivées
    pub fn set_raw(&mut self, raw: PlanarPoint) {
        self.raw = raw;
        self.derived = None;
    }

    /// Modifie un seul axe des coordonnées brutes ; invalide les valeurs dérivées
    pub fn set_raw_axis(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.raw.x = value,
            Axis::Y => self.raw.y = value,
        }
        self.derived = None;
    }

    pub fn derived(&self) -> Option<&Derived> {
        self.derived.as_ref()
    }

    pub fn is_converted(&self) -> bool {
        self.derived.is_some()
    }

    pub fn geographic(&self) -> Option<LatLon> {
        self.derived.map(|d| d.geographic)
    }

    pub fn latitude(&self) -> Option<f64> {
        self.derived.map(|d| d.geographic.lat)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.derived.map(|d| d.geographic.lon)
    }

    pub fn utm_wgs84(&self) -> Option<PlanarPoint> {
        self.derived.map(|d| d.utm_wgs84)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CoordinateRecord {
        CoordinateRecord::converted(
            Coord {
                x: 500000.0,
                y: 3500000.0,
            },
            Derived {
                geographic: LatLon::new(31.6, 3.0),
                utm_wgs84: Coord {
                    x: 499900.0,
                    y: 3500100.0,
                },
            },
        )
    }

    #[test]
    fn test_default_is_origin() {
        let record = CoordinateRecord::default();
        assert_eq!(record.raw(), Coord { x: 0.0, y: 0.0 });
        assert!(!record.is_converted());
    }

    #[test]
    fn test_edit_invalidates_derived() {
        let mut record = sample();
        assert!(record.is_converted());
        record.set_raw_axis(Axis::Y, 3500001.0);
        assert!(!record.is_converted());
        assert_eq!(record.latitude(), None);
        assert_eq!(record.raw().y, 3500001.0);
    }

    #[test]
    fn test_accessors() {
        let record = sample();
        assert_eq!(record.latitude(), Some(31.6));
        assert_eq!(record.longitude(), Some(3.0));
        assert_eq!(record.geographic().unwrap().to_lon_lat(), Coord { x: 3.0, y: 31.6 });
    }
}
