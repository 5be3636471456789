//! Collection ordonnée des points d'un levé
//!
//! Remplace l'état implicite de l'interface : les points sont possédés ici et
//! passés explicitement aux opérations du moteur.

use geo::Coord;
use rayon::prelude::*;
use tracing::debug;

use crate::geometry::Ring;
use crate::reproject::SmartReprojector;
use crate::types::{Axis, CoordinateRecord, PlanarPoint};
use crate::GeodesyError;

/// Levé : séquence ordonnée d'enregistrements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Survey {
    records: Vec<CoordinateRecord>,
}

impl Survey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Crée un levé non converti depuis des coordonnées brutes
    pub fn from_raw<I: IntoIterator<Item = PlanarPoint>>(points: I) -> Self {
        Self {
            records: points.into_iter().map(CoordinateRecord::new).collect(),
        }
    }

    pub fn records(&self) -> &[CoordinateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ajoute un point (0, 0) pour saisie manuelle ; retourne son index
    pub fn add_point(&mut self) -> usize {
        self.push(Coord { x: 0.0, y: 0.0 })
    }

    /// Ajoute un point brut ; retourne son index
    pub fn push(&mut self, point: PlanarPoint) -> usize {
        self.records.push(CoordinateRecord::new(point));
        self.records.len() - 1
    }

    fn record_mut(&mut self, index: usize) -> Result<&mut CoordinateRecord, GeodesyError> {
        let len = self.records.len();
        self.records
            .get_mut(index)
            .ok_or(GeodesyError::IndexOutOfRange { index, len })
    }

    /// Modifie un axe d'un point brut ; invalide ses valeurs dérivées
    pub fn set_raw(&mut self, index: usize, axis: Axis, value: f64) -> Result<(), GeodesyError> {
        self.record_mut(index)?.set_raw_axis(axis, value);
        Ok(())
    }

    /// Supprime un point et le retourne
    pub fn remove(&mut self, index: usize) -> Result<CoordinateRecord, GeodesyError> {
        let len = self.records.len();
        if index >= len {
            return Err(GeodesyError::IndexOutOfRange { index, len });
        }
        Ok(self.records.remove(index))
    }

    /// Vrai si le levé est non vide et entièrement converti
    pub fn is_converted(&self) -> bool {
        !self.records.is_empty() && self.records.iter().all(CoordinateRecord::is_converted)
    }

    /// Convertit tous les points, en parallèle et sans dépendance d'ordre
    ///
    /// Tout ou rien : en cas d'erreur le levé reste inchangé.
    pub fn convert_all(
        &mut self,
        engine: &SmartReprojector,
        source_system: &str,
        utm_zone: u32,
    ) -> Result<(), GeodesyError> {
        let converted: Vec<CoordinateRecord> = self
            .records
            .par_iter()
            .map(|record| engine.convert(record.raw(), source_system, utm_zone))
            .collect::<Result<_, _>>()?;

        debug!(
            points = converted.len(),
            system = source_system,
            zone = utm_zone,
            engine = engine.description(),
            "Survey converted"
        );

        self.records = converted;
        Ok(())
    }

    /// Ring des coordonnées brutes
    pub fn raw_ring(&self) -> Ring {
        self.records.iter().map(CoordinateRecord::raw).collect()
    }

    /// Ring géographique (x = longitude, y = latitude)
    ///
    /// `None` tant qu'un point au moins n'est pas converti : jamais de ring partiel.
    pub fn geographic_ring(&self) -> Option<Ring> {
        if !self.is_converted() {
            return None;
        }
        self.records
            .iter()
            .map(|r| r.geographic().map(|g| g.to_lon_lat()))
            .collect()
    }

    /// Ring UTM WGS84, `None` si le levé n'est pas entièrement converti
    pub fn utm_wgs84_ring(&self) -> Option<Ring> {
        if !self.is_converted() {
            return None;
        }
        self.records.iter().map(CoordinateRecord::utm_wgs84).collect()
    }
}
