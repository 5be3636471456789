//! Types d'erreurs pour le crate nordsahara

use thiserror::Error;

/// Erreurs pouvant survenir lors de la conversion, du calcul de surface,
/// du test d'intersection ou de l'export
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeodesyError {
    /// Système de référence absent du registre
    #[error("Unknown reference system: {0}")]
    UnknownSystem(String),

    /// Zone UTM hors de l'intervalle 1..=60
    #[error("Invalid UTM zone: {0} (expected 1..=60)")]
    InvalidZone(u32),

    /// Coordonnée hors du domaine de validité UTM (|lat| > 84°, valeurs non finies)
    #[error("Projection domain error: {reason}")]
    ProjectionDomain { reason: String },

    /// Les limites de référence n'ont pas pu être chargées
    #[error("Boundary data unavailable: {0}")]
    BoundaryDataUnavailable(String),

    /// Ring vide: impossible de produire une géométrie
    #[error("Cannot serialize an empty ring")]
    EmptyRing,

    /// Couleur de style invalide (attendu #RRGGBB ou #RRGGBBAA)
    #[error("Invalid color: '{0}' (expected #RRGGBB or #RRGGBBAA)")]
    InvalidColor(String),

    /// Erreur du moteur de reprojection externe (PROJ)
    #[error("Reprojection backend error: {0}")]
    Backend(String),

    /// Index de point hors de la collection
    #[error("Point index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl GeodesyError {
    /// Crée une erreur de domaine de projection avec contexte
    pub fn domain(reason: impl Into<String>) -> Self {
        Self::ProjectionDomain {
            reason: reason.into(),
        }
    }

    /// Crée une erreur de limites indisponibles
    pub fn boundaries_unavailable(reason: impl Into<String>) -> Self {
        Self::BoundaryDataUnavailable(reason.into())
    }
}
