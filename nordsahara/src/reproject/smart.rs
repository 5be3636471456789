//! Choix du moteur : natif (pure Rust) par défaut, PROJ en option
//!
//! Le moteur PROJ n'existe qu'avec la feature `proj` ; il sert de contre-vérification.

use super::Reprojector;
use crate::registry::Registry;
use crate::types::{CoordinateRecord, PlanarPoint};
use crate::GeodesyError;

/// Moteur de reprojection sélectionnable
#[derive(Debug, Clone)]
pub enum SmartReprojector {
    /// Reprojection native (pure Rust)
    Native(Reprojector),
    /// Reprojection via PROJ (si feature activée)
    #[cfg(feature = "proj")]
    Proj(super::proj::ProjReprojector),
}

impl Default for SmartReprojector {
    fn default() -> Self {
        Self::Native(Reprojector::default())
    }
}

impl From<Reprojector> for SmartReprojector {
    fn from(reprojector: Reprojector) -> Self {
        Self::Native(reprojector)
    }
}

impl SmartReprojector {
    /// Crée un moteur par nom ("native" ou "proj")
    pub fn from_name(name: &str, registry: Registry) -> Result<Self, String> {
        match name.to_lowercase().as_str() {
            "native" | "lite" | "rust" => Ok(Self::Native(Reprojector::new(registry))),
            #[cfg(feature = "proj")]
            "proj" => Ok(Self::Proj(super::proj::ProjReprojector::new(registry))),
            #[cfg(not(feature = "proj"))]
            "proj" => Err(
                "The PROJ engine requires the 'proj' feature. Build with: cargo build --features proj"
                    .to_string(),
            ),
            _ => Err(format!("Unknown engine: {}. Use: native, proj", name)),
        }
    }

    pub fn registry(&self) -> &Registry {
        match self {
            Self::Native(native) => native.registry(),
            #[cfg(feature = "proj")]
            Self::Proj(proj) => proj.registry(),
        }
    }

    /// Conversion complète d'un point levé
    pub fn convert(
        &self,
        point: PlanarPoint,
        source_system: &str,
        utm_zone: u32,
    ) -> Result<CoordinateRecord, GeodesyError> {
        match self {
            Self::Native(native) => native.convert(point, source_system, utm_zone),
            #[cfg(feature = "proj")]
            Self::Proj(proj) => proj.convert(point, source_system, utm_zone),
        }
    }

    /// Retourne une description du moteur utilisé
    pub fn description(&self) -> &'static str {
        match self {
            Self::Native(_) => "native (pure Rust)",
            #[cfg(feature = "proj")]
            Self::Proj(_) => "proj (PROJ library)",
        }
    }
}
