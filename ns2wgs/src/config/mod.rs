//! Configuration de l'outil
//!
//! Priorité : options CLI > variables d'environnement > fichier JSON > défauts.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nordsahara::export::{KmlStyle, DEFAULT_FILENAME};
use nordsahara::{AreaUnit, Hemisphere, MatchPolicy, Registry};
use serde::{Deserialize, Serialize};

/// Configuration principale
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Système source des coordonnées levées
    pub system: String,

    /// Zone UTM (aucune par défaut : doit être choisie)
    pub zone: Option<u32>,

    /// Hémisphère de la projection source
    pub hemisphere: Hemisphere,

    /// Couleur des lignes KML (#RRGGBB ou #RRGGBBAA)
    pub line_color: String,

    /// Couleur de remplissage KML
    pub fill_color: String,

    /// Unité d'affichage des surfaces
    pub area_unit: AreaUnit,

    /// Politique d'intersection avec les limites
    pub match_policy: MatchPolicy,

    /// Fichier KML produit
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let style = KmlStyle::default();
        Self {
            system: Registry::NORD_SAHARA.to_string(),
            zone: None,
            hemisphere: Hemisphere::North,
            line_color: style.line_color,
            fill_color: style.fill_color,
            area_unit: AreaUnit::default(),
            match_policy: MatchPolicy::default(),
            output: PathBuf::from(DEFAULT_FILENAME),
        }
    }
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Fichier si fourni, puis surcharges d'environnement
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Applique les variables `NS2WGS_*` de l'environnement
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars<F>(&mut self, get: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        if let Some(system) = var("NS2WGS_SYSTEM") {
            self.system = system;
        }
        if let Some(zone) = var("NS2WGS_ZONE") {
            let zone = zone
                .trim()
                .parse()
                .with_context(|| format!("Invalid NS2WGS_ZONE: {}", zone))?;
            self.zone = Some(zone);
        }
        if let Some(hemisphere) = var("NS2WGS_HEMISPHERE") {
            self.hemisphere = hemisphere.parse().map_err(anyhow::Error::msg)?;
        }
        if let Some(unit) = var("NS2WGS_AREA_UNIT") {
            self.area_unit = unit.parse().map_err(anyhow::Error::msg)?;
        }
        if let Some(policy) = var("NS2WGS_MATCH_POLICY") {
            self.match_policy = policy.parse().map_err(anyhow::Error::msg)?;
        }
        if let Some(color) = var("NS2WGS_LINE_COLOR") {
            self.line_color = color;
        }
        if let Some(color) = var("NS2WGS_FILL_COLOR") {
            self.fill_color = color;
        }

        Ok(())
    }

    /// Style KML courant
    pub fn style(&self) -> KmlStyle {
        KmlStyle {
            line_color: self.line_color.clone(),
            fill_color: self.fill_color.clone(),
        }
    }

    /// Registre prédéfini, avec l'hémisphère configuré pour le système source
    pub fn registry(&self) -> Result<Registry> {
        let registry = Registry::builtin();
        let mut definition = registry.definition(&self.system)?.clone();
        if definition.hemisphere == self.hemisphere {
            return Ok(registry);
        }
        definition.hemisphere = self.hemisphere;
        Ok(registry.with_system(definition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.system, "NordSahara");
        assert_eq!(config.zone, None);
        assert_eq!(config.area_unit, AreaUnit::Hectares);
        assert_eq!(config.match_policy, MatchPolicy::FirstMatch);
        assert_eq!(config.output, PathBuf::from("converted_coordinates.kml"));
        assert_eq!(config.style(), KmlStyle::default());
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{"zone": 32, "area_unit": "km2", "match_policy": "all-overlaps"}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.zone, Some(32));
        assert_eq!(config.area_unit, AreaUnit::SquareKilometers);
        assert_eq!(config.match_policy, MatchPolicy::AllOverlaps);
        assert_eq!(config.system, "NordSahara");
    }

    #[test]
    fn test_env_overrides_file() {
        let json = r##"{"zone": 32, "line_color": "#111111"}"##;
        let mut config: Config = serde_json::from_str(json).unwrap();
        let env = vars(&[
            ("NS2WGS_ZONE", "31"),
            ("NS2WGS_SYSTEM", "wgs84"),
            ("NS2WGS_AREA_UNIT", "m2"),
            ("NS2WGS_FILL_COLOR", ""),
        ]);
        config.apply_vars(|k| env.get(k).cloned()).unwrap();

        assert_eq!(config.zone, Some(31));
        assert_eq!(config.system, "wgs84");
        assert_eq!(config.area_unit, AreaUnit::SquareMeters);
        assert_eq!(config.line_color, "#111111");
        assert_eq!(config.fill_color, "#00FF00");
    }

    #[test]
    fn test_invalid_env_values() {
        let mut config = Config::default();
        let env = vars(&[("NS2WGS_ZONE", "trente")]);
        assert!(config.apply_vars(|k| env.get(k).cloned()).is_err());

        let env = vars(&[("NS2WGS_MATCH_POLICY", "best")]);
        assert!(config.apply_vars(|k| env.get(k).cloned()).is_err());
    }

    #[test]
    fn test_registry_hemisphere() {
        let mut config = Config::default();
        let registry = config.registry().unwrap();
        assert_eq!(
            registry.definition("NordSahara").unwrap().hemisphere,
            Hemisphere::North
        );

        config.hemisphere = Hemisphere::South;
        let registry = config.registry().unwrap();
        assert_eq!(
            registry.definition("NordSahara").unwrap().hemisphere,
            Hemisphere::South
        );
        assert_eq!(
            registry.definition("WGS84").unwrap().hemisphere,
            Hemisphere::North
        );

        config.system = "Merchich".to_string();
        assert!(config.registry().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/ns2wgs.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
