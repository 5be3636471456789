//! Registre des systèmes de référence
//!
//! Deux systèmes sont prédéfinis :
//! - `NordSahara` : Nord Sahara 1959, ellipsoïde Clarke 1880 (RGS), décalage 7 paramètres
//! - `WGS84` : aucun décalage
//!
//! La zone UTM n'est pas portée par le système : elle est choisie à la conversion.

mod ellipsoid;

pub use ellipsoid::Ellipsoid;

use serde::{Deserialize, Serialize};

use crate::GeodesyError;

/// Hémisphère de la projection UTM
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    /// Faux nord = 0 m
    #[default]
    North,
    /// Faux nord = 10 000 000 m
    South,
}

impl Hemisphere {
    /// Faux nord en mètres
    pub fn false_northing(self) -> f64 {
        match self {
            Hemisphere::North => 0.0,
            Hemisphere::South => 10_000_000.0,
        }
    }
}

impl std::str::FromStr for Hemisphere {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "north" | "n" | "nord" => Ok(Hemisphere::North),
            "south" | "s" | "sud" => Ok(Hemisphere::South),
            _ => Err(format!("Invalid hemisphere: {}. Use: north, south", s)),
        }
    }
}

/// Numéro de zone UTM validé (1..=60)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtmZone(u8);

impl UtmZone {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 60;

    /// Valide un numéro de zone
    pub fn new(zone: u32) -> Result<Self, GeodesyError> {
        if (Self::MIN..=Self::MAX).contains(&zone) {
            Ok(Self(zone as u8))
        } else {
            Err(GeodesyError::InvalidZone(zone))
        }
    }

    pub fn number(self) -> u32 {
        u32::from(self.0)
    }

    /// Méridien central de la zone, en degrés
    pub fn central_meridian(self) -> f64 {
        f64::from(self.0) * 6.0 - 183.0
    }
}

impl TryFrom<u32> for UtmZone {
    type Error = GeodesyError;

    fn try_from(zone: u32) -> Result<Self, Self::Error> {
        Self::new(zone)
    }
}

impl std::fmt::Display for UtmZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Paramètres de Helmert vers WGS84 (convention "position vector", comme `+towgs84`)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HelmertParams {
    /// Translations en mètres
    pub tx: f64,
    pub ty: f64,
    pub tz: f64,
    /// Rotations en secondes d'arc
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
    /// Facteur d'échelle en ppm
    pub scale_ppm: f64,
}

impl HelmertParams {
    /// Aucun décalage
    pub const IDENTITY: Self = Self {
        tx: 0.0,
        ty: 0.0,
        tz: 0.0,
        rx: 0.0,
        ry: 0.0,
        rz: 0.0,
        scale_ppm: 0.0,
    };

    /// Construit depuis les 7 valeurs dans l'ordre de `+towgs84`
    pub const fn from_towgs84(v: [f64; 7]) -> Self {
        Self {
            tx: v[0],
            ty: v[1],
            tz: v[2],
            rx: v[3],
            ry: v[4],
            rz: v[5],
            scale_ppm: v[6],
        }
    }

    pub fn to_towgs84(&self) -> [f64; 7] {
        [
            self.tx,
            self.ty,
            self.tz,
            self.rx,
            self.ry,
            self.rz,
            self.scale_ppm,
        ]
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// Définition statique d'un système (sans zone)
#[derive(Debug, Clone, PartialEq)]
pub struct DatumDefinition {
    pub name: String,
    pub ellipsoid: Ellipsoid,
    pub to_wgs84: HelmertParams,
    pub hemisphere: Hemisphere,
}

/// Paramètres géodésiques complets d'un système, liés à une zone UTM
#[derive(Debug, Clone, PartialEq)]
pub struct GeodeticParameters {
    pub name: String,
    pub ellipsoid: Ellipsoid,
    pub to_wgs84: HelmertParams,
    pub zone: UtmZone,
    pub hemisphere: Hemisphere,
}

impl GeodeticParameters {
    /// Vrai si le système est déjà WGS84 (même ellipsoïde, aucun décalage)
    pub fn is_wgs84(&self) -> bool {
        self.to_wgs84.is_identity() && self.ellipsoid == Ellipsoid::WGS84
    }

    /// Définition PROJ équivalente (`+proj=utm ... +towgs84=...`)
    pub fn proj_definition(&self) -> String {
        let towgs84 = self
            .to_wgs84
            .to_towgs84()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let south = match self.hemisphere {
            Hemisphere::North => "",
            Hemisphere::South => " +south",
        };
        format!(
            "+proj=utm +zone={}{} +a={} +rf={} +towgs84={} +units=m +no_defs +type=crs",
            self.zone, south, self.ellipsoid.a, self.ellipsoid.rf, towgs84
        )
    }
}

/// Paramètres Nord Sahara 1959 → WGS84
const NORD_SAHARA_TOWGS84: [f64; 7] = [
    -267.407, -47.068, 446.357, -0.179423, 5.577661, -1.277620, 1.204866,
];

/// Alias acceptés (après normalisation) vers le nom canonique normalisé
const ALIASES: &[(&str, &str)] = &[
    ("nordsahara", "nordsahara"),
    ("nordsahara1959", "nordsahara"),
    ("ns1959", "nordsahara"),
    ("wgs84", "wgs84"),
    ("epsg:4326", "wgs84"),
];

/// Normalise un nom de système : minuscules, sans espaces, tirets ni underscores
fn normalize(name: &str) -> String {
    let key: String = name
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect();

    ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(key)
}

/// Registre immuable des systèmes supportés
#[derive(Debug, Clone)]
pub struct Registry {
    systems: Vec<DatumDefinition>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Registry {
    pub const NORD_SAHARA: &'static str = "NordSahara";
    pub const WGS84: &'static str = "WGS84";

    /// Registre avec les deux systèmes prédéfinis
    pub fn builtin() -> Self {
        Self {
            systems: vec![
                DatumDefinition {
                    name: Self::NORD_SAHARA.to_string(),
                    ellipsoid: Ellipsoid::CLARKE_1880_RGS,
                    to_wgs84: HelmertParams::from_towgs84(NORD_SAHARA_TOWGS84),
                    hemisphere: Hemisphere::North,
                },
                DatumDefinition {
                    name: Self::WGS84.to_string(),
                    ellipsoid: Ellipsoid::WGS84,
                    to_wgs84: HelmertParams::IDENTITY,
                    hemisphere: Hemisphere::North,
                },
            ],
        }
    }

    /// Ajoute (ou remplace, à nom égal) un système
    pub fn with_system(mut self, definition: DatumDefinition) -> Self {
        let key = normalize(&definition.name);
        match self.systems.iter().position(|d| normalize(&d.name) == key) {
            Some(pos) => self.systems[pos] = definition,
            None => self.systems.push(definition),
        }
        self
    }

    /// Définition d'un système par nom (insensible à la casse, alias acceptés)
    pub fn definition(&self, name: &str) -> Result<&DatumDefinition, GeodesyError> {
        let key = normalize(name);
        self.systems
            .iter()
            .find(|d| normalize(&d.name) == key)
            .ok_or_else(|| GeodesyError::UnknownSystem(name.to_string()))
    }

    /// Paramètres d'un système pour une zone, avec l'hémisphère par défaut du système
    pub fn lookup(&self, name: &str, zone: u32) -> Result<GeodeticParameters, GeodesyError> {
        let hemisphere = self.definition(name)?.hemisphere;
        self.lookup_in(name, zone, hemisphere)
    }

    /// Paramètres d'un système pour une zone et un hémisphère explicites
    pub fn lookup_in(
        &self,
        name: &str,
        zone: u32,
        hemisphere: Hemisphere,
    ) -> Result<GeodeticParameters, GeodesyError> {
        let definition = self.definition(name)?;
        let zone = UtmZone::new(zone)?;

        Ok(GeodeticParameters {
            name: definition.name.clone(),
            ellipsoid: definition.ellipsoid,
            to_wgs84: definition.to_wgs84,
            zone,
            hemisphere,
        })
    }

    /// Systèmes enregistrés, dans l'ordre d'enregistrement
    pub fn systems(&self) -> impl Iterator<Item = &DatumDefinition> {
        self.systems.iter()
    }
}
