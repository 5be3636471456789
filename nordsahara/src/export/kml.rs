//! Export KML d'un ring converti
//!
//! Un seul Placemark, géométrie LineString fermée, coordonnées `lon,lat,0`.
//! Sortie déterministe : aucun horodatage.

use crate::geometry::{close, Ring};
use crate::GeodesyError;

/// Nom de fichier par défaut du document exporté
pub const DEFAULT_FILENAME: &str = "converted_coordinates.kml";

/// Nom par défaut du document et du Placemark
pub const DEFAULT_NAME: &str = "Converted Coordinates";

/// Couleurs de style, au format `#RRGGBB` ou `#RRGGBBAA`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmlStyle {
    pub line_color: String,
    pub fill_color: String,
}

impl Default for KmlStyle {
    fn default() -> Self {
        Self {
            line_color: "#0000FF".to_string(),
            fill_color: "#00FF00".to_string(),
        }
    }
}

/// Convertit `#RRGGBB[AA]` (le `#` est optionnel) vers le format KML `aabbggrr`
pub fn kml_color(hex: &str) -> Result<String, GeodesyError> {
    let digits = hex.trim().trim_start_matches('#');
    let valid = matches!(digits.len(), 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(GeodesyError::InvalidColor(hex.to_string()));
    }

    let digits = digits.to_ascii_lowercase();
    let (r, g, b) = (&digits[0..2], &digits[2..4], &digits[4..6]);
    let a = if digits.len() == 8 { &digits[6..8] } else { "ff" };

    Ok(format!("{}{}{}{}", a, b, g, r))
}

/// Échappe une chaîne pour du contenu texte XML
fn escape_xml(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            c => result.push(c),
        }
    }
    result
}

/// Sérialise un ring géographique (x = longitude, y = latitude) en document KML
pub fn serialize(ring: &Ring, style: &KmlStyle) -> Result<Vec<u8>, GeodesyError> {
    serialize_named(ring, style, DEFAULT_NAME)
}

/// Comme [`serialize`], avec un nom de document et de Placemark explicite
pub fn serialize_named(ring: &Ring, style: &KmlStyle, name: &str) -> Result<Vec<u8>, GeodesyError> {
    if ring.is_empty() {
        return Err(GeodesyError::EmptyRing);
    }

    let line_color = kml_color(&style.line_color)?;
    let fill_color = kml_color(&style.fill_color)?;
    let name = escape_xml(name);

    let coordinates = close(ring)
        .coords()
        .iter()
        .map(|c| format!("{},{},0", c.x, c.y))
        .collect::<Vec<_>>()
        .join(" ");

    let doc = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>{name}</name>
    <Placemark>
      <name>{name}</name>
      <Style>
        <LineStyle>
          <color>{line_color}</color>
        </LineStyle>
        <PolyStyle>
          <color>{fill_color}</color>
        </PolyStyle>
      </Style>
      <LineString>
        <coordinates>{coordinates}</coordinates>
      </LineString>
    </Placemark>
  </Document>
</kml>
"#
    );

    Ok(doc.into_bytes())
}
