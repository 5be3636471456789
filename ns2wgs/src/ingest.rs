//! Lecture des levés : un couple `x,y` par ligne
//!
//! Séparateurs acceptés : virgule, point-virgule ou tabulation. Avec `;` ou
//! tabulation, la virgule décimale est tolérée (`612345,50;3654321,25`).
//! Les lignes vides et les commentaires `#` sont ignorés, ainsi qu'un éventuel
//! en-tête non numérique avant le premier point.

use std::path::Path;

use geo::Coord;
use nordsahara::{PlanarPoint, Survey};
use thiserror::Error;
use tracing::debug;

/// Erreurs de lecture d'un levé
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: expected 2 values (x, y), found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("Line {line}: invalid number '{value}'")]
    InvalidNumber { line: usize, value: String },

    #[error("No coordinates found")]
    Empty,
}

/// Découpe une ligne selon le séparateur détecté
fn split_fields(line: &str) -> (Vec<&str>, bool) {
    if line.contains('\t') {
        (line.split('\t').collect(), true)
    } else if line.contains(';') {
        (line.split(';').collect(), true)
    } else {
        (line.split(',').collect(), false)
    }
}

/// Parse un nombre, virgule décimale comprise si autorisée
fn parse_number(raw: &str, decimal_comma: bool) -> Option<f64> {
    let v = raw.trim();
    if v.is_empty() {
        return None;
    }

    let value: f64 = if decimal_comma && v.contains(',') {
        fast_float::parse(v.replace(',', ".")).ok()?
    } else {
        fast_float::parse(v).ok()?
    };

    value.is_finite().then_some(value)
}

/// Parse le contenu texte d'un levé
pub fn parse_points(text: &str) -> Result<Vec<PlanarPoint>, IngestError> {
    let mut points = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (fields, decimal_comma) = split_fields(line);
        let parsed: Vec<Option<f64>> = fields
            .iter()
            .map(|f| parse_number(f, decimal_comma))
            .collect();

        // En-tête : première ligne utile sans aucun nombre
        if points.is_empty() && parsed.iter().all(Option::is_none) {
            debug!(line = line_no, header = line, "Header skipped");
            continue;
        }

        if fields.len() != 2 {
            return Err(IngestError::FieldCount {
                line: line_no,
                found: fields.len(),
            });
        }

        match (parsed[0], parsed[1]) {
            (Some(x), Some(y)) => points.push(Coord { x, y }),
            (None, _) => {
                return Err(IngestError::InvalidNumber {
                    line: line_no,
                    value: fields[0].trim().to_string(),
                })
            }
            (_, None) => {
                return Err(IngestError::InvalidNumber {
                    line: line_no,
                    value: fields[1].trim().to_string(),
                })
            }
        }
    }

    if points.is_empty() {
        return Err(IngestError::Empty);
    }

    Ok(points)
}

/// Lit un fichier de levé
pub fn read_points(path: &Path) -> Result<Vec<PlanarPoint>, IngestError> {
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_points(&text)
}

/// Lit un fichier de levé en une collection non convertie
pub fn read_survey(path: &Path) -> Result<Survey, IngestError> {
    let points = read_points(path)?;
    debug!(path = %path.display(), points = points.len(), "Survey loaded");
    Ok(Survey::from_raw(points))
}
