//! Rapport de conversion
//!
//! Collecte les résultats d'un passage (points convertis, surfaces,
//! intersection, export) pour affichage console et sauvegarde JSON.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use nordsahara::{
    AreaUnit, GeodesyError, Hemisphere, IntersectionResult, MatchPolicy, Survey,
};
use serde::Serialize;

/// Ligne du tableau des points
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointRow {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub utm_x: Option<f64>,
    pub utm_y: Option<f64>,
}

/// Surfaces dans l'unité configurée
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AreaSummary {
    pub unit: AreaUnit,
    /// Ring des coordonnées levées
    pub raw: f64,
    /// Ring UTM WGS84, si converti
    pub utm_wgs84: Option<f64>,
}

/// Issue du test d'intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntersectionStatus {
    /// Aucune limite fournie
    NotRequested,
    /// Limites chargées, aucune intersection
    NoOverlap,
    /// Au moins une limite intersectée
    Matched,
    /// Limites impossibles à charger
    Unavailable,
}

/// Limite intersectée
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRow {
    pub boundary_index: usize,
    pub name: String,
    /// Part du polygone levé couverte par la limite (0..=1)
    pub coverage: f64,
    /// Nombre de parties de la région d'intersection
    pub parts: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntersectionSummary {
    pub status: IntersectionStatus,
    pub policy: Option<MatchPolicy>,
    pub matches: Vec<MatchRow>,
    pub reason: Option<String>,
}

impl Default for IntersectionSummary {
    fn default() -> Self {
        Self {
            status: IntersectionStatus::NotRequested,
            policy: None,
            matches: Vec::new(),
            reason: None,
        }
    }
}

/// Rapport complet d'une conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    /// Fichier levé en entrée
    pub input: String,
    pub system: String,
    pub zone: u32,
    pub hemisphere: Hemisphere,
    /// Moteur de reprojection utilisé
    pub engine: String,
    /// Durée du traitement
    pub duration_secs: f64,

    pub points: Vec<PointRow>,
    pub area: Option<AreaSummary>,
    pub intersection: IntersectionSummary,
    /// Fichier KML produit
    pub export: Option<String>,
    pub warnings: Vec<String>,
}

impl ConversionReport {
    pub fn new(input: &str, system: &str, zone: u32, hemisphere: Hemisphere, engine: &str) -> Self {
        Self {
            input: input.to_string(),
            system: system.to_string(),
            zone,
            hemisphere,
            engine: engine.to_string(),
            duration_secs: 0.0,
            points: Vec::new(),
            area: None,
            intersection: IntersectionSummary::default(),
            export: None,
            warnings: Vec::new(),
        }
    }

    /// Enregistre le tableau des points (convertis ou non)
    pub fn record_survey(&mut self, survey: &Survey) {
        self.points = survey
            .records()
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let raw = record.raw();
                PointRow {
                    index,
                    x: raw.x,
                    y: raw.y,
                    latitude: record.latitude(),
                    longitude: record.longitude(),
                    utm_x: record.utm_wgs84().map(|c| c.x),
                    utm_y: record.utm_wgs84().map(|c| c.y),
                }
            })
            .collect();
    }

    /// Enregistre les surfaces, fournies en m²
    pub fn record_area(&mut self, unit: AreaUnit, raw_m2: f64, utm_wgs84_m2: Option<f64>) {
        self.area = Some(AreaSummary {
            unit,
            raw: unit.from_square_meters(raw_m2),
            utm_wgs84: utm_wgs84_m2.map(|a| unit.from_square_meters(a)),
        });
    }

    /// Enregistre l'issue de l'intersection
    ///
    /// `candidate_area` est la surface du ring testé, dans la même unité que
    /// les surfaces d'intersection.
    pub fn record_intersection(
        &mut self,
        policy: MatchPolicy,
        outcome: &Result<IntersectionResult, GeodesyError>,
        candidate_area: f64,
    ) {
        self.intersection = match outcome {
            Ok(result) if result.is_empty() => {
                self.record_warning("No reference boundary intersects the survey");
                IntersectionSummary {
                    status: IntersectionStatus::NoOverlap,
                    policy: Some(policy),
                    ..Default::default()
                }
            }
            Ok(result) => IntersectionSummary {
                status: IntersectionStatus::Matched,
                policy: Some(policy),
                matches: result
                    .overlaps()
                    .iter()
                    .map(|o| MatchRow {
                        boundary_index: o.boundary_index,
                        name: o.boundary_name.clone(),
                        coverage: if candidate_area > 0.0 {
                            (o.area / candidate_area).min(1.0)
                        } else {
                            0.0
                        },
                        parts: o.region.0.len(),
                    })
                    .collect(),
                reason: None,
            },
            Err(e) => {
                self.record_warning(e.to_string());
                IntersectionSummary {
                    status: IntersectionStatus::Unavailable,
                    policy: Some(policy),
                    matches: Vec::new(),
                    reason: Some(e.to_string()),
                }
            }
        };
    }

    pub fn record_export(&mut self, path: &Path) {
        self.export = Some(path.display().to_string());
    }

    pub fn record_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Définit la durée du traitement
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Nombre de points convertis
    pub fn converted_points(&self) -> usize {
        self.points.iter().filter(|p| p.latitude.is_some()).count()
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!(
            "CONVERSION REPORT - {} UTM {} ({:?})",
            self.system, self.zone, self.hemisphere
        );
        println!("{}", "=".repeat(60));

        println!("\nInput: {}", self.input);
        println!("Engine: {}", self.engine);
        println!("Duration: {:.3}s", self.duration_secs);

        println!("\n--- POINTS ({}) ---", self.points.len());
        println!(
            "  {:>4} {:>14} {:>14} {:>12} {:>12} {:>14} {:>14}",
            "#", "X", "Y", "Latitude", "Longitude", "UTM WGS84 X", "UTM WGS84 Y"
        );
        for p in &self.points {
            println!(
                "  {:>4} {:>14.3} {:>14.3} {:>12} {:>12} {:>14} {:>14}",
                p.index,
                p.x,
                p.y,
                fmt_opt(p.latitude, 8),
                fmt_opt(p.longitude, 8),
                fmt_opt(p.utm_x, 3),
                fmt_opt(p.utm_y, 3),
            );
        }

        if let Some(area) = &self.area {
            println!("\n--- AREA ---");
            println!("  Survey: {:.4} {}", area.raw, area.unit.symbol());
            if let Some(utm) = area.utm_wgs84 {
                println!("  UTM WGS84: {:.4} {}", utm, area.unit.symbol());
            }
        }

        match self.intersection.status {
            IntersectionStatus::NotRequested => {}
            IntersectionStatus::NoOverlap => {
                println!("\n--- INTERSECTION ---");
                println!("  No intersection found");
            }
            IntersectionStatus::Matched => {
                println!("\n--- INTERSECTION ---");
                for m in &self.intersection.matches {
                    println!(
                        "  {} (#{}): {:.1}% of the survey, {} part(s)",
                        m.name,
                        m.boundary_index,
                        m.coverage * 100.0,
                        m.parts
                    );
                }
            }
            IntersectionStatus::Unavailable => {
                println!("\n--- INTERSECTION ---");
                println!(
                    "  Boundaries unavailable: {}",
                    self.intersection.reason.as_deref().unwrap_or("unknown")
                );
            }
        }

        if let Some(export) = &self.export {
            println!("\nKML: {}", export);
        }

        if !self.warnings.is_empty() {
            println!("\n--- WARNINGS ({}) ---", self.warnings.len());
            for w in self.warnings.iter().take(10) {
                println!("  {}", w);
            }
            if self.warnings.len() > 10 {
                println!("  ... and {} more", self.warnings.len() - 10);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        let area = self
            .area
            .map(|a| format!(", {:.4} {}", a.raw, a.unit.symbol()))
            .unwrap_or_default();
        format!(
            "{} UTM {}: {}/{} points converted{}",
            self.system,
            self.zone,
            self.converted_points(),
            self.points.len(),
            area
        )
    }
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_else(|| "-".to_string())
}
