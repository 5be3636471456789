//! Définition et implémentation des commandes CLI
//!
//! - `convert` (défaut) : levé → WGS84, surface, intersection, export KML
//! - `area` : surface du levé brut, sans conversion
//! - `systems` : systèmes de référence disponibles

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use nordsahara::export::kml;
use nordsahara::geometry::{area, signed_area};
use nordsahara::{
    intersect, AreaUnit, Hemisphere, MatchPolicy, Registry, SmartReprojector, UtmZone,
};
use tracing::{debug, info, warn};

use crate::boundaries::GeoJsonBoundaries;
use crate::config::Config;
use crate::ingest;
use crate::report::ConversionReport;

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a survey to WGS84, compute its area and export KML
    Convert(ConvertArgs),

    /// Compute the area of a survey in its own projection (no conversion)
    Area {
        /// Survey file (one x,y pair per line)
        #[arg(short, long)]
        input: PathBuf,

        /// Area unit: m2, ha, km2
        #[arg(long)]
        unit: Option<AreaUnit>,

        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the supported reference systems
    Systems,
}

/// Arguments de la conversion (commande par défaut)
#[derive(Args, Debug, Clone, Default)]
pub struct ConvertArgs {
    /// Survey file (one x,y pair per line)
    #[arg(short, long)]
    pub input: PathBuf,

    /// UTM zone of the survey (1-60). Required here, in NS2WGS_ZONE or in the config file
    #[arg(short, long)]
    pub zone: Option<u32>,

    /// Output KML file (défaut : converted_coordinates.kml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Reference boundaries (GeoJSON FeatureCollection, lon/lat)
    #[arg(short, long)]
    pub boundaries: Option<PathBuf>,

    /// Save the conversion report as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Source reference system (défaut : NordSahara)
    #[arg(long)]
    pub system: Option<String>,

    /// Hemisphere of the source projection: north, south
    #[arg(long)]
    pub hemisphere: Option<Hemisphere>,

    /// Reprojection engine: native (défaut), proj
    #[arg(long)]
    pub engine: Option<String>,

    /// Area unit: m2, ha, km2
    #[arg(long)]
    pub unit: Option<AreaUnit>,

    /// Boundary match policy: first-match, largest-overlap, all-overlaps
    #[arg(long)]
    pub policy: Option<MatchPolicy>,

    /// KML line color (#RRGGBB or #RRGGBBAA)
    #[arg(long)]
    pub line_color: Option<String>,

    /// KML fill color (#RRGGBB or #RRGGBBAA)
    #[arg(long)]
    pub fill_color: Option<String>,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ConvertArgs {
    /// Applique les options CLI par-dessus la configuration
    fn apply_to(&self, config: &mut Config) {
        if let Some(zone) = self.zone {
            config.zone = Some(zone);
        }
        if let Some(system) = &self.system {
            config.system = system.clone();
        }
        if let Some(hemisphere) = self.hemisphere {
            config.hemisphere = hemisphere;
        }
        if let Some(unit) = self.unit {
            config.area_unit = unit;
        }
        if let Some(policy) = self.policy {
            config.match_policy = policy;
        }
        if let Some(color) = &self.line_color {
            config.line_color = color.clone();
        }
        if let Some(color) = &self.fill_color {
            config.fill_color = color.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
    }
}

/// Exécute la conversion complète et retourne le rapport
pub fn cmd_convert(args: &ConvertArgs) -> Result<ConversionReport> {
    let start = Instant::now();

    let mut config = Config::resolve(args.config.as_deref())?;
    args.apply_to(&mut config);

    // Zone obligatoire avant toute conversion
    let zone = config.zone.context(
        "No UTM zone selected: use --zone, NS2WGS_ZONE or the \"zone\" config key",
    )?;
    UtmZone::new(zone)?;

    let registry = config.registry()?;
    let engine = SmartReprojector::from_name(args.engine.as_deref().unwrap_or("native"), registry)
        .map_err(anyhow::Error::msg)?;

    info!(
        input = %args.input.display(),
        system = %config.system,
        zone = zone,
        engine = engine.description(),
        "Starting conversion"
    );

    let mut survey = ingest::read_survey(&args.input)?;

    survey
        .convert_all(&engine, &config.system, zone)
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;

    let mut report = ConversionReport::new(
        &args.input.display().to_string(),
        &config.system,
        zone,
        config.hemisphere,
        engine.description(),
    );
    report.record_survey(&survey);
    if survey.len() < 3 {
        warn!(points = survey.len(), "Fewer than 3 points: area will be 0");
        report.record_warning(format!("Only {} points: area is 0", survey.len()));
    }

    let raw_ring = survey.raw_ring();
    if !raw_ring.is_closed() {
        debug!("Survey ring is open, closed for export");
    }
    let (geographic, utm_wgs84) = survey
        .geographic_ring()
        .zip(survey.utm_wgs84_ring())
        .context("Survey is not fully converted")?;
    report.record_area(config.area_unit, area(&raw_ring), Some(area(&utm_wgs84)));

    if let Some(path) = &args.boundaries {
        let source = GeoJsonBoundaries::load(path);
        let outcome = intersect(&geographic, &source, config.match_policy);

        match &outcome {
            Ok(result) if result.is_empty() => warn!("No intersection found"),
            Ok(result) => {
                for overlap in result.overlaps() {
                    info!(boundary = %overlap.boundary_name, "Survey intersects boundary");
                }
            }
            Err(e) => warn!(error = %e, "Intersection skipped"),
        }

        report.record_intersection(config.match_policy, &outcome, area(&geographic));
    }

    let document = kml::serialize(&geographic, &config.style())?;
    write_output(&config.output, &document)?;
    info!(output = %config.output.display(), "KML exported");
    report.record_export(&config.output);

    report.set_duration(start.elapsed());

    if let Some(path) = &args.report {
        report
            .save_to_file(path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        info!(report = %path.display(), "Report saved");
    }

    Ok(report)
}

fn write_output(path: &Path, document: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    std::fs::write(path, document).with_context(|| format!("Failed to write {}", path.display()))
}

/// Surface du levé dans sa projection d'origine ; retourne l'aire en m²
pub fn cmd_area(input: &Path, unit: Option<AreaUnit>, config: Option<&Path>) -> Result<f64> {
    let config = Config::resolve(config)?;
    let unit = unit.unwrap_or(config.area_unit);

    let survey = ingest::read_survey(input)?;
    let ring = survey.raw_ring();
    let square_meters = area(&ring);

    let orientation = match signed_area(&ring) {
        a if a > 0.0 => "counter-clockwise",
        a if a < 0.0 => "clockwise",
        _ => "degenerate",
    };

    println!(
        "{}: {} points, {:.4} {} ({})",
        input.display(),
        survey.len(),
        unit.from_square_meters(square_meters),
        unit.symbol(),
        orientation
    );

    Ok(square_meters)
}

/// Liste les systèmes du registre prédéfini
pub fn cmd_systems() {
    let registry = Registry::builtin();

    println!("=== Reference systems ===");
    for definition in registry.systems() {
        let towgs84 = definition
            .to_wgs84
            .to_towgs84()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");

        println!("{}", definition.name);
        println!(
            "  Ellipsoid: {} (a={}, 1/f={})",
            definition.ellipsoid.name, definition.ellipsoid.a, definition.ellipsoid.rf
        );
        println!("  Hemisphere: {:?}", definition.hemisphere);
        println!("  towgs84: {}", towgs84);
    }
    println!("UTM zones: {}-{}", UtmZone::MIN, UtmZone::MAX);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let mut config = Config {
            zone: Some(32),
            ..Config::default()
        };
        let args = ConvertArgs {
            zone: Some(31),
            policy: Some(MatchPolicy::AllOverlaps),
            line_color: Some("#FF0000".to_string()),
            ..ConvertArgs::default()
        };
        args.apply_to(&mut config);

        assert_eq!(config.zone, Some(31));
        assert_eq!(config.match_policy, MatchPolicy::AllOverlaps);
        assert_eq!(config.line_color, "#FF0000");
        assert_eq!(config.fill_color, "#00FF00");
        assert_eq!(config.system, "NordSahara");
    }

    #[test]
    fn test_unset_args_keep_config() {
        let mut config = Config {
            zone: Some(30),
            area_unit: AreaUnit::SquareKilometers,
            ..Config::default()
        };
        ConvertArgs::default().apply_to(&mut config);
        assert_eq!(config.zone, Some(30));
        assert_eq!(config.area_unit, AreaUnit::SquareKilometers);
    }
}
