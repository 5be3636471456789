//! Point d'entrée CLI pour ns2wgs

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

use ns2wgs::cli::{self, Commands, ConvertArgs};

/// Variables `NS2WGS_*` depuis un `.env` : répertoire courant ou ses parents, sinon celui du binaire
fn load_env() {
    if dotenvy::dotenv().is_ok() {
        return;
    }
    let beside_binary = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(".env")));
    if let Some(path) = beside_binary {
        let _ = dotenvy::from_path(path);
    }
}

/// Convertir des levés UTM Nord Sahara vers WGS84
#[derive(Parser)]
#[command(name = "ns2wgs")]
#[command(author, version)]
#[command(about = "Convertir des levés UTM Nord Sahara 1959 vers WGS84 (défaut) et exporter en KML")]
#[command(long_about = "Conversion de coordonnées UTM Nord Sahara 1959 (Clarke 1880) vers WGS84 géographique et UTM.\n\nPar défaut, convertit le levé, calcule sa surface et exporte un KML. Utilisez 'area' pour la surface seule.")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Augmenter la verbosité (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Sous-commande (défaut: conversion)
    #[command(subcommand)]
    command: Option<Commands>,

    /// Arguments de la conversion (commande par défaut)
    #[command(flatten)]
    convert: Option<ConvertArgs>,
}

fn main() -> Result<()> {
    // Avant le parsing : la config lit NS2WGS_* dans l'environnement
    load_env();

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Some(Commands::Convert(args)) => {
            cli::cmd_convert(&args)?.display();
        }
        Some(Commands::Area {
            input,
            unit,
            config,
        }) => {
            info!(input = %input.display(), "Area");
            cli::cmd_area(&input, unit, config.as_deref())?;
        }
        Some(Commands::Systems) => cli::cmd_systems(),
        None => {
            // Commande par défaut: conversion
            let Some(args) = cli.convert else {
                anyhow::bail!("Missing --input <FILE> (see ns2wgs --help)");
            };
            cli::cmd_convert(&args)?.display();
        }
    }

    Ok(())
}

/// `-q` ne garde que les avertissements (intersection vide, limites absentes)
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(verbose > 0)
        .with_file(false)
        .with_line_number(false)
        .init();
}
