#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Operator CLI for the hazard map.
//!
//! Lets operators check how the current rule set classifies an address,
//! measure on-site proximity, reverse-geocode a point, dry-run a lifecycle
//! transition against JSON snapshots, and print the state leaderboard.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use hazard_map_geocoder::nominatim::DEFAULT_REVERSE_URL;
use hazard_map_geocoder::{NominatimGeocoder, reverse_geocode_or_raw};
use hazard_map_hazard_models::{ActorContext, Coordinates, JurisdictionRule, Position, Report};
use hazard_map_jurisdiction::resolve_jurisdiction;
use hazard_map_jurisdiction::store::{EmbeddedRuleStore, RuleStore, TomlFileRuleStore};
use hazard_map_lifecycle::policy::DEFAULT_PROXIMITY_RADIUS_KM;
use hazard_map_lifecycle::{TransitionAction, TrustPolicy, apply_transition};
use hazard_map_spatial::{distance_km, within_proximity};
use hazard_map_stats::{jurisdiction_distribution, state_leaderboard, status_distribution};

#[derive(Parser)]
#[command(name = "hazard_map", about = "Hazard map operator tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an address into FEDERAL, STATE or UNKNOWN jurisdiction
    Classify {
        /// Free-text address (e.g., "Third Mainland Bridge, Lagos")
        #[arg(long)]
        address: String,
        /// State the address is in
        #[arg(long)]
        state: String,
        /// Rule file (overrides `HAZARD_MAP_RULES` env var; defaults to the
        /// embedded rule set)
        #[arg(long)]
        rules: Option<PathBuf>,
    },
    /// List the jurisdiction rules in evaluation order
    Rules {
        /// Rule file (overrides `HAZARD_MAP_RULES` env var)
        #[arg(long)]
        rules: Option<PathBuf>,
    },
    /// Compute the distance between a report and an actor, and whether the
    /// actor is close enough to verify on site
    Distance {
        #[arg(long, allow_negative_numbers = true)]
        report_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        report_lng: f64,
        #[arg(long, allow_negative_numbers = true)]
        actor_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        actor_lng: f64,
        /// Proximity radius in kilometres
        #[arg(long, default_value_t = DEFAULT_PROXIMITY_RADIUS_KM)]
        radius_km: f64,
    },
    /// Reverse-geocode a point via Nominatim (`HAZARD_MAP_NOMINATIM_URL`)
    Reverse {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },
    /// Dry-run a lifecycle transition against JSON snapshots and print the
    /// outcome
    Transition {
        /// Report snapshot (JSON)
        #[arg(long)]
        report: PathBuf,
        /// Actor context (JSON)
        #[arg(long)]
        actor: PathBuf,
        /// Action (JSON, e.g. `{"action": "verify"}`)
        #[arg(long)]
        action: String,
        /// Actor latitude; omit for remote actors
        #[arg(long, allow_negative_numbers = true, requires = "lng")]
        lat: Option<f64>,
        /// Actor longitude
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lng: Option<f64>,
        /// Proximity radius in kilometres
        #[arg(long, default_value_t = DEFAULT_PROXIMITY_RADIUS_KM)]
        radius_km: f64,
        /// Verifications needed to verify a report
        #[arg(long, default_value_t = 1)]
        threshold: u32,
    },
    /// Print the state leaderboard and distributions for a JSON array of
    /// reports
    Leaderboard {
        /// Report snapshots (JSON array)
        reports: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    match cli.command {
        Commands::Classify {
            address,
            state,
            rules,
        } => {
            let rules = load_rules(rules).await?;
            let jurisdiction = resolve_jurisdiction(&address, &state, &rules);
            println!("{jurisdiction}");
        }
        Commands::Rules { rules } => {
            let rules = load_rules(rules).await?;
            println!("{:<12} {:<10} {:<30} JURISDICTION", "ID", "STATE", "PATTERN");
            println!("{}", "-".repeat(66));
            for rule in &rules {
                println!(
                    "{:<12} {:<10} {:<30} {}",
                    rule.id.as_deref().unwrap_or("-"),
                    rule.state,
                    rule.road_name_pattern,
                    rule.jurisdiction
                );
            }
        }
        Commands::Distance {
            report_lat,
            report_lng,
            actor_lat,
            actor_lng,
            radius_km,
        } => {
            let report = Coordinates::new(report_lat, report_lng)?;
            let actor = Coordinates::new(actor_lat, actor_lng)?;
            let distance = distance_km(report, actor);
            let verdict = if within_proximity(report, actor, radius_km) {
                "within range"
            } else {
                "out of range"
            };
            println!("{distance:.3} km ({verdict} of {radius_km} km)");
        }
        Commands::Reverse { lat, lng } => {
            let coordinates = Coordinates::new(lat, lng)?;
            let base_url = std::env::var("HAZARD_MAP_NOMINATIM_URL")
                .unwrap_or_else(|_| DEFAULT_REVERSE_URL.to_string());
            let geocoder = NominatimGeocoder::new(base_url)?;
            let address = reverse_geocode_or_raw(&geocoder, coordinates).await;
            println!("{}", serde_json::to_string_pretty(&address)?);
        }
        Commands::Transition {
            report,
            actor,
            action,
            lat,
            lng,
            radius_km,
            threshold,
        } => {
            let report: Report = read_json(&report).await?;
            let actor: ActorContext = read_json(&actor).await?;
            let action: TransitionAction = serde_json::from_str(&action)?;
            let position = match (lat, lng) {
                (Some(lat), Some(lng)) => Position::Fix {
                    coordinates: Coordinates::new(lat, lng)?,
                },
                _ => Position::NotProvided,
            };
            let policy = TrustPolicy {
                proximity_radius_km: radius_km,
                verification_threshold: threshold,
            };

            let outcome = apply_transition(
                &report,
                &action,
                &actor,
                position,
                &policy,
                chrono::Utc::now(),
            )?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Commands::Leaderboard { reports } => {
            let reports: Vec<Report> = read_json(&reports).await?;

            println!(
                "{:<5} {:<20} {:>6} {:>11} {:>6} {:>9} {:>7}",
                "RANK", "STATE", "TOTAL", "UNVERIFIED", "FIXED", "FIX DAYS", "DANGER"
            );
            println!("{}", "-".repeat(70));
            for row in state_leaderboard(&reports) {
                let fix_days = row
                    .avg_fix_time_days
                    .map_or_else(|| "-".to_string(), |d| format!("{d:.1}"));
                println!(
                    "{:<5} {:<20} {:>6} {:>11} {:>6} {:>9} {:>7}",
                    row.rank,
                    row.state,
                    row.total_reports,
                    row.unverified_reports,
                    row.fixed_reports,
                    fix_days,
                    row.danger_score
                );
            }

            println!();
            for entry in status_distribution(&reports) {
                println!("{:<12} {}", entry.status, entry.count);
            }
            println!();
            for entry in jurisdiction_distribution(&reports) {
                println!("{:<12} {}", entry.jurisdiction, entry.count);
            }
        }
    }

    Ok(())
}

/// Loads rules from `path`, then `HAZARD_MAP_RULES`, then the embedded set.
async fn load_rules(
    path: Option<PathBuf>,
) -> Result<Vec<JurisdictionRule>, Box<dyn std::error::Error>> {
    let path = path.or_else(|| std::env::var_os("HAZARD_MAP_RULES").map(PathBuf::from));

    let rules = match path {
        Some(path) => TomlFileRuleStore::new(path).load_rules().await?,
        None => EmbeddedRuleStore.load_rules().await?,
    };
    log::debug!("Using {} jurisdiction rules", rules.len());
    Ok(rules)
}

async fn read_json<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<T, Box<dyn std::error::Error>> {
    let contents = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&contents)?)
}
