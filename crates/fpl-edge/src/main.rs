// fpl-edge entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, stdout carries the report)
// 2. Load config
// 3. Load the catalogue and resolve the target gameweek
// 4. Load that gameweek's fixtures and the user's roster
// 5. Fetch rival rosters when a league is configured
// 6. Build the report and print it

use std::path::Path;

use fpl_edge::config::{self, OutputFormat};
use fpl_edge::engine::gameweek::resolve_gameweek;
use fpl_edge::engine::league::select_rivals;
use fpl_edge::report::{self, EngineSettings, ReportInputs};
use fpl_edge::snapshot::loader::{self, FileRosterSource};
use fpl_edge::snapshot::Roster;

use anyhow::Context;
use chrono::Utc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("fpl-edge starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, entry={}, mode={}",
        config.league.name, config.league.entry_id, config.strategy.mode
    );
    let paths = &config.data_paths;

    // 3. Catalogue and gameweek
    let catalogue = loader::load_catalogue(Path::new(&paths.bootstrap))
        .await
        .context("failed to load bootstrap snapshot")?;
    let gameweek = resolve_gameweek(&catalogue.gameweeks, Utc::now());
    match &gameweek {
        Some(gw) => info!("Planning for {} ({} left)", gw.name, gw.time_left),
        None => warn!("No current or next gameweek in snapshot; using neutral fixture ease"),
    }
    let gameweek_id = gameweek.as_ref().map(|gw| gw.id);

    // 4. Fixtures and the user's roster
    let fixtures = match gameweek_id {
        Some(id) => loader::load_fixtures(Path::new(&paths.fixtures), Some(id))
            .await
            .context("failed to load fixtures")?,
        None => Vec::new(),
    };
    let my_roster = loader::load_roster(Path::new(&paths.my_picks), config.league.entry_id)
        .await
        .context("failed to load your picks")?;

    // 5. Rivals
    let rivals = load_rivals(&config, gameweek_id.unwrap_or(0)).await?;

    // 6. Report
    let settings = EngineSettings::from_config(&config);
    let inputs = ReportInputs {
        catalogue: &catalogue,
        fixtures: &fixtures,
        roster: &my_roster,
        rivals: rivals.as_deref(),
    };
    let Some(report) = report::build_report(inputs, gameweek, &settings) else {
        warn!("Catalogue is empty; nothing to recommend");
        println!("No players in the snapshot; nothing to recommend.");
        return Ok(());
    };

    match config.output.format {
        OutputFormat::Text => print!("{}", report::render_text(&report)),
        OutputFormat::Json => {
            println!("{}", report::to_json(&report).context("failed to serialize report")?)
        }
    }

    info!("fpl-edge finished");
    Ok(())
}

/// Rival rosters for the configured league, or `None` when no standings file
/// is configured. A standings file that loads but yields no rival rosters
/// gives `Some(vec![])`, which the report shows as "no rivals".
async fn load_rivals(
    config: &config::Config,
    gameweek: u32,
) -> anyhow::Result<Option<Vec<Roster>>> {
    let (Some(standings_path), Some(rival_dir)) = (
        config.data_paths.standings.as_deref(),
        config.data_paths.rival_picks_dir.as_deref(),
    ) else {
        info!("No league standings configured; skipping mini-league analysis");
        return Ok(None);
    };

    let standings = loader::load_standings(Path::new(standings_path))
        .await
        .context("failed to load league standings")?;
    let rivals = select_rivals(&standings, config.league.entry_id, config.league.max_rivals);
    let ids: Vec<u64> = rivals.iter().map(|r| r.entry).collect();
    info!("Comparing against {} rivals: {:?}", ids.len(), ids);

    let source = FileRosterSource::new(rival_dir);
    Ok(Some(loader::fetch_rivals(&source, &ids, gameweek).await))
}

/// Initialize tracing to log to a file so stdout stays clean for the report.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("fpl-edge.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fpl_edge=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
