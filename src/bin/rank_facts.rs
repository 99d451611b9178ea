use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cbb_notes::config::{EngineConfig, config_path_from_env};
use cbb_notes::engine::rank_all;
use cbb_notes::ingest::{SubjectKind, merge_rows, parse_rows_json, quad_split, records_from_rows};
use cbb_notes::roster::{DEFAULT_ROSTER_SIZE, select_roster};
use cbb_notes::season::current_season_label;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let rows_path = parse_path_arg("--rows").ok_or_else(|| anyhow!("missing --rows <file.json>"))?;
    let config = match parse_path_arg("--config").or_else(config_path_from_env) {
        Some(path) => EngineConfig::load(&path)
            .with_context(|| format!("loading engine config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let kind = parse_kind_arg()?;
    let seasons_ago = parse_value_arg("--seasons-ago")
        .map(|raw| raw.parse::<u32>().context("--seasons-ago must be a number"))
        .transpose()?
        .unwrap_or(0);

    let mut rows = read_rows(&rows_path)?;
    if let Some(extra) = parse_path_arg("--secondary-rows") {
        rows = merge_rows(&rows, &read_rows(&extra)?, kind.id_field());
    }

    let ingested = records_from_rows(&rows, kind, &config.registry);
    info!(
        rows = rows.len(),
        records = ingested.records.len(),
        skipped = ingested.skipped_rows.len(),
        "ingested stat rows"
    );

    let mut report = rank_all(&ingested.records, &config.registry, &config.thresholds)?;

    let mut roster = Vec::new();
    if let Some(team) = parse_value_arg("--team") {
        let team_id = team.trim().parse::<u32>().context("--team must be a numeric id")?;
        roster = select_roster(&rows, team_id, DEFAULT_ROSTER_SIZE);
        let ids: HashSet<u32> = roster.iter().map(|p| p.player_id).collect();
        report.sheet.retain_subjects(&ids);
    }
    if let Some(raw) = parse_value_arg("--subjects") {
        let ids = parse_ids(&raw);
        if ids.is_empty() {
            return Err(anyhow!("--subjects resolved to no ids"));
        }
        report.sheet.retain_subjects(&ids);
    }

    let quad = match parse_path_arg("--games") {
        Some(path) => quad_split(&read_rows(&path)?),
        None => Vec::new(),
    };

    let out = serde_json::json!({
        "season": current_season_label(seasons_ago),
        "metrics": report.metrics,
        "facts": report.sheet.encoded(),
        "roster": roster,
        "quad": quad,
        "warnings": report.warnings,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn read_rows(path: &Path) -> Result<Vec<cbb_notes::ingest::StatRow>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_rows_json(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn parse_kind_arg() -> Result<SubjectKind> {
    match parse_value_arg("--kind").as_deref().map(str::trim) {
        None | Some("team") => Ok(SubjectKind::Team),
        Some("player") => Ok(SubjectKind::Player),
        Some(other) => Err(anyhow!("unknown --kind `{other}` (expected team or player)")),
    }
}

fn parse_path_arg(flag: &str) -> Option<PathBuf> {
    parse_value_arg(flag)
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| PathBuf::from(raw.trim()))
}

fn parse_value_arg(flag: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            return Some(raw.to_string());
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
        {
            return Some(next.clone());
        }
    }
    None
}

fn parse_ids(raw: &str) -> HashSet<u32> {
    raw.split([',', ';', ' '])
        .filter_map(|part| part.trim().parse::<u32>().ok())
        .collect()
}
