//! Application-level configuration loading, including the team roster.

use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "SCOREBOARD_BACK_CONFIG_PATH";
/// Default durable score record location.
const DEFAULT_SCORE_FILE: &str = "teamScores.json";
/// Default pending-delta record location, shared with the external change API.
const DEFAULT_PENDING_FILE: &str = "changesFromAPI.json";
/// Default reconciliation interval in milliseconds.
const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    teams: Vec<String>,
    score_file: PathBuf,
    pending_file: PathBuf,
    tick_interval: Duration,
    listen_for_network_changes: bool,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// built-in roster and file locations.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        teams = config.teams.len(),
                        "loaded configuration"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Build a configuration programmatically, bypassing the config file.
    pub fn new(
        teams: Vec<String>,
        score_file: PathBuf,
        pending_file: PathBuf,
        tick_interval: Duration,
        listen_for_network_changes: bool,
    ) -> Self {
        Self {
            teams: sanitize_roster(teams),
            score_file,
            pending_file,
            tick_interval,
            listen_for_network_changes,
        }
    }

    /// The closed set of valid team names, in display order.
    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    /// Location of the durable score record.
    pub fn score_file(&self) -> &Path {
        &self.score_file
    }

    /// Location of the pending-delta record written by the external API.
    pub fn pending_file(&self) -> &Path {
        &self.pending_file
    }

    /// Fixed interval between reconciliation ticks.
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Whether the reconciler should consume network-sourced changes at all.
    pub fn listen_for_network_changes(&self) -> bool {
        self.listen_for_network_changes
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            teams: default_teams(),
            score_file: PathBuf::from(DEFAULT_SCORE_FILE),
            pending_file: PathBuf::from(DEFAULT_PENDING_FILE),
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            listen_for_network_changes: true,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    teams: Option<Vec<String>>,
    #[serde(default)]
    score_file: Option<PathBuf>,
    #[serde(default)]
    pending_file: Option<PathBuf>,
    #[serde(default)]
    tick_interval_ms: Option<u64>,
    #[serde(default)]
    listen_for_network_changes: Option<bool>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();

        let teams = match value.teams {
            Some(teams) => {
                let roster = sanitize_roster(teams);
                if roster.is_empty() {
                    warn!("configured roster is empty; using built-in teams");
                    defaults.teams
                } else {
                    roster
                }
            }
            None => defaults.teams,
        };

        Self {
            teams,
            score_file: value.score_file.unwrap_or(defaults.score_file),
            pending_file: value.pending_file.unwrap_or(defaults.pending_file),
            tick_interval: value
                .tick_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.tick_interval),
            listen_for_network_changes: value
                .listen_for_network_changes
                .unwrap_or(defaults.listen_for_network_changes),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Drop blank and duplicate names while keeping first-seen order.
fn sanitize_roster(teams: Vec<String>) -> Vec<String> {
    let mut roster: Vec<String> = Vec::with_capacity(teams.len());
    for team in teams {
        let name = team.trim();
        if name.is_empty() {
            warn!("dropping blank team name from roster");
            continue;
        }
        if roster.iter().any(|existing| existing == name) {
            warn!(team = name, "dropping duplicate team name from roster");
            continue;
        }
        roster.push(name.to_string());
    }
    roster
}

/// Built-in roster shipped with the binary: five colors across two divisions.
fn default_teams() -> Vec<String> {
    [
        "Blue Boys",
        "Green Boys",
        "Orange Boys",
        "Red Boys",
        "Yellow Boys",
        "Blue Girls",
        "Green Girls",
        "Orange Girls",
        "Red Girls",
        "Yellow Girls",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_roster_has_ten_teams() {
        let config = AppConfig::default();
        assert_eq!(config.teams().len(), 10);
        assert_eq!(config.teams()[0], "Blue Boys");
        assert_eq!(config.teams()[9], "Yellow Girls");
    }

    #[test]
    fn raw_config_fields_are_all_optional() {
        let raw: RawConfig = serde_json::from_str("{}").unwrap();
        let config = AppConfig::from(raw);

        assert_eq!(config.teams().len(), 10);
        assert_eq!(config.tick_interval(), Duration::from_millis(1_000));
        assert!(config.listen_for_network_changes());
    }

    #[test]
    fn roster_sanitization_drops_blanks_and_duplicates() {
        let roster = sanitize_roster(vec![
            "Blue Boys".into(),
            "  ".into(),
            "Blue Boys".into(),
            "Red Girls".into(),
        ]);
        assert_eq!(
            roster,
            vec!["Blue Boys".to_string(), "Red Girls".to_string()]
        );
    }

    #[test]
    fn empty_configured_roster_falls_back_to_defaults() {
        let raw: RawConfig = serde_json::from_str(r#"{"teams": ["", " "]}"#).unwrap();
        let config = AppConfig::from(raw);
        assert_eq!(config.teams().len(), 10);
    }
}
