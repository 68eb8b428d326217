//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

use std::{path::PathBuf, str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use reybex_api_types::EntityId;

pub use cli::{
    BoardArgs, CliArgs, Command, GlobalOverrides, LoginArgs, RenderArgs, TaskArgs, TrackArgs,
    TrackCommand,
};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "reybex";
const ENV_PREFIX: &str = "REYBEX";
const DEFAULT_API_BASE_URL: &str = "https://core-backend.reybex.com/api";
const DEFAULT_FILE_BASE_URL: &str = "https://core-backend.reybex.com/fileUploader/show";
const DEFAULT_API_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SPRINT_ID: &str = "1759743240961002";
const DEFAULT_LAST_COMMENTS_EXPORT_ID: &str = "1766888745013001";
const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;
const SESSION_DIR: &str = "reybex";
const SESSION_FILE: &str = "session.json";

/// Fully-resolved client settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub logging: LoggingSettings,
    pub session: SessionSettings,
    pub board: BoardSettings,
    pub tracker: TrackerSettings,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Always ends with `/` so relative endpoint paths join beneath it.
    pub base_url: Url,
    pub file_base_url: Url,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct BoardSettings {
    pub sprint_id: EntityId,
    pub last_comments_export_id: EntityId,
}

#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub tick_interval: Duration,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    api: RawApiSettings,
    logging: RawLoggingSettings,
    session: RawSessionSettings,
    board: RawBoardSettings,
    tracker: RawTrackerSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &GlobalOverrides) {
        if let Some(url) = overrides.api_base_url.as_ref() {
            self.api.base_url = Some(url.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(path) = overrides.session_file.as_ref() {
            self.session.path = Some(path.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            api,
            logging,
            session,
            board,
            tracker,
        } = raw;

        Ok(Self {
            api: build_api_settings(api)?,
            logging: build_logging_settings(logging)?,
            session: build_session_settings(session)?,
            board: build_board_settings(board)?,
            tracker: build_tracker_settings(tracker)?,
        })
    }
}

fn build_api_settings(api: RawApiSettings) -> Result<ApiSettings, LoadError> {
    let base_url = parse_base_url(
        api.base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL),
        "api.base_url",
    )?;
    let file_base_url = parse_base_url(
        api.file_base_url
            .as_deref()
            .unwrap_or(DEFAULT_FILE_BASE_URL),
        "api.file_base_url",
    )?;

    let timeout_secs = api.timeout_seconds.unwrap_or(DEFAULT_API_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(LoadError::invalid(
            "api.timeout_seconds",
            "must be greater than zero",
        ));
    }

    Ok(ApiSettings {
        base_url,
        file_base_url,
        timeout: Duration::from_secs(timeout_secs),
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::WARN,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_session_settings(session: RawSessionSettings) -> Result<SessionSettings, LoadError> {
    let path = match session.path {
        Some(path) if path.as_os_str().is_empty() => {
            return Err(LoadError::invalid("session.path", "path must not be empty"));
        }
        Some(path) => path,
        None => default_session_path(),
    };

    Ok(SessionSettings { path })
}

fn build_board_settings(board: RawBoardSettings) -> Result<BoardSettings, LoadError> {
    let sprint_id = non_empty_id(
        board.sprint_id.as_deref().unwrap_or(DEFAULT_SPRINT_ID),
        "board.sprint_id",
    )?;
    let last_comments_export_id = non_empty_id(
        board
            .last_comments_export_id
            .as_deref()
            .unwrap_or(DEFAULT_LAST_COMMENTS_EXPORT_ID),
        "board.last_comments_export_id",
    )?;

    Ok(BoardSettings {
        sprint_id,
        last_comments_export_id,
    })
}

fn build_tracker_settings(tracker: RawTrackerSettings) -> Result<TrackerSettings, LoadError> {
    let interval_ms = tracker
        .tick_interval_ms
        .unwrap_or(DEFAULT_TICK_INTERVAL_MS);
    if interval_ms == 0 {
        return Err(LoadError::invalid(
            "tracker.tick_interval_ms",
            "must be greater than zero",
        ));
    }

    Ok(TrackerSettings {
        tick_interval: Duration::from_millis(interval_ms),
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawApiSettings {
    base_url: Option<String>,
    file_base_url: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSessionSettings {
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawBoardSettings {
    sprint_id: Option<String>,
    last_comments_export_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawTrackerSettings {
    tick_interval_ms: Option<u64>,
}

/// Parse an absolute http(s) URL and make sure its path ends with `/`.
fn parse_base_url(value: &str, key: &'static str) -> Result<Url, LoadError> {
    let mut url = Url::parse(value.trim())
        .map_err(|err| LoadError::invalid(key, format!("invalid URL `{value}`: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(LoadError::invalid(key, "scheme must be http or https"));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn non_empty_id(value: &str, key: &'static str) -> Result<EntityId, LoadError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LoadError::invalid(key, "must not be empty"));
    }
    Ok(EntityId::new(trimmed))
}

/// `<config dir>/reybex/session.json`, or `.reybex/session.json` in the
/// working directory when the platform has no configuration directory.
fn default_session_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(SESSION_DIR))
        .unwrap_or_else(|| PathBuf::from(format!(".{SESSION_DIR}")))
        .join(SESSION_FILE)
}
