//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{path::PathBuf, str::FromStr};

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "quaderno";
const DEFAULT_STORE_ROOT: &str = "posts";
const DEFAULT_AUTHOR: &str = "anonymous";

/// Command-line arguments for the Quaderno binary.
#[derive(Debug, Parser)]
#[command(name = "quaderno", version, about = "Post corpus store for static blogs")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "QUADERNO_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// List published posts, newest first.
    List(ListArgs),
    /// Print one post by its date and slug.
    Show(ShowArgs),
    /// Validate every file and report all violations.
    Check(CheckArgs),
    /// Export the catalog to a TOML archive.
    Export(ExportArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct StoreOverrides {
    /// Override the store root directory.
    #[arg(long = "store-root", value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub store_root: Option<PathBuf>,

    /// Override the site-wide default author.
    #[arg(long = "site-default-author", value_name = "NAME")]
    pub default_author: Option<String>,

    /// Override whether comments default to enabled.
    #[arg(
        long = "site-comments-default",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub comments_default: Option<bool>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub overrides: StoreOverrides,

    /// Only posts carrying this category.
    #[arg(long, value_name = "LABEL")]
    pub category: Option<String>,

    /// Only posts carrying this tag.
    #[arg(long, value_name = "LABEL")]
    pub tag: Option<String>,

    /// Only posts dated on or after this `YYYY-MM-DD` date.
    #[arg(long, value_name = "DATE")]
    pub since: Option<String>,

    /// Only posts dated on or before this `YYYY-MM-DD` date.
    #[arg(long, value_name = "DATE")]
    pub until: Option<String>,

    /// Emit machine-readable JSON instead of the table.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub overrides: StoreOverrides,

    /// Date component of the post address (`YYYY-MM-DD`).
    #[arg(value_name = "DATE")]
    pub date: String,

    /// Slug component of the post address.
    #[arg(value_name = "SLUG")]
    pub slug: String,

    /// Print the Markdown body as well.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub body: bool,

    /// Emit machine-readable JSON instead of text.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub json: bool,
}

#[derive(Debug, Args, Default, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub overrides: StoreOverrides,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub overrides: StoreOverrides,

    /// Path of the TOML archive to write.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub store: StoreSettings,
    pub site: SiteSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub root: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub default_author: String,
    pub comments_default: bool,
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

    builder = builder.add_source(Environment::with_prefix("QUADERNO").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    if let Some(overrides) = cli.command.as_ref().map(Command::overrides) {
        raw.apply_overrides(overrides);
    }

    Settings::from_raw(raw)
}

impl Command {
    fn overrides(&self) -> &StoreOverrides {
        match self {
            Command::List(args) => &args.overrides,
            Command::Show(args) => &args.overrides,
            Command::Check(args) => &args.overrides,
            Command::Export(args) => &args.overrides,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    store: RawStoreSettings,
    site: RawSiteSettings,
    logging: RawLoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawStoreSettings {
    root: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSiteSettings {
    default_author: Option<String>,
    comments_default: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &StoreOverrides) {
        if let Some(root) = overrides.store_root.as_ref() {
            self.store.root = Some(root.clone());
        }
        if let Some(author) = overrides.default_author.as_ref() {
            self.site.default_author = Some(author.clone());
        }
        if let Some(enabled) = overrides.comments_default {
            self.site.comments_default = Some(enabled);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            store,
            site,
            logging,
        } = raw;

        let store = build_store_settings(store)?;
        let site = build_site_settings(site)?;
        let logging = build_logging_settings(logging)?;

        Ok(Self {
            store,
            site,
            logging,
        })
    }
}

fn build_store_settings(store: RawStoreSettings) -> Result<StoreSettings, LoadError> {
    let root = store
        .root
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_ROOT));
    if root.as_os_str().is_empty() {
        return Err(LoadError::invalid("store.root", "path must not be empty"));
    }
    Ok(StoreSettings { root })
}

fn build_site_settings(site: RawSiteSettings) -> Result<SiteSettings, LoadError> {
    let default_author = match site.default_author {
        Some(author) => {
            let trimmed = author.trim();
            if trimmed.is_empty() {
                return Err(LoadError::invalid(
                    "site.default_author",
                    "author must not be empty",
                ));
            }
            trimmed.to_string()
        }
        None => DEFAULT_AUTHOR.to_string(),
    };

    Ok(SiteSettings {
        default_author,
        comments_default: site.comments_default.unwrap_or(true),
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}
