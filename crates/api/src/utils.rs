use clap::Parser;
use climate_core::{
    find_config_file, get_xdg_data_dir, load_config, path_exists, ConfigSource,
    DEFAULT_API_PORT, DEFAULT_DATABASE_FILE, DEFAULT_MAX_CONNECTIONS,
};
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};
use log::LevelFilter;
use std::env;
use time::{format_description::well_known::Iso8601, OffsetDateTime};

/// Dataset location used when running from a checkout of the project
const LOCAL_DATABASE: &str = "./Resources/hawaii.sqlite";

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "Climate API - read-only REST api over station precipitation and temperature observations"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $CLIMATE_API_CONFIG, ./climate.toml,
    /// $XDG_CONFIG_HOME/climate-api/climate.toml, /etc/climate-api/climate.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "CLIMATE_API_LEVEL")]
    pub level: Option<String>,

    /// Host to listen on (use 0.0.0.0 for all interfaces)
    #[arg(short, long, env = "CLIMATE_API_HOST")]
    #[serde(alias = "host")]
    pub domain: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "CLIMATE_API_PORT")]
    pub port: Option<String>,

    /// Path to the SQLite observation dataset (opened read-only)
    #[arg(short = 'D', long, env = "CLIMATE_API_DATABASE")]
    #[serde(alias = "database_path")]
    pub database: Option<String>,

    /// Maximum number of pooled store connections
    #[arg(short, long, env = "CLIMATE_API_MAX_CONNECTIONS")]
    pub max_connections: Option<u32>,
}

impl Cli {
    /// Get the effective configuration value with defaults
    pub fn host(&self) -> String {
        self.domain
            .clone()
            .unwrap_or_else(|| "127.0.0.1".to_string())
    }

    pub fn port(&self) -> String {
        self.port
            .clone()
            .unwrap_or_else(|| DEFAULT_API_PORT.to_string())
    }

    /// Falls back to `./Resources/hawaii.sqlite`, then the XDG data directory
    pub fn database(&self) -> String {
        self.database.clone().unwrap_or_else(|| {
            if path_exists(LOCAL_DATABASE) {
                LOCAL_DATABASE.to_string()
            } else {
                get_xdg_data_dir()
                    .join(DEFAULT_DATABASE_FILE)
                    .to_string_lossy()
                    .into_owned()
            }
        })
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }

    /// Values set here take priority over `fallback`
    pub fn merge(self, fallback: Cli) -> Cli {
        Cli {
            config: self.config,
            level: self.level.or(fallback.level),
            domain: self.domain.or(fallback.domain),
            port: self.port.or(fallback.port),
            database: self.database.or(fallback.database),
            max_connections: self.max_connections.or(fallback.max_connections),
        }
    }
}

/// Config file named on the command line, otherwise the first one found
pub fn config_source(cli_args: &Cli) -> ConfigSource {
    if let Some(ref path) = cli_args.config {
        ConfigSource::Explicit(path.into())
    } else {
        find_config_file("CLIMATE_API_CONFIG", "climate.toml")
    }
}

/// Load configuration from CLI args, config file, and environment
///
/// Runs before the logger exists, so failures go to stderr. The returned
/// source is for the caller to log once logging is set up.
pub fn get_config_info() -> (Cli, ConfigSource) {
    let cli_args = Cli::parse();
    let source = config_source(&cli_args);

    let file_config: Cli = load_config(&source).unwrap_or_else(|e| {
        eprintln!("ignoring config file {}: {:#}", source, e);
        Cli::default()
    });

    // CLI args override file config (env vars are handled by clap)
    (cli_args.merge(file_config), source)
}

pub fn get_log_level(cli: &Cli) -> LevelFilter {
    let level_str = cli
        .level
        .clone()
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    match level_str.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

pub fn setup_logger() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let timestamp = OffsetDateTime::now_utc()
                .format(&Iso8601::DEFAULT)
                .unwrap_or_default();
            out.finish(format_args!(
                "[{} {}] {}: {}",
                timestamp,
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}
