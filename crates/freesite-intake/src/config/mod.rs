use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

const DEFAULT_TABLE: &str = "business_applications";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CAPACITY: u64 = 10;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub store: StoreConfig,
    pub promotion: PromotionConfig,
}

impl AppConfig {
    /// Reads the process environment (after loading `.env` if present).
    ///
    /// Store settings have no defaults: a missing or malformed `SUPABASE_URL` or a missing
    /// `SUPABASE_ANON_KEY` fails here so the process never starts half configured.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let format = LogFormat::from_str(
            &env::var("APP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
        )?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, format },
            store: StoreConfig::from_env()?,
            promotion: PromotionConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

/// Output shape of the log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn from_str(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidLogFormat(other.to_string())),
        }
    }
}

/// Connection settings for the hosted Supabase table.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: Url,
    pub access_key: SecretString,
    pub table: String,
    pub timeout: Duration,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = env::var("SUPABASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingStoreUrl)?;
        let url = parse_store_url(&raw_url)?;

        let access_key = env::var("SUPABASE_ANON_KEY")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingAccessKey)?;

        let table = env::var("SUPABASE_TABLE")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_TABLE.to_string());

        let timeout_secs = match env::var("SUPABASE_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout)?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            url,
            access_key: SecretString::from(access_key),
            table,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_store_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidStoreUrl {
        value: raw.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(ConfigError::InvalidStoreUrl {
            value: raw.to_string(),
        }),
    }
}

/// Promotion knobs surfaced on the landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionConfig {
    /// Number of free websites on offer; `spotsLeft` counts down from here.
    pub capacity: u64,
}

impl Default for PromotionConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl PromotionConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var("PROMOTION_CAPACITY") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map(|capacity| Self { capacity })
                .map_err(|_| ConfigError::InvalidCapacity),
            Err(_) => Ok(Self::default()),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLogFormat(String),
    MissingStoreUrl,
    InvalidStoreUrl { value: String },
    MissingAccessKey,
    InvalidAccessKey,
    StoreClient(reqwest::Error),
    InvalidTimeout,
    InvalidCapacity,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'json' (found '{value}')")
            }
            ConfigError::MissingStoreUrl => write!(
                f,
                "missing SUPABASE_URL; expected format: https://your-project.supabase.co"
            ),
            ConfigError::InvalidStoreUrl { value } => write!(
                f,
                "SUPABASE_URL '{value}' is not a valid http(s) URL; expected format: https://your-project.supabase.co"
            ),
            ConfigError::MissingAccessKey => write!(f, "missing SUPABASE_ANON_KEY"),
            ConfigError::InvalidAccessKey => {
                write!(f, "SUPABASE_ANON_KEY contains characters not allowed in a header")
            }
            ConfigError::StoreClient(err) => write!(f, "unable to build store client: {err}"),
            ConfigError::InvalidTimeout => {
                write!(f, "SUPABASE_TIMEOUT_SECS must be a positive integer")
            }
            ConfigError::InvalidCapacity => {
                write!(f, "PROMOTION_CAPACITY must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::StoreClient(err) => Some(err),
            _ => None,
        }
    }
}
