use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::scoring::{FallbackMode, GeocoderSettings};

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
    pub geocoding: GeocodingConfig,
    pub scoring: ScoringConfig,
    pub b2b: B2bConfig,
}

impl AppConfig {
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
        let log_format = match env::var("APP_LOG_FORMAT") {
            Ok(value) => LogFormat::parse(&value)?,
            Err(_) => LogFormat::Compact,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                format: log_format,
            },
            geocoding: GeocodingConfig::from_env()?,
            scoring: ScoringConfig::from_env()?,
            b2b: B2bConfig::from_env(environment)?,
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidValue {
                key: "APP_LOG_FORMAT",
                value: value.to_string(),
            }),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocoderKind {
    Nominatim,
    Offline,
}

/// External geocoding and address fallback settings.
#[derive(Debug, Clone)]
pub struct GeocodingConfig {
    pub provider: GeocoderKind,
    pub base_url: String,
    pub user_agent: String,
    pub country: String,
    pub timeout: Duration,
    pub strict: bool,
}

impl GeocodingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let provider = match env::var("RISKO_GEOCODER") {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "nominatim" => GeocoderKind::Nominatim,
                "offline" | "none" => GeocoderKind::Offline,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "RISKO_GEOCODER",
                        value,
                    })
                }
            },
            Err(_) => GeocoderKind::Nominatim,
        };

        let timeout_secs = parse_env("RISKO_GEOCODE_TIMEOUT_SECS", 10u64)?;
        let strict = parse_bool_env("RISKO_STRICT_GEOCODING", false)?;

        Ok(Self {
            provider,
            base_url: env::var("RISKO_GEOCODER_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            user_agent: env::var("RISKO_GEOCODER_USER_AGENT")
                .unwrap_or_else(|_| "risko_platform".to_string()),
            country: env::var("RISKO_COUNTRY").unwrap_or_else(|_| "Turkey".to_string()),
            timeout: Duration::from_secs(timeout_secs),
            strict,
        })
    }

    pub fn settings(&self) -> GeocoderSettings {
        GeocoderSettings {
            country: self.country.clone(),
            timeout: self.timeout,
            strict: self.strict,
        }
    }
}

/// Scoring engine knobs.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub fallback_mode: FallbackMode,
    /// Optional JSON catalog replacing the built-in zone tables.
    pub zone_table_path: Option<PathBuf>,
}

impl ScoringConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let fallback_mode = match env::var("RISKO_FALLBACK_MODE") {
            Ok(value) => value
                .parse::<FallbackMode>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "RISKO_FALLBACK_MODE",
                    value,
                })?,
            Err(_) => FallbackMode::Midpoint,
        };

        let zone_table_path = env::var("RISKO_ZONE_TABLE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            fallback_mode,
            zone_table_path,
        })
    }
}

/// Partner API access.
#[derive(Debug, Clone)]
pub struct B2bConfig {
    pub api_keys: Vec<String>,
    pub max_batch_size: usize,
}

impl B2bConfig {
    const DEMO_KEYS: [&'static str; 2] = ["demo-api-key-123", "test-api-key-456"];

    fn from_env(environment: AppEnvironment) -> Result<Self, ConfigError> {
        let api_keys = match env::var("RISKO_B2B_API_KEYS") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_string)
                .collect(),
            // Demo keys are never provisioned implicitly in production.
            Err(_) if environment == AppEnvironment::Production => Vec::new(),
            Err(_) => Self::DEMO_KEYS.iter().map(|key| key.to_string()).collect(),
        };

        let max_batch_size = parse_env("RISKO_MAX_BATCH_SIZE", 100usize)?;
        if max_batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "RISKO_MAX_BATCH_SIZE",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            api_keys,
            max_batch_size,
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        Err(_) => Ok(default),
    }
}

fn parse_bool_env(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(key) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue { key, value }),
        },
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidValue { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "{key} has an unsupported value '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidValue { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_LOG_FORMAT",
            "RISKO_GEOCODER",
            "RISKO_GEOCODER_URL",
            "RISKO_GEOCODER_USER_AGENT",
            "RISKO_COUNTRY",
            "RISKO_GEOCODE_TIMEOUT_SECS",
            "RISKO_STRICT_GEOCODING",
            "RISKO_FALLBACK_MODE",
            "RISKO_ZONE_TABLE",
            "RISKO_B2B_API_KEYS",
            "RISKO_MAX_BATCH_SIZE",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.format, LogFormat::Compact);
        assert_eq!(config.geocoding.provider, GeocoderKind::Nominatim);
        assert_eq!(config.geocoding.timeout, Duration::from_secs(10));
        assert_eq!(config.geocoding.country, "Turkey");
        assert!(!config.geocoding.strict);
        assert_eq!(config.scoring.fallback_mode, FallbackMode::Midpoint);
        assert!(config.scoring.zone_table_path.is_none());
        assert_eq!(config.b2b.max_batch_size, 100);
        assert_eq!(config.b2b.api_keys.len(), 2);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn reads_scoring_and_partner_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RISKO_FALLBACK_MODE", "random");
        env::set_var("RISKO_GEOCODER", "offline");
        env::set_var("RISKO_STRICT_GEOCODING", "true");
        env::set_var("RISKO_B2B_API_KEYS", "alpha, beta,,");
        env::set_var("RISKO_MAX_BATCH_SIZE", "25");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.scoring.fallback_mode, FallbackMode::Random);
        assert_eq!(config.geocoding.provider, GeocoderKind::Offline);
        assert!(config.geocoding.settings().strict);
        assert_eq!(config.b2b.api_keys, vec!["alpha", "beta"]);
        assert_eq!(config.b2b.max_batch_size, 25);
    }

    #[test]
    fn production_does_not_ship_demo_keys() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        let config = AppConfig::load().expect("config loads");
        reset_env();
        assert!(config.b2b.api_keys.is_empty());
    }

    #[test]
    fn rejects_unknown_fallback_mode() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RISKO_FALLBACK_MODE", "chaotic");
        let err = AppConfig::load().expect_err("invalid mode rejected");
        reset_env();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "RISKO_FALLBACK_MODE",
                ..
            }
        ));
    }
}
