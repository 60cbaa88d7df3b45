use crate::quiz::{FunnelSettings, NarratorCooldown, QuestionBank, QuestionBankError};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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
    pub funnel: FunnelConfig,
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

        let sales_page_url = env::var("QUIZ_SALES_PAGE_URL")
            .unwrap_or_else(|_| "https://example.com/offer".to_string());
        let narrator_enabled = match env::var("QUIZ_NARRATOR_ENABLED") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidNarratorFlag(raw))?,
            Err(_) => true,
        };
        let narrator_cooldown = env::var("QUIZ_NARRATOR_COOLDOWN_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .trim()
            .parse::<u64>()
            .ok()
            .and_then(NarratorCooldown::try_from_secs)
            .ok_or(ConfigError::InvalidCooldown)?;
        let question_bank_path = env::var("QUIZ_QUESTION_BANK")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            funnel: FunnelConfig {
                sales_page_url,
                narrator_enabled,
                narrator_cooldown,
                question_bank_path,
            },
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
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
}

/// Quiz funnel knobs: sales page, narrator usage and the question bank source.
#[derive(Debug, Clone)]
pub struct FunnelConfig {
    pub sales_page_url: String,
    pub narrator_enabled: bool,
    pub narrator_cooldown: NarratorCooldown,
    pub question_bank_path: Option<PathBuf>,
}

impl FunnelConfig {
    pub fn settings(&self) -> FunnelSettings {
        FunnelSettings {
            sales_page_url: self.sales_page_url.clone(),
            narrator_enabled: self.narrator_enabled,
            narrator_cooldown: self.narrator_cooldown,
        }
    }

    /// Built-in bank unless a CSV override is configured.
    pub fn question_bank(&self) -> Result<QuestionBank, QuestionBankError> {
        match &self.question_bank_path {
            Some(path) => QuestionBank::from_csv_path(path),
            None => Ok(QuestionBank::standard()),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidCooldown,
    InvalidNarratorFlag(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCooldown => write!(
                f,
                "QUIZ_NARRATOR_COOLDOWN_SECS must be a non-negative whole number of seconds within range"
            ),
            ConfigError::InvalidNarratorFlag(value) => write!(
                f,
                "QUIZ_NARRATOR_ENABLED must be true or false, got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidCooldown
            | ConfigError::InvalidNarratorFlag(_) => None,
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
            "QUIZ_SALES_PAGE_URL",
            "QUIZ_NARRATOR_ENABLED",
            "QUIZ_NARRATOR_COOLDOWN_SECS",
            "QUIZ_QUESTION_BANK",
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
        assert!(config.funnel.narrator_enabled);
        assert_eq!(
            config.funnel.narrator_cooldown.min_interval(),
            chrono::Duration::seconds(30)
        );
        assert!(config.funnel.question_bank_path.is_none());

        let bank = config.funnel.question_bank().expect("standard bank");
        assert_eq!(bank.max_total(), 60);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_funnel_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("QUIZ_NARRATOR_ENABLED", "off");
        env::set_var("QUIZ_NARRATOR_COOLDOWN_SECS", "5");
        env::set_var("QUIZ_SALES_PAGE_URL", "https://shop.example.com/course");

        let config = AppConfig::load().expect("config loads");
        let settings = config.funnel.settings();
        assert!(!settings.narrator_enabled);
        assert_eq!(
            settings.narrator_cooldown.min_interval(),
            chrono::Duration::seconds(5)
        );
        assert_eq!(settings.sales_page_url, "https://shop.example.com/course");
        reset_env();
    }

    #[test]
    fn rejects_invalid_funnel_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("QUIZ_NARRATOR_COOLDOWN_SECS", "soon");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidCooldown)
        ));

        env::set_var("QUIZ_NARRATOR_COOLDOWN_SECS", "10000000000000000");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidCooldown)
        ));

        reset_env();
        env::set_var("QUIZ_NARRATOR_ENABLED", "maybe");
        match AppConfig::load() {
            Err(ConfigError::InvalidNarratorFlag(value)) => assert_eq!(value, "maybe"),
            other => panic!("expected invalid flag, got {other:?}"),
        }
        reset_env();
    }
}
