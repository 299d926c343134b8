use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::workflows::evaluation::{EstimationMode, EvaluationMethod, PenaltyPolicy};

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
    pub evaluator: EvaluatorConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            evaluator: EvaluatorConfig::from_env()?,
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
}

/// Evaluation pipeline defaults. Requests may still override `include_trace`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorConfig {
    pub method: EvaluationMethod,
    pub penalty_policy: PenaltyPolicy,
    pub seniority_mode: EstimationMode,
    /// Name of the language model to use; `None` keeps every stage local.
    pub model: Option<String>,
    pub include_trace: bool,
    pub skills_csv: Option<PathBuf>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            method: EvaluationMethod::default(),
            penalty_policy: PenaltyPolicy::default(),
            seniority_mode: EstimationMode::default(),
            model: None,
            include_trace: false,
            skills_csv: None,
        }
    }
}

impl EvaluatorConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let method = match non_empty_var("EVALUATOR_METHOD") {
            Some(raw) => EvaluationMethod::parse(&raw).ok_or(ConfigError::InvalidMethod(raw))?,
            None => EvaluationMethod::default(),
        };
        let penalty_policy = match non_empty_var("EVALUATOR_PENALTY_POLICY") {
            Some(raw) => {
                PenaltyPolicy::parse(&raw).ok_or(ConfigError::InvalidPenaltyPolicy(raw))?
            }
            None => PenaltyPolicy::default(),
        };
        let seniority_mode = match non_empty_var("EVALUATOR_SENIORITY_MODE") {
            Some(raw) => {
                EstimationMode::parse(&raw).ok_or(ConfigError::InvalidSeniorityMode(raw))?
            }
            None => EstimationMode::default(),
        };
        let include_trace = match non_empty_var("EVALUATOR_INCLUDE_TRACE") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag {
                name: "EVALUATOR_INCLUDE_TRACE",
                value: raw,
            })?,
            None => false,
        };

        Ok(Self {
            method,
            penalty_policy,
            seniority_mode,
            model: non_empty_var("EVALUATOR_MODEL"),
            include_trace,
            skills_csv: non_empty_var("EVALUATOR_SKILLS_CSV").map(PathBuf::from),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidMethod(String),
    InvalidPenaltyPolicy(String),
    InvalidSeniorityMode(String),
    InvalidFlag { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidMethod(value) => write!(
                f,
                "EVALUATOR_METHOD '{value}' is not one of estructurado, langchain, crew_ai"
            ),
            ConfigError::InvalidPenaltyPolicy(value) => write!(
                f,
                "EVALUATOR_PENALTY_POLICY '{value}' is not one of tiered, additive"
            ),
            ConfigError::InvalidSeniorityMode(value) => write!(
                f,
                "EVALUATOR_SENIORITY_MODE '{value}' is not one of composite, experience_only"
            ),
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} '{value}' must be true or false")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
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
        for name in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "EVALUATOR_METHOD",
            "EVALUATOR_PENALTY_POLICY",
            "EVALUATOR_SENIORITY_MODE",
            "EVALUATOR_MODEL",
            "EVALUATOR_INCLUDE_TRACE",
            "EVALUATOR_SKILLS_CSV",
        ] {
            env::remove_var(name);
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
        assert_eq!(config.evaluator, EvaluatorConfig::default());
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
    fn evaluator_overrides_are_read_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("EVALUATOR_METHOD", "crew_ai");
        env::set_var("EVALUATOR_PENALTY_POLICY", "additive");
        env::set_var("EVALUATOR_SENIORITY_MODE", "experience-only");
        env::set_var("EVALUATOR_MODEL", "llama3.2");
        env::set_var("EVALUATOR_INCLUDE_TRACE", "yes");
        env::set_var("EVALUATOR_SKILLS_CSV", "data/skills.csv");

        let evaluator = AppConfig::load().expect("config loads").evaluator;
        assert_eq!(evaluator.method, EvaluationMethod::CrewAi);
        assert_eq!(evaluator.penalty_policy, PenaltyPolicy::Additive);
        assert_eq!(evaluator.seniority_mode, EstimationMode::ExperienceOnly);
        assert_eq!(evaluator.model.as_deref(), Some("llama3.2"));
        assert!(evaluator.include_trace);
        assert_eq!(evaluator.skills_csv, Some(PathBuf::from("data/skills.csv")));
        reset_env();
    }

    #[test]
    fn rejects_unknown_method() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("EVALUATOR_METHOD", "autogen");
        let error = AppConfig::load().expect_err("unknown method rejected");
        assert!(matches!(error, ConfigError::InvalidMethod(ref value) if value == "autogen"));
        reset_env();
    }

    #[test]
    fn rejects_unparseable_trace_flag() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("EVALUATOR_INCLUDE_TRACE", "sometimes");
        let error = AppConfig::load().expect_err("flag rejected");
        assert!(error.to_string().contains("EVALUATOR_INCLUDE_TRACE"));
        reset_env();
    }
}
