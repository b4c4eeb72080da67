//! Environment configuration and the scheme registry

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::types::{CriterionId, SchemeDescriptor, DEFAULT_SCHEME_ID};
use crate::MAX_CRITERION_SCORE;

/// Top-level configuration, read from `GRANTCRAFT_*` variables (and `.env`)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub review: ReviewConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let host = env::var("GRANTCRAFT_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("GRANTCRAFT_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("GRANTCRAFT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let min_draft_chars = env::var("GRANTCRAFT_MIN_DRAFT_CHARS")
            .unwrap_or_else(|_| "50".to_string())
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidMinDraftChars)?;
        let default_scheme = env::var("GRANTCRAFT_DEFAULT_SCHEME")
            .unwrap_or_else(|_| DEFAULT_SCHEME_ID.to_string());
        let scheme_file = env::var("GRANTCRAFT_SCHEME_FILE").ok().map(PathBuf::from);

        Ok(Self {
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            review: ReviewConfig {
                min_draft_chars,
                default_scheme,
                scheme_file,
            },
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

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Review boundary policy (the engine itself never rejects a draft)
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    /// Trimmed drafts shorter than this are refused with 422
    pub min_draft_chars: usize,
    pub default_scheme: String,
    /// JSON array of extra scheme descriptors
    pub scheme_file: Option<PathBuf>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            min_draft_chars: 50,
            default_scheme: DEFAULT_SCHEME_ID.to_string(),
            scheme_file: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("GRANTCRAFT_PORT must be a valid u16")]
    InvalidPort,
    #[error("GRANTCRAFT_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost { source: std::net::AddrParseError },
    #[error("GRANTCRAFT_MIN_DRAFT_CHARS must be a non-negative integer")]
    InvalidMinDraftChars,
    #[error("cannot read scheme file {path}: {source}")]
    SchemeFileRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid scheme file {path}: {source}")]
    SchemeFileParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("scheme '{scheme}' does not define criterion '{criterion}'")]
    IncompleteScheme {
        scheme: String,
        criterion: CriterionId,
    },
    #[error("scheme '{scheme}' criterion '{criterion}': threshold {threshold} outside 0..={max_score}")]
    InvalidThreshold {
        scheme: String,
        criterion: CriterionId,
        threshold: f64,
        max_score: f64,
    },
    #[error("scheme '{scheme}' criterion '{criterion}': max_score {max_score} outside (0, 5]")]
    InvalidMaxScore {
        scheme: String,
        criterion: CriterionId,
        max_score: f64,
    },
    #[error("default scheme '{0}' is not registered")]
    UnknownDefaultScheme(String),
}

/// Available scheme descriptors, keyed by id
#[derive(Debug, Clone)]
pub struct SchemeRegistry {
    schemes: BTreeMap<String, SchemeDescriptor>,
    default_id: String,
}

impl Default for SchemeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SchemeRegistry {
    /// Only the Horizon Europe RIA/IA scheme
    pub fn builtin() -> Self {
        let scheme = SchemeDescriptor::horizon_europe();
        let mut schemes = BTreeMap::new();
        schemes.insert(scheme.id.clone(), scheme);
        Self {
            schemes,
            default_id: DEFAULT_SCHEME_ID.to_string(),
        }
    }

    /// Built-ins plus the configured scheme file, with the configured default
    pub fn from_config(config: &ReviewConfig) -> Result<Self, ConfigError> {
        let mut registry = Self::builtin();
        if let Some(path) = &config.scheme_file {
            registry.load_file(path)?;
        }
        registry.set_default(&config.default_scheme)?;
        Ok(registry)
    }

    /// Merge a JSON array of descriptors; same ids replace the built-ins
    pub fn load_file(&mut self, path: &Path) -> Result<usize, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::SchemeFileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let schemes: Vec<SchemeDescriptor> =
            serde_json::from_str(&raw).map_err(|source| ConfigError::SchemeFileParse {
                path: path.to_path_buf(),
                source,
            })?;
        let loaded = schemes.len();
        for scheme in schemes {
            self.insert(scheme)?;
        }
        Ok(loaded)
    }

    pub fn insert(&mut self, scheme: SchemeDescriptor) -> Result<(), ConfigError> {
        validate(&scheme)?;
        self.schemes.insert(scheme.id.clone(), scheme);
        Ok(())
    }

    pub fn set_default(&mut self, id: &str) -> Result<(), ConfigError> {
        if !self.schemes.contains_key(id) {
            return Err(ConfigError::UnknownDefaultScheme(id.to_string()));
        }
        self.default_id = id.to_string();
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&SchemeDescriptor> {
        self.schemes.get(id)
    }

    /// Resolve an optional id, falling back to the default scheme
    pub fn resolve(&self, id: Option<&str>) -> Option<&SchemeDescriptor> {
        self.get(id.unwrap_or(&self.default_id))
    }

    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    pub fn all(&self) -> impl Iterator<Item = &SchemeDescriptor> {
        self.schemes.values()
    }
}

/// Every criterion present, max_score reachable, thresholds within 0..=max
fn validate(scheme: &SchemeDescriptor) -> Result<(), ConfigError> {
    for id in CriterionId::ALL {
        let criterion = scheme
            .criteria
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| ConfigError::IncompleteScheme {
                scheme: scheme.id.clone(),
                criterion: id,
            })?;
        if !(criterion.max_score > 0.0 && criterion.max_score <= MAX_CRITERION_SCORE) {
            return Err(ConfigError::InvalidMaxScore {
                scheme: scheme.id.clone(),
                criterion: id,
                max_score: criterion.max_score,
            });
        }
        if !(0.0..=criterion.max_score).contains(&criterion.threshold) {
            return Err(ConfigError::InvalidThreshold {
                scheme: scheme.id.clone(),
                criterion: id,
                threshold: criterion.threshold,
                max_score: criterion.max_score,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "GRANTCRAFT_HOST",
            "GRANTCRAFT_PORT",
            "GRANTCRAFT_LOG_LEVEL",
            "GRANTCRAFT_MIN_DRAFT_CHARS",
            "GRANTCRAFT_DEFAULT_SCHEME",
            "GRANTCRAFT_SCHEME_FILE",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.review.min_draft_chars, 50);
        assert_eq!(config.review.default_scheme, DEFAULT_SCHEME_ID);
        assert!(config.review.scheme_file.is_none());
    }

    #[test]
    fn rejects_invalid_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("GRANTCRAFT_PORT", "not-a-port");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidPort)));
        reset_env();
    }

    #[test]
    fn accepts_localhost_host() {
        let server = ServerConfig {
            host: "localhost".to_string(),
            port: 3000,
        };
        let addr = server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn registry_resolves_default() {
        let registry = SchemeRegistry::builtin();
        assert_eq!(registry.resolve(None).unwrap().id, DEFAULT_SCHEME_ID);
        assert!(registry.resolve(Some("eic_accelerator")).is_none());
    }

    #[test]
    fn registry_rejects_incomplete_scheme() {
        let mut scheme = SchemeDescriptor::horizon_europe();
        scheme.id = "partial".to_string();
        scheme.criteria.truncate(2);
        let err = SchemeRegistry::builtin().insert(scheme).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::IncompleteScheme { criterion: CriterionId::Implementation, .. }
        ));
    }

    #[test]
    fn registry_rejects_threshold_above_max() {
        let mut scheme = SchemeDescriptor::horizon_europe();
        scheme.criteria[0].threshold = 6.0;
        assert!(matches!(
            SchemeRegistry::builtin().insert(scheme),
            Err(ConfigError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn registry_rejects_unreachable_max_score() {
        for max_score in [10.0, 0.0, -1.0, f64::NAN] {
            let mut scheme = SchemeDescriptor::horizon_europe();
            scheme.criteria[1].max_score = max_score;
            scheme.criteria[1].threshold = 0.0;
            assert!(matches!(
                SchemeRegistry::builtin().insert(scheme),
                Err(ConfigError::InvalidMaxScore { criterion: CriterionId::Impact, .. })
            ));
        }
    }

    #[test]
    fn registry_loads_scheme_file() {
        let mut scheme = SchemeDescriptor::horizon_europe();
        scheme.id = "msca_pf".to_string();
        scheme.name = "MSCA Postdoctoral Fellowships".to_string();
        scheme.overall_threshold = Some(7.0);
        let path = env::temp_dir().join(format!("grantcraft-schemes-{}.json", std::process::id()));
        fs::write(&path, serde_json::to_string(&vec![scheme]).unwrap()).unwrap();

        let mut registry = SchemeRegistry::builtin();
        assert_eq!(registry.load_file(&path).unwrap(), 1);
        registry.set_default("msca_pf").unwrap();
        assert_eq!(registry.resolve(None).unwrap().overall_threshold(), 7.0);
        assert_eq!(registry.all().count(), 2);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn registry_reports_missing_file() {
        let err = SchemeRegistry::builtin()
            .load_file(Path::new("/nonexistent/grantcraft/schemes.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::SchemeFileRead { .. }));
    }
}
