use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DEFAULT_SOCKET_PATH: &str = "/tmp/civicalert.sock";

/// Longest accepted staff session (one year)
pub const MAX_SESSION_TTL_MINUTES: u64 = 366 * 24 * 60;

/// Server-wide configuration loaded from config.toml, inline JSON and
/// environment variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerSettings {
    pub server: ServerSection,
    pub store: StoreSettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub transport: String,
    pub socket_path: Option<String>,
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Mock records seeded at startup; 0 disables seeding
    pub demo_incidents: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub session_ttl_minutes: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            transport: "stdio".to_string(),
            socket_path: Some(DEFAULT_SOCKET_PATH.to_string()),
            log_level: "info".to_string(),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self { demo_incidents: 25 }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            session_ttl_minutes: 480,
        }
    }
}

/// Where a layer of the resolved configuration came from.
/// Lower priority numbers win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub name: String,
    pub priority: u8,
}

/// Resolved settings plus the layers they were built from
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub settings: ServerSettings,
    pub sources: Vec<ConfigSource>,
}

impl ServerSettings {
    /// Default user configuration file location
    pub fn config_path() -> PathBuf {
        if let Ok(custom_path) = std::env::var("CIVICALERT_CONFIG_PATH") {
            PathBuf::from(custom_path)
        } else {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("civicalert")
                .join("config.toml")
        }
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load the default user file if present, then apply environment overrides
    pub fn load() -> Result<Self> {
        Ok(Self::load_with_precedence(None, None)?.settings)
    }

    /// Resolve settings: inline JSON > explicit file > default user file > defaults,
    /// then environment overrides on top.
    pub fn load_with_precedence(
        config_json: Option<&str>,
        config_path: Option<&Path>,
    ) -> Result<ResolvedSettings> {
        let mut sources = Vec::new();

        let mut settings = if let Some(json) = config_json {
            info!("Using inline JSON configuration");
            sources.push(ConfigSource {
                name: "inline JSON".to_string(),
                priority: 1,
            });
            serde_json::from_str(json).context("Failed to parse config JSON")?
        } else if let Some(path) = config_path {
            info!("Using custom config file: {}", path.display());
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            sources.push(ConfigSource {
                name: path.display().to_string(),
                priority: 2,
            });
            Self::from_file(path)?
        } else {
            let default_path = Self::config_path();
            if default_path.exists() {
                info!("Using default config file: {}", default_path.display());
                sources.push(ConfigSource {
                    name: default_path.display().to_string(),
                    priority: 3,
                });
                Self::from_file(&default_path)?
            } else {
                debug!("No config file found at {}, using defaults", default_path.display());
                Self::default()
            }
        };

        sources.push(ConfigSource {
            name: "built-in defaults".to_string(),
            priority: 4,
        });

        let overridden = settings.apply_env_overrides();
        if !overridden.is_empty() {
            sources.insert(
                0,
                ConfigSource {
                    name: format!("environment ({})", overridden.join(", ")),
                    priority: 0,
                },
            );
        }

        Ok(ResolvedSettings { settings, sources })
    }

    /// Apply `CIVICALERT_*` environment variables; returns the variables used
    pub fn apply_env_overrides(&mut self) -> Vec<&'static str> {
        let mut applied = Vec::new();

        if let Ok(val) = std::env::var("CIVICALERT_TRANSPORT") {
            self.server.transport = val;
            applied.push("CIVICALERT_TRANSPORT");
        }

        if let Ok(val) = std::env::var("CIVICALERT_SOCKET_PATH") {
            self.server.socket_path = Some(val);
            applied.push("CIVICALERT_SOCKET_PATH");
        }

        if let Ok(val) = std::env::var("CIVICALERT_LOG_LEVEL") {
            self.server.log_level = val;
            applied.push("CIVICALERT_LOG_LEVEL");
        }

        if let Ok(val) = std::env::var("CIVICALERT_DEMO_INCIDENTS") {
            match val.parse() {
                Ok(count) => {
                    self.store.demo_incidents = count;
                    applied.push("CIVICALERT_DEMO_INCIDENTS");
                }
                Err(_) => warn!("Ignoring non-numeric CIVICALERT_DEMO_INCIDENTS: {}", val),
            }
        }

        if let Ok(val) = std::env::var("CIVICALERT_SESSION_TTL_MINUTES") {
            match val.parse() {
                Ok(minutes) => {
                    self.auth.session_ttl_minutes = minutes;
                    applied.push("CIVICALERT_SESSION_TTL_MINUTES");
                }
                Err(_) => warn!("Ignoring non-numeric CIVICALERT_SESSION_TTL_MINUTES: {}", val),
            }
        }

        applied
    }

    /// Socket path with the built-in fallback
    pub fn socket_path(&self) -> &str {
        self.server
            .socket_path
            .as_deref()
            .unwrap_or(DEFAULT_SOCKET_PATH)
    }

    pub fn session_ttl(&self) -> Result<chrono::Duration> {
        let minutes = self.auth.session_ttl_minutes;
        if minutes == 0 || minutes > MAX_SESSION_TTL_MINUTES {
            anyhow::bail!(
                "session_ttl_minutes must be between 1 and {}, got {}",
                MAX_SESSION_TTL_MINUTES,
                minutes
            );
        }
        i64::try_from(minutes)
            .ok()
            .and_then(chrono::Duration::try_minutes)
            .context("session_ttl_minutes does not fit in a duration")
    }

    /// Hard errors only; see `ConfigurationValidator` for warnings
    pub fn validate(&self) -> Result<()> {
        match self.server.transport.as_str() {
            "stdio" | "socket" => {}
            other => anyhow::bail!("Invalid transport type: {}. Must be 'stdio' or 'socket'", other),
        }

        self.session_ttl()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = ServerSettings::default();
        assert_eq!(settings.server.transport, "stdio");
        assert_eq!(settings.socket_path(), DEFAULT_SOCKET_PATH);
        assert_eq!(settings.store.demo_incidents, 25);
        assert_eq!(settings.auth.session_ttl_minutes, 480);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let settings: ServerSettings = toml::from_str(
            r#"
            [store]
            demo_incidents = 0
            "#,
        )
        .unwrap();

        assert_eq!(settings.store.demo_incidents, 0);
        assert_eq!(settings.server.transport, "stdio");
        assert_eq!(settings.auth.session_ttl_minutes, 480);
    }

    #[test]
    fn test_inline_json_wins_over_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server]\ntransport = \"socket\"").unwrap();

        let resolved = ServerSettings::load_with_precedence(
            Some(r#"{"auth": {"session_ttl_minutes": 5}}"#),
            Some(file.path()),
        )
        .unwrap();

        assert_eq!(resolved.settings.auth.session_ttl_minutes, 5);
        assert_eq!(resolved.settings.server.transport, "stdio");
        assert!(resolved.sources.iter().any(|s| s.name == "inline JSON"));
    }

    #[test]
    fn test_explicit_file_is_loaded() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\ntransport = \"socket\"\nsocket_path = \"/tmp/other.sock\""
        )
        .unwrap();

        let resolved = ServerSettings::load_with_precedence(None, Some(file.path())).unwrap();
        assert_eq!(resolved.settings.server.transport, "socket");
        assert_eq!(resolved.settings.socket_path(), "/tmp/other.sock");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(ServerSettings::load_with_precedence(None, Some(&missing)).is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_transport() {
        let mut settings = ServerSettings::default();
        settings.server.transport = "carrier-pigeon".to_string();
        assert!(settings.validate().is_err());

        settings.server.transport = "socket".to_string();
        settings.auth.session_ttl_minutes = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_session_ttl_bounds() {
        let mut settings = ServerSettings::default();
        assert_eq!(settings.session_ttl().unwrap(), chrono::Duration::minutes(480));

        settings.auth.session_ttl_minutes = MAX_SESSION_TTL_MINUTES;
        assert!(settings.session_ttl().is_ok());

        for minutes in [MAX_SESSION_TTL_MINUTES + 1, 1_000_000_000_000, u64::MAX] {
            settings.auth.session_ttl_minutes = minutes;
            assert!(settings.session_ttl().is_err());
            assert!(settings.validate().is_err());
        }
    }

    #[test]
    fn test_toml_roundtrip_for_init() {
        let rendered = toml::to_string_pretty(&ServerSettings::default()).unwrap();
        assert!(rendered.contains("[server]"));
        let parsed: ServerSettings = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, ServerSettings::default());
    }
}
