//! Configuration validation for the CivicAlert server

use anyhow::Result;
use std::path::Path;
use tracing::{error, info, warn};

use crate::config::settings::{
    AuthSettings, ServerSection, ServerSettings, StoreSettings, MAX_SESSION_TTL_MINUTES,
};

const MAX_REASONABLE_TTL_MINUTES: u64 = 7 * 24 * 60;
const MAX_REASONABLE_DEMO_INCIDENTS: usize = 10_000;

/// Collects configuration errors and warnings
pub struct ConfigurationValidator {
    /// Whether to perform strict validation (fails on warnings)
    strict_mode: bool,
    warnings: Vec<String>,
    errors: Vec<String>,
}

impl ConfigurationValidator {
    pub fn new(strict_mode: bool) -> Self {
        Self {
            strict_mode,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Validate complete configuration
    pub fn validate_settings(&mut self, settings: &ServerSettings) -> Result<()> {
        info!("Starting configuration validation");

        self.validate_server_section(&settings.server);
        self.validate_store_settings(&settings.store);
        self.validate_auth_settings(&settings.auth);

        self.print_validation_summary();

        if !self.errors.is_empty() {
            return Err(anyhow::anyhow!(
                "Configuration validation failed with {} errors",
                self.errors.len()
            ));
        }

        if self.strict_mode && !self.warnings.is_empty() {
            return Err(anyhow::anyhow!(
                "Configuration validation failed in strict mode with {} warnings",
                self.warnings.len()
            ));
        }

        info!("Configuration validation passed");
        Ok(())
    }

    fn validate_server_section(&mut self, server: &ServerSection) {
        match server.transport.as_str() {
            "stdio" => {}
            "socket" => match &server.socket_path {
                None => self
                    .errors
                    .push("Socket transport requires socket_path to be set".to_string()),
                Some(path) => {
                    if let Some(parent) = Path::new(path).parent() {
                        if !parent.as_os_str().is_empty() && !parent.exists() {
                            self.warnings.push(format!(
                                "Socket path parent directory does not exist: {}",
                                parent.display()
                            ));
                        }
                    }
                }
            },
            other => self.errors.push(format!(
                "Invalid transport type: {}. Must be 'stdio' or 'socket'",
                other
            )),
        }

        match server.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => self.warnings.push(format!(
                "Non-standard log level: {}. Recommended: trace, debug, info, warn, error",
                other
            )),
        }
    }

    fn validate_store_settings(&mut self, store: &StoreSettings) {
        if store.demo_incidents > MAX_REASONABLE_DEMO_INCIDENTS {
            self.warnings.push(format!(
                "demo_incidents is very high ({}). Startup and stats will be slow",
                store.demo_incidents
            ));
        }
    }

    fn validate_auth_settings(&mut self, auth: &AuthSettings) {
        if auth.session_ttl_minutes == 0 {
            self.errors
                .push("session_ttl_minutes must be greater than 0".to_string());
        } else if auth.session_ttl_minutes > MAX_SESSION_TTL_MINUTES {
            self.errors.push(format!(
                "session_ttl_minutes ({}) exceeds the maximum of {}",
                auth.session_ttl_minutes, MAX_SESSION_TTL_MINUTES
            ));
        } else if auth.session_ttl_minutes > MAX_REASONABLE_TTL_MINUTES {
            self.warnings.push(format!(
                "session_ttl_minutes is very long ({}). Staff sessions outlive a week",
                auth.session_ttl_minutes
            ));
        }
    }

    fn print_validation_summary(&self) {
        if !self.warnings.is_empty() {
            warn!("Configuration warnings ({}):", self.warnings.len());
            for (i, warning) in self.warnings.iter().enumerate() {
                warn!("  {}: {}", i + 1, warning);
            }
        }

        if !self.errors.is_empty() {
            error!("Configuration errors ({}):", self.errors.len());
            for (i, error) in self.errors.iter().enumerate() {
                error!("  {}: {}", i + 1, error);
            }
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

/// Quick validation function for use in the CLI
pub fn validate_configuration(settings: &ServerSettings, strict: bool) -> Result<()> {
    let mut validator = ConfigurationValidator::new(strict);
    validator.validate_settings(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_configuration() {
        let settings = ServerSettings::default();
        let mut validator = ConfigurationValidator::new(true);

        assert!(validator.validate_settings(&settings).is_ok());
        assert!(validator.warnings().is_empty());
    }

    #[test]
    fn test_invalid_transport() {
        let mut settings = ServerSettings::default();
        settings.server.transport = "invalid".to_string();

        let mut validator = ConfigurationValidator::new(false);
        assert!(validator.validate_settings(&settings).is_err());
        assert_eq!(validator.errors().len(), 1);
    }

    #[test]
    fn test_socket_without_path() {
        let mut settings = ServerSettings::default();
        settings.server.transport = "socket".to_string();
        settings.server.socket_path = None;

        assert!(validate_configuration(&settings, false).is_err());
    }

    #[test]
    fn test_zero_ttl_is_error() {
        let mut settings = ServerSettings::default();
        settings.auth.session_ttl_minutes = 0;

        let mut validator = ConfigurationValidator::new(false);
        assert!(validator.validate_settings(&settings).is_err());
        assert!(validator.errors()[0].contains("session_ttl_minutes"));
    }

    #[test]
    fn test_oversized_ttl_is_error() {
        let mut settings = ServerSettings::default();
        settings.auth.session_ttl_minutes = 1_000_000_000_000;

        let mut validator = ConfigurationValidator::new(false);
        assert!(validator.validate_settings(&settings).is_err());
        assert_eq!(validator.errors().len(), 1);
        assert!(validator.warnings().is_empty());
    }

    #[test]
    fn test_strict_mode_warnings() {
        let mut settings = ServerSettings::default();
        settings.server.log_level = "chatty".to_string();

        let mut validator = ConfigurationValidator::new(true);
        assert!(validator.validate_settings(&settings).is_err());
        assert!(!validator.warnings().is_empty());
    }

    #[test]
    fn test_lenient_mode_warnings() {
        let mut settings = ServerSettings::default();
        settings.auth.session_ttl_minutes = MAX_REASONABLE_TTL_MINUTES + 1;
        settings.store.demo_incidents = MAX_REASONABLE_DEMO_INCIDENTS + 1;

        let mut validator = ConfigurationValidator::new(false);
        assert!(validator.validate_settings(&settings).is_ok());
        assert_eq!(validator.warnings().len(), 2);
    }
}
