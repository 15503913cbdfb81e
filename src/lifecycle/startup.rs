//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Report HMRC settings that will make header builds fail
//!
//! # Design Decisions
//! - Fail fast on an invalid config file
//! - An incomplete HMRC setup only warns: settings may be filled in and hot-reloaded

use std::path::Path;

use crate::config::{load_config, AppConfig, ConfigError};

/// Load the config file if given, otherwise use defaults.
pub fn load_startup_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(AppConfig::default()),
    }
}

/// Human readable problems with the HMRC settings.
pub fn setup_warnings(config: &AppConfig) -> Vec<&'static str> {
    let mut warnings = Vec::new();
    let guid_set = config
        .hmrc
        .installation_guid
        .as_deref()
        .is_some_and(|g| !g.trim().is_empty());
    if !guid_set {
        warnings.push("hmrc.installation_guid is not set; header builds will fail");
    }
    if config.hmrc.public_ip.is_none() && !config.hmrc.gov_ip_headers {
        warnings.push("hmrc.public_ip is not set; Gov-Vendor-Public-IP will not be sent");
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_warns() {
        let warnings = setup_warnings(&AppConfig::default());
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_complete_setup_is_quiet() {
        let mut config = AppConfig::default();
        config.hmrc.installation_guid = Some("guid".into());
        config.hmrc.public_ip = Some("203.0.113.6".into());
        assert!(setup_warnings(&config).is_empty());
    }

    #[test]
    fn test_no_path_uses_defaults() {
        let config = load_startup_config(None).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }
}
