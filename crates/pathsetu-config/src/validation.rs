// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express. All failures are
//! collected; validation never stops at the first one.

use crate::diagnostic::ConfigError;
use crate::model::{DIAGRAM_PAYLOAD_PLACEHOLDER, PathsetuConfig};

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &PathsetuConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let addr = config.server.bind_address.trim();
    if addr.is_empty() {
        fail("server.bind_address must not be empty".to_string());
    } else {
        let is_valid_ip = addr.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = addr
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "server.bind_address `{addr}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.storage.max_history_records == Some(0) {
        fail("storage.max_history_records must be at least 1 when set".to_string());
    }

    if config.gemini.models.is_empty() {
        fail("gemini.models must list at least one model".to_string());
    }
    for (i, model) in config.gemini.models.iter().enumerate() {
        if model.trim().is_empty() {
            fail(format!("gemini.models[{i}] must not be blank"));
        }
    }

    let temperature = config.gemini.temperature;
    if !(0.0..=2.0).contains(&temperature) {
        fail(format!(
            "gemini.temperature must be between 0.0 and 2.0, got {temperature}"
        ));
    }

    if config.gemini.timeout_secs == 0 {
        fail("gemini.timeout_secs must be greater than 0".to_string());
    }

    if !config
        .diagram
        .render_url_template
        .contains(DIAGRAM_PAYLOAD_PLACEHOLDER)
    {
        fail(format!(
            "diagram.render_url_template must contain `{DIAGRAM_PAYLOAD_PLACEHOLDER}`"
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(result: Result<(), Vec<ConfigError>>) -> Vec<String> {
        result
            .err()
            .unwrap_or_default()
            .iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&PathsetuConfig::default()).is_ok());
    }

    #[test]
    fn empty_model_list_is_rejected() {
        let mut config = PathsetuConfig::default();
        config.gemini.models.clear();
        let msgs = messages(validate_config(&config));
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("gemini.models"));
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = PathsetuConfig::default();
        config.server.bind_address = "not a host!".into();
        config.storage.database_path = "  ".into();
        config.gemini.temperature = 3.5;
        config.gemini.timeout_secs = 0;
        config.diagram.render_url_template = "https://example.com/img".into();
        let msgs = messages(validate_config(&config));
        assert_eq!(msgs.len(), 5, "got: {msgs:?}");
    }

    #[test]
    fn blank_model_name_reports_index() {
        let mut config = PathsetuConfig::default();
        config.gemini.models = vec!["gemini-1.5-pro".into(), " ".into()];
        let msgs = messages(validate_config(&config));
        assert!(msgs[0].contains("gemini.models[1]"));
    }
}
