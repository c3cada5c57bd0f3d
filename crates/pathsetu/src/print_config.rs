// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pathsetu config` command implementation.

use pathsetu_config::PathsetuConfig;
use pathsetu_core::PathsetuError;

const MASK: &str = "[redacted]";

/// Prints the effective configuration as TOML with secrets masked.
pub fn run_config(config: &PathsetuConfig) -> Result<(), PathsetuError> {
    println!("{}", render(config)?);
    Ok(())
}

fn render(config: &PathsetuConfig) -> Result<String, PathsetuError> {
    toml::to_string_pretty(&masked(config))
        .map_err(|e| PathsetuError::Internal(format!("failed to render config: {e}")))
}

/// Copy of `config` with every secret replaced by a marker.
///
/// The Gemini key is reported as present when it only comes from the
/// environment.
fn masked(config: &PathsetuConfig) -> PathsetuConfig {
    let mut out = config.clone();
    out.gemini.api_key = config.gemini.resolve_api_key().map(|_| MASK.to_string());
    mask(&mut out.whatsapp.access_token);
    mask(&mut out.whatsapp.app_secret);
    out
}

fn mask(secret: &mut Option<String>) {
    if let Some(value) = secret.as_mut() {
        *value = MASK.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_secrets() -> PathsetuConfig {
        pathsetu_config::load_and_validate_str(
            r#"
[gemini]
api_key = "AIza-secret-key"

[whatsapp]
access_token = "EAAG-secret-token"
phone_number_id = "1055"
app_secret = "shh"
"#,
        )
        .unwrap()
    }

    #[test]
    fn secrets_never_printed() {
        let text = render(&config_with_secrets()).unwrap();
        assert!(!text.contains("AIza-secret-key"));
        assert!(!text.contains("EAAG-secret-token"));
        assert!(!text.contains("shh"));
        assert!(text.contains(MASK));
    }

    #[test]
    fn non_secret_values_survive() {
        let text = render(&config_with_secrets()).unwrap();
        assert!(text.contains("1055"));
        assert!(text.contains("gemini-2.5-flash"));
        assert!(text.contains("[server]"));
    }

    #[test]
    fn unset_secrets_stay_unset() {
        let mut config = config_with_secrets();
        config.whatsapp.app_secret = None;
        assert!(masked(&config).whatsapp.app_secret.is_none());
    }
}
