// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `/etc/pathsetu/pathsetu.toml`, then
//! `~/.config/pathsetu/pathsetu.toml`, then `./pathsetu.toml`. Environment
//! variables come last: the unprefixed `WHATSAPP_TOKEN`, `PHONE_NUMBER_ID`
//! and `PORT`, then `PATHSETU_*`.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PathsetuConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/pathsetu/pathsetu.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "pathsetu.toml";

/// Top-level sections recognised in `PATHSETU_<SECTION>_<KEY>` variables.
const ENV_SECTIONS: &[&str] = &["agent", "gemini", "whatsapp", "storage", "server", "diagram"];

/// Unprefixed variables read by earlier deployments, with their config keys.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("whatsapp_token", "whatsapp.access_token"),
    ("phone_number_id", "whatsapp.phone_number_id"),
    ("port", "server.port"),
];

/// Returns the per-user config file path, if a config dir exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pathsetu").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. [`SYSTEM_CONFIG_PATH`]
/// 3. [`user_config_path`]
/// 4. `./pathsetu.toml`
/// 5. `WHATSAPP_TOKEN`, `PHONE_NUMBER_ID`, `PORT`
/// 6. `PATHSETU_*` environment variables
pub fn load_config() -> Result<PathsetuConfig, figment::Error> {
    build_figment().extract()
}

/// Build the layered Figment without extracting it.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PathsetuConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(legacy_env_provider())
        .merge(env_provider())
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PathsetuConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PathsetuConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PathsetuConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PathsetuConfig::default()))
        .merge(Toml::file(path))
        .merge(legacy_env_provider())
        .merge(env_provider())
        .extract()
}

/// Environment provider mapping `PATHSETU_WHATSAPP_ACCESS_TOKEN` to
/// `whatsapp.access_token`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// keys that themselves contain underscores stay intact.
fn env_provider() -> Env {
    Env::prefixed("PATHSETU_").map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

/// Environment provider for the unprefixed [`LEGACY_ENV_KEYS`].
fn legacy_env_provider() -> Env {
    let names: Vec<&str> = LEGACY_ENV_KEYS.iter().map(|(name, _)| *name).collect();
    Env::raw()
        .only(&names)
        .map(|key| map_legacy_env_key(&key.as_str().to_ascii_lowercase()).into())
}

fn map_legacy_env_key(key: &str) -> String {
    LEGACY_ENV_KEYS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, path)| (*path).to_string())
        .unwrap_or_else(|| key.to_string())
}

fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
