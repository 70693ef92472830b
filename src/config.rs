//! Application-level configuration: target instant, admin passcode,
//! banned-word list, and viewer-count tuning.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339, macros::datetime};
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "MIDNIGHT_BACK_CONFIG_PATH";
/// Environment variable that overrides the configured admin passcode.
const ADMIN_PASSCODE_ENV: &str = "MIDNIGHT_BACK_ADMIN_PASSCODE";

/// Built-in target: midnight, New Year 2026, UTC+7. Timezone-qualified so
/// every client counts down to the same instant.
const DEFAULT_TARGET: OffsetDateTime = datetime!(2026-01-01 00:00 +7);
/// Shared static passcode gating the admin surface. Not a security
/// boundary; override it via config or environment.
const DEFAULT_ADMIN_PASSCODE: &str = "bbv2026";
/// Starting value of the viewer-count random walk.
const DEFAULT_VIEWER_SEED: u32 = 124;
/// Lower bound of the viewer-count random walk.
const DEFAULT_VIEWER_FLOOR: u32 = 100;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    target: OffsetDateTime,
    admin_passcode: String,
    banned_words: Vec<String>,
    viewer_seed: u32,
    viewer_floor: u32,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to
    /// built-in defaults field by field.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        target = %config.target,
                        banned_words = config.banned_words.len(),
                        "loaded configuration"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        config.with_env_overrides()
    }

    /// The instant the countdown runs toward when no override is active.
    pub fn default_target(&self) -> OffsetDateTime {
        self.target
    }

    /// Shared static passcode expected on admin requests.
    pub fn admin_passcode(&self) -> &str {
        &self.admin_passcode
    }

    /// Starting value of the viewer-count walk.
    pub fn viewer_seed(&self) -> u32 {
        self.viewer_seed
    }

    /// Lower bound of the viewer-count walk.
    pub fn viewer_floor(&self) -> u32 {
        self.viewer_floor
    }

    /// Return the first banned word contained in `message`, if any.
    ///
    /// Matching is case-insensitive substring search, so spaced-out or
    /// embedded variants listed verbatim still match.
    pub fn find_banned_word(&self, message: &str) -> Option<&str> {
        let lowered = message.to_lowercase();
        self.banned_words
            .iter()
            .find(|word| lowered.contains(word.as_str()))
            .map(String::as_str)
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(passcode) = env::var(ADMIN_PASSCODE_ENV)
            && !passcode.is_empty()
        {
            self.admin_passcode = passcode;
        }
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET,
            admin_passcode: DEFAULT_ADMIN_PASSCODE.to_string(),
            banned_words: default_banned_words(),
            viewer_seed: DEFAULT_VIEWER_SEED,
            viewer_floor: DEFAULT_VIEWER_FLOOR,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    /// RFC 3339 target instant, e.g. `"2026-01-01T00:00:00+07:00"`.
    target: Option<String>,
    admin_passcode: Option<String>,
    banned_words: Option<Vec<String>>,
    viewer_seed: Option<u32>,
    viewer_floor: Option<u32>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let target = value
            .target
            .as_deref()
            .and_then(|raw| match OffsetDateTime::parse(raw, &Rfc3339) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warn!(raw, error = %err, "invalid target in config; using default");
                    None
                }
            })
            .unwrap_or(DEFAULT_TARGET);

        let banned_words = value
            .banned_words
            .map(|words| {
                words
                    .into_iter()
                    .map(|word| word.to_lowercase())
                    .filter(|word| !word.is_empty())
                    .collect()
            })
            .unwrap_or_else(default_banned_words);

        Self {
            target,
            admin_passcode: value
                .admin_passcode
                .filter(|passcode| !passcode.is_empty())
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSCODE.to_string()),
            banned_words,
            viewer_seed: value.viewer_seed.unwrap_or(DEFAULT_VIEWER_SEED),
            viewer_floor: value.viewer_floor.unwrap_or(DEFAULT_VIEWER_FLOOR),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in banned-word list shipped with the binary, stored lowercase.
fn default_banned_words() -> Vec<String> {
    [
        // Thai
        "ควย",
        "หี",
        "แตด",
        "เย็ด",
        "เยด",
        "เหี้ย",
        "เชี่ย",
        "สัส",
        "ไอ้สัส",
        "ไอ้สัตว์",
        "สัตว์",
        "สัด",
        "แม่ง",
        "พ่อง",
        "แม่มึง",
        "ไอ้ควาย",
        "อีควาย",
        "ไอ้โง่",
        "อีโง่",
        "ดอกทอง",
        "ระยำ",
        "จัญไร",
        "ตอแหล",
        "กะหรี่",
        "ส้นตีน",
        // English
        "fuck",
        "fucker",
        "motherfucker",
        "shit",
        "bullshit",
        "bitch",
        "slut",
        "whore",
        "cunt",
        "dick",
        "cock",
        "pussy",
        "asshole",
        "bastard",
        // Transliterations and evasions
        "kuy",
        "kuay",
        "hee",
        "yed",
        "hia",
        "mueng",
        "doktong",
        "torlae",
        "f u c k",
        "xxx",
        "porn",
        "xnxx",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_published_event() {
        let config = AppConfig::default();
        assert_eq!(config.default_target(), datetime!(2025-12-31 17:00 UTC));
        assert_eq!(config.admin_passcode(), "bbv2026");
        assert_eq!(config.viewer_seed(), 124);
        assert_eq!(config.viewer_floor(), 100);
    }

    #[test]
    fn banned_word_match_is_case_insensitive_substring() {
        let config = AppConfig::default();
        assert_eq!(config.find_banned_word("well FuCk that"), Some("fuck"));
        // "หี" is listed before "เหี้ย" and is contained in it, so the
        // shorter word is the reported match.
        assert_eq!(config.find_banned_word("ปีใหม่เหี้ยๆ"), Some("หี"));
        assert!(config.find_banned_word("happy new year").is_none());
    }

    #[test]
    fn raw_config_overrides_take_effect() {
        let raw: RawConfig = serde_json::from_str(
            r#"{
                "target": "2027-01-01T00:00:00+07:00",
                "admin_passcode": "opensesame",
                "banned_words": ["Gloom"],
                "viewer_floor": 50
            }"#,
        )
        .unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.default_target().year(), 2027);
        assert_eq!(config.admin_passcode(), "opensesame");
        assert_eq!(config.find_banned_word("GLOOMY"), Some("gloom"));
        assert_eq!(config.viewer_floor(), 50);
        assert_eq!(config.viewer_seed(), 124);
    }

    #[test]
    fn invalid_target_string_falls_back_to_default() {
        let raw: RawConfig = serde_json::from_str(r#"{"target": "next tuesday"}"#).unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.default_target(), DEFAULT_TARGET);
    }
}
