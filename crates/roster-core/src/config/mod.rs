//! Store configuration.
//!
//! `StoreConfig` is injected into [`crate::RecordStore`] at construction. It
//! names the GitHub repository and document that hold submissions, the access
//! token used to write them, and the local slot used as a fallback. Values left
//! at their placeholders route every operation to the fallback slot.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::util::{is_http_url, normalize_text_option};
use crate::{Error, Result};

/// Repository value shipped in the sample configuration.
pub const PLACEHOLDER_REPOSITORY: &str = "your-username/your-repo-name";
/// Token value shipped in the sample configuration.
pub const PLACEHOLDER_TOKEN: &str = "your-github-token";

pub const DEFAULT_DOCUMENT_PATH: &str = "submissions.json";
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_FALLBACK_SLOT: &str = "pokemonSubmissions";
pub const DEFAULT_COMMIT_MESSAGE: &str = "Update submissions data";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

const ENV_REPOSITORY: &str = "ROSTER_GITHUB_REPO";
const ENV_TOKEN: &str = "ROSTER_GITHUB_TOKEN";
const ENV_DOCUMENT_PATH: &str = "ROSTER_DATA_FILE";
const ENV_API_BASE_URL: &str = "ROSTER_API_BASE_URL";
const ENV_FALLBACK_SLOT: &str = "ROSTER_FALLBACK_SLOT";
const ENV_HTTP_TIMEOUT_SECS: &str = "ROSTER_HTTP_TIMEOUT_SECS";

/// Where submissions live and how to reach them.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Repository in `owner/name` form.
    pub repository: String,
    /// Personal access token sent as `Authorization: token ...`.
    pub token: String,
    /// Path of the JSON document inside the repository.
    pub document_path: String,
    /// Base URL of the contents API (GitHub Enterprise installs differ).
    pub api_base_url: String,
    /// Name of the local fallback slot.
    pub fallback_slot: String,
    /// Commit message attached to every remote write.
    pub commit_message: String,
    /// Per-request timeout for remote calls.
    pub request_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            repository: PLACEHOLDER_REPOSITORY.to_string(),
            token: PLACEHOLDER_TOKEN.to_string(),
            document_path: DEFAULT_DOCUMENT_PATH.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            fallback_slot: DEFAULT_FALLBACK_SLOT.to_string(),
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("StoreConfig")
            .field("repository", &self.repository)
            .field("token", &"[REDACTED]")
            .field("document_path", &self.document_path)
            .field("api_base_url", &self.api_base_url)
            .field("fallback_slot", &self.fallback_slot)
            .field("commit_message", &self.commit_message)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl StoreConfig {
    /// Configuration for a repository and token, with defaults elsewhere.
    #[must_use]
    pub fn new(repository: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            repository: repository.into().trim().to_string(),
            token: token.into().trim().to_string(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Unset variables keep their defaults, so an empty environment yields the
    /// placeholder configuration and a local-only store.
    pub fn from_env() -> Result<Self> {
        parse_config(|key| env::var(key).ok())
    }

    /// Whether remote persistence has been configured.
    ///
    /// False when either the repository or the token is still the shipped
    /// placeholder, or blank.
    pub fn is_remote_configured(&self) -> bool {
        let repository = self.repository.trim();
        let token = self.token.trim();
        !(repository.is_empty()
            || token.is_empty()
            || repository == PLACEHOLDER_REPOSITORY
            || token == PLACEHOLDER_TOKEN)
    }
}

fn parse_config(lookup: impl Fn(&str) -> Option<String>) -> Result<StoreConfig> {
    let defaults = StoreConfig::default();

    let repository =
        normalize_text_option(lookup(ENV_REPOSITORY)).unwrap_or(defaults.repository);
    let token = normalize_text_option(lookup(ENV_TOKEN)).unwrap_or(defaults.token);
    let document_path = normalize_text_option(lookup(ENV_DOCUMENT_PATH))
        .map(|path| path.trim_matches('/').to_string())
        .filter(|path| !path.is_empty())
        .unwrap_or(defaults.document_path);
    let fallback_slot =
        normalize_text_option(lookup(ENV_FALLBACK_SLOT)).unwrap_or(defaults.fallback_slot);

    let api_base_url = match normalize_text_option(lookup(ENV_API_BASE_URL)) {
        Some(url) if is_http_url(&url) => url.trim_end_matches('/').to_string(),
        Some(_) => {
            return Err(Error::InvalidInput(format!(
                "{ENV_API_BASE_URL} must start with http:// or https://"
            )));
        }
        None => defaults.api_base_url,
    };

    let request_timeout = match normalize_text_option(lookup(ENV_HTTP_TIMEOUT_SECS)) {
        Some(raw) => match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                return Err(Error::InvalidInput(format!(
                    "{ENV_HTTP_TIMEOUT_SECS} must be a positive number of seconds"
                )));
            }
        },
        None => defaults.request_timeout,
    };

    Ok(StoreConfig {
        repository,
        token,
        document_path,
        api_base_url,
        fallback_slot,
        commit_message: defaults.commit_message,
        request_timeout,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn parse_from_map(map: &HashMap<&str, &str>) -> Result<StoreConfig> {
        parse_config(|key| map.get(key).map(|value| (*value).to_string()))
    }

    #[test]
    fn empty_environment_yields_placeholder_config() {
        let config = parse_from_map(&HashMap::new()).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert!(!config.is_remote_configured());
    }

    #[test]
    fn placeholder_repository_or_token_is_unconfigured() {
        assert!(!StoreConfig::new(PLACEHOLDER_REPOSITORY, "ghp_real").is_remote_configured());
        assert!(!StoreConfig::new("ash/pallet-town", PLACEHOLDER_TOKEN).is_remote_configured());
        assert!(!StoreConfig::new("ash/pallet-town", "   ").is_remote_configured());
        assert!(StoreConfig::new("ash/pallet-town", "ghp_real").is_remote_configured());
    }

    #[test]
    fn parse_config_reads_values_and_normalizes() {
        let mut map = HashMap::new();
        map.insert(ENV_REPOSITORY, " ash/pallet-town ");
        map.insert(ENV_TOKEN, "ghp_secret");
        map.insert(ENV_DOCUMENT_PATH, "/data/trainers.json");
        map.insert(ENV_API_BASE_URL, "https://github.example.com/api/v3/");
        map.insert(ENV_FALLBACK_SLOT, "trainers");
        map.insert(ENV_HTTP_TIMEOUT_SECS, "3");

        let config = parse_from_map(&map).unwrap();
        assert_eq!(config.repository, "ash/pallet-town");
        assert_eq!(config.document_path, "data/trainers.json");
        assert_eq!(config.api_base_url, "https://github.example.com/api/v3");
        assert_eq!(config.fallback_slot, "trainers");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert!(config.is_remote_configured());
    }

    #[test]
    fn parse_config_rejects_invalid_api_base_url() {
        let mut map = HashMap::new();
        map.insert(ENV_API_BASE_URL, "api.github.com");

        let err = parse_from_map(&map).unwrap_err();
        match err {
            Error::InvalidInput(message) => assert!(message.contains(ENV_API_BASE_URL)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_config_rejects_invalid_timeout() {
        for raw in ["0", "soon"] {
            let mut map = HashMap::new();
            map.insert(ENV_HTTP_TIMEOUT_SECS, raw);
            assert!(matches!(
                parse_from_map(&map),
                Err(Error::InvalidInput(message)) if message.contains(ENV_HTTP_TIMEOUT_SECS)
            ));
        }
    }

    #[test]
    fn debug_redacts_token() {
        let config = StoreConfig::new("ash/pallet-town", "ghp_secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    #[ignore = "Requires ROSTER_* env vars in process environment or .env"]
    fn from_env_loads_real_config() {
        let _ = dotenvy::dotenv();

        let config = StoreConfig::from_env().expect("env parsing should not error");
        assert!(config.is_remote_configured());
        assert!(config.repository.contains('/'));
    }
}
