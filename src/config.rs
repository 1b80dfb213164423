use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Channel the relay reads from.
pub const SOURCE_CHANNEL: &str = "goldmasterclub";
/// Channel rewritten messages are sent to.
pub const TARGET_CHANNEL: &str = "forthgoldtrader";
/// Token substituted for every mention or link in forwarded text.
pub const REPLACEMENT: &str = "@aimanagementteambot";
/// Label of the call-to-action button attached to forwarded messages.
pub const BUTTON_LABEL: &str = "💬 Join Our Bot";
/// Target of the call-to-action button.
pub const BUTTON_URL: &str = "https://t.me/aimanagementteambot";
/// Sent when a source message carries buttons but neither text nor media.
pub const PLACEHOLDER: &str = "📢";
/// Telegram albums hold at most 10 items, so group scans never look further.
pub const ALBUM_LOOKAHEAD: usize = 10;

const DEFAULT_PORT: u16 = 8080;

/// Credentials and listener settings, all supplied through the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_id: i32,
    pub api_hash: String,
    pub session: String,
    pub port: u16,
}

impl Config {
    /// Read the configuration from the process environment. Any missing or
    /// malformed value is fatal: the process must not start serving.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_id = get("API_ID")
            .context("API_ID is not set")?
            .trim()
            .parse::<i32>()
            .context("API_ID must be an integer")?;

        let api_hash = get("API_HASH").context("API_HASH is not set")?;
        if api_hash.is_empty() {
            bail!("API_HASH is empty");
        }

        let session = get("SESSION_STRING").context("SESSION_STRING is not set")?;
        if session.is_empty() {
            bail!("SESSION_STRING is empty");
        }

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .context("PORT must be a port number")?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            api_id,
            api_hash,
            session,
            port,
        })
    }

    /// Decode the base64 session token into raw session bytes.
    pub fn session_bytes(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.session.trim())
            .context("SESSION_STRING is not valid base64")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn parses_complete_environment() {
        let config = Config::from_lookup(lookup(&[
            ("API_ID", "12345"),
            ("API_HASH", "abcdef"),
            ("SESSION_STRING", "c2Vzc2lvbg=="),
            ("PORT", "9000"),
        ]))
        .unwrap();

        assert_eq!(config.api_id, 12345);
        assert_eq!(config.api_hash, "abcdef");
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn port_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[
            ("API_ID", "1"),
            ("API_HASH", "h"),
            ("SESSION_STRING", "c2Vzc2lvbg=="),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
    }

    #[test]
    fn missing_api_id_is_fatal() {
        let result = Config::from_lookup(lookup(&[
            ("API_HASH", "h"),
            ("SESSION_STRING", "s"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn non_numeric_api_id_is_fatal() {
        let result = Config::from_lookup(lookup(&[
            ("API_ID", "not-a-number"),
            ("API_HASH", "h"),
            ("SESSION_STRING", "s"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn empty_session_is_fatal() {
        let result = Config::from_lookup(lookup(&[
            ("API_ID", "1"),
            ("API_HASH", "h"),
            ("SESSION_STRING", ""),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn session_bytes_decodes_base64() {
        let config = Config::from_lookup(lookup(&[
            ("API_ID", "1"),
            ("API_HASH", "h"),
            ("SESSION_STRING", "c2Vzc2lvbg=="),
        ]))
        .unwrap();

        assert_eq!(config.session_bytes().unwrap(), b"session");
    }

    #[test]
    fn session_bytes_rejects_garbage() {
        let config = Config::from_lookup(lookup(&[
            ("API_ID", "1"),
            ("API_HASH", "h"),
            ("SESSION_STRING", "!!! not base64 !!!"),
        ]))
        .unwrap();

        assert!(config.session_bytes().is_err());
    }
}
