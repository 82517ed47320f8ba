use anyhow::{Context, Result, bail};
use std::path::PathBuf;

const DEFAULT_CONFIG_FILE: &str = "config.json";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_PRESENCE: &str = "server boosts";

/// Process settings read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct Settings {
    pub token: String,
    pub config_file: PathBuf,
    pub port: u16,
    pub presence_text: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = match lookup("DISCORD_TOKEN").or_else(|| lookup("TOKEN")) {
            Some(token) if !token.trim().is_empty() => token,
            _ => bail!("DISCORD_TOKEN is not set (checked DISCORD_TOKEN and TOKEN)"),
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a port number, got {:?}", raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            token,
            config_file: lookup("CONFIG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
            port,
            presence_text: lookup("PRESENCE_TEXT").unwrap_or_else(|| DEFAULT_PRESENCE.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let settings = Settings::from_lookup(lookup_from(&[("DISCORD_TOKEN", "abc")])).unwrap();

        assert_eq!(settings.token, "abc");
        assert_eq!(settings.config_file, PathBuf::from("config.json"));
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.presence_text, "server boosts");
    }

    #[test]
    fn legacy_token_name_is_accepted() {
        let settings = Settings::from_lookup(lookup_from(&[("TOKEN", "xyz")])).unwrap();
        assert_eq!(settings.token, "xyz");
    }

    #[test]
    fn missing_token_is_an_error() {
        assert!(Settings::from_lookup(lookup_from(&[])).is_err());
        assert!(Settings::from_lookup(lookup_from(&[("DISCORD_TOKEN", "  ")])).is_err());
    }

    #[test]
    fn overrides_are_read() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("PORT", "3000"),
            ("CONFIG_FILE", "data/boost.json"),
            ("PRESENCE_TEXT", "boosters"),
        ]))
        .unwrap();

        assert_eq!(settings.port, 3000);
        assert_eq!(settings.config_file, PathBuf::from("data/boost.json"));
        assert_eq!(settings.presence_text, "boosters");
    }

    #[test]
    fn bad_port_is_an_error() {
        let result = Settings::from_lookup(lookup_from(&[("DISCORD_TOKEN", "a"), ("PORT", "http")]));
        assert!(result.is_err());
    }
}
