use std::{
    fmt,
    net::IpAddr,
    path::{Path, PathBuf},
};

use anyhow::Context;
use config::{File, FileFormat};
use innube_utils::non_empty;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Colon separated list of config files, later files take precedence.
pub const CONFIG_PATHS_ENV: &str = "INNUBE_CONFIG_PATHS";

/// Environment variable holding the email provider api key.
pub const API_KEY_ENV: &str = "RESEND_API_KEY";

/// Load the config from the files listed in [`CONFIG_PATHS_ENV`] (or the
/// default config file) and the api key from [`API_KEY_ENV`].
pub fn load() -> anyhow::Result<Config> {
    let paths = match std::env::var_os(CONFIG_PATHS_ENV) {
        Some(paths) => std::env::split_paths(&paths).collect::<Vec<_>>(),
        None => vec![PathBuf::from(DEFAULT_CONFIG_PATH)],
    };
    let mut config = load_with_override(paths.as_slice(), &[])?;
    apply_api_key_env(&mut config, std::env::var(API_KEY_ENV).ok());

    Ok(config)
}

/// A set [`API_KEY_ENV`] takes precedence over `email.api_key`; set but empty
/// means no key.
fn apply_api_key_env(config: &mut Config, value: Option<String>) {
    if let Some(value) = value {
        config.email.api_key = non_empty(value).map(ApiKey);
    }
}

/// Load the config from the given files, then apply the inline toml
/// `overrides` in order.
pub fn load_with_override(
    paths: &[impl AsRef<Path>],
    overrides: &[&str],
) -> anyhow::Result<Config> {
    let builder = paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?;

    overrides
        .iter()
        .fold(builder, |builder, &snippet| {
            builder.add_source(File::from_str(snippet, FileFormat::Toml))
        })
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Origins that receive an `Access-Control-Allow-Origin` header.
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    /// Sender mailbox, e.g. `Innube Contacto <onboarding@resend.dev>`.
    pub from: String,
    /// Base url of the Resend api.
    pub endpoint: Url,
    #[serde(default, deserialize_with = "deserialize_api_key")]
    pub api_key: Option<ApiKey>,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub recipient: String,
}

/// Secret that is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(pub String);

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

fn deserialize_api_key<'de, D>(deserializer: D) -> Result<Option<ApiKey>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .and_then(non_empty)
        .map(ApiKey))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_paths() -> [&'static Path; 1] {
        [Path::new(DEFAULT_CONFIG_PATH)]
    }

    #[test]
    fn load_default_config() {
        let config = load_with_override(&default_paths(), &[]).unwrap();

        assert_eq!(
            config.http.allowed_origins,
            [
                "http://localhost:4200",
                "http://127.0.0.1:4200",
                "https://www.innubesoluciones.com",
                "https://innubesoluciones.com",
            ]
        );
        assert_eq!(config.email.from, "Innube Contacto <onboarding@resend.dev>");
        assert_eq!(config.email.endpoint.as_str(), "https://api.resend.com/");
        assert_eq!(config.email.api_key, None);
        assert_eq!(config.contact.recipient, "fgomezes979@gmail.com");
    }

    #[test]
    fn override_values() {
        let config = load_with_override(
            &default_paths(),
            &[
                "http.port = 9000",
                "[email]\napi_key = \"re_123\"\nendpoint = \"http://127.0.0.1:8001\"",
            ],
        )
        .unwrap();

        assert_eq!(config.http.port, 9000);
        assert_eq!(config.email.api_key, Some(ApiKey("re_123".into())));
        assert_eq!(config.email.endpoint.as_str(), "http://127.0.0.1:8001/");
        assert_eq!(config.contact.recipient, "fgomezes979@gmail.com");
    }

    #[test]
    fn empty_api_key_is_absent() {
        let config =
            load_with_override(&default_paths(), &["email.api_key = \"\""]).unwrap();

        assert_eq!(config.email.api_key, None);
    }

    #[test]
    fn api_key_env() {
        let with_key = || {
            load_with_override(&default_paths(), &["email.api_key = \"re_file\""]).unwrap()
        };

        let mut config = with_key();
        apply_api_key_env(&mut config, None);
        assert_eq!(config.email.api_key, Some(ApiKey("re_file".into())));

        let mut config = with_key();
        apply_api_key_env(&mut config, Some("re_env".into()));
        assert_eq!(config.email.api_key, Some(ApiKey("re_env".into())));

        let mut config = with_key();
        apply_api_key_env(&mut config, Some(String::new()));
        assert_eq!(config.email.api_key, None);
    }

    #[test]
    fn api_key_is_redacted() {
        let key = ApiKey("re_secret".into());
        assert_eq!(format!("{key:?}"), "ApiKey([REDACTED])");
    }

    #[test]
    fn missing_file() {
        let result = load_with_override(&[Path::new("/nonexistent/config.toml")], &[]);
        assert!(result.is_err());
    }
}
