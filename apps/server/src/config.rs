use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;
use homebook_core::instance::SetupPreConfiguration;

pub struct Config {
    pub listen_addr: SocketAddr,
    /// Directory holding the instance marker files.
    pub data_dir: PathBuf,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Base64 JWT signing key. A random key is generated when unset, which
    /// invalidates tokens on every restart.
    pub secret_key: Option<String>,
    pub token_ttl: Duration,
    pub setup: SetupPreConfiguration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen_addr: SocketAddr = var("HB_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid HB_LISTEN_ADDR")?;
        let data_dir = PathBuf::from(var("HB_DATA_DIR").unwrap_or_else(|| "./data".into()));
        let db_path = var("HB_DB_PATH")
            .unwrap_or_else(|| data_dir.join("homebook.db").to_string_lossy().to_string());
        let cors_allow = var("HB_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = var("HB_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|| "30000".into())
            .parse()
            .context("Invalid HB_REQUEST_TIMEOUT_MS")?;
        let token_ttl_secs: u64 = var("HB_TOKEN_TTL_SECS")
            .unwrap_or_else(|| "86400".into())
            .parse()
            .context("Invalid HB_TOKEN_TTL_SECS")?;
        let licenses_accepted = var("HB_SETUP_LICENSES_ACCEPTED")
            .map(|v| parse_bool(&v))
            .transpose()
            .context("Invalid HB_SETUP_LICENSES_ACCEPTED")?;

        Ok(Self {
            listen_addr,
            data_dir,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            secret_key: var("HB_SECRET_KEY"),
            token_ttl: Duration::from_secs(token_ttl_secs),
            setup: SetupPreConfiguration {
                instance_name: var("HB_SETUP_INSTANCE_NAME"),
                admin_username: var("HB_SETUP_ADMIN_USERNAME"),
                admin_password: lookup("HB_SETUP_ADMIN_PASSWORD").filter(|v| !v.is_empty()),
                default_locale: var("HB_SETUP_DEFAULT_LOCALE"),
                licenses_accepted,
            },
        })
    }
}

fn parse_bool(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert!(config.db_path.ends_with("homebook.db"));
        assert_eq!(config.cors_allow, vec!["*"]);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.token_ttl, Duration::from_secs(86400));
        assert!(config.secret_key.is_none());
        assert!(config.setup.admin_username.is_none());
    }

    #[test]
    fn test_setup_pre_configuration() {
        let config = config_from(&[
            ("HB_DATA_DIR", "/srv/homebook"),
            ("HB_SETUP_ADMIN_USERNAME", "admin"),
            ("HB_SETUP_ADMIN_PASSWORD", "s3cret-pass"),
            ("HB_SETUP_LICENSES_ACCEPTED", "yes"),
            ("HB_CORS_ALLOW_ORIGINS", "https://a.example, https://b.example"),
        ])
        .unwrap();
        assert_eq!(config.db_path, "/srv/homebook/homebook.db");
        assert_eq!(config.setup.admin_username.as_deref(), Some("admin"));
        assert_eq!(config.setup.admin_password.as_deref(), Some("s3cret-pass"));
        assert_eq!(config.setup.licenses_accepted, Some(true));
        assert_eq!(config.cors_allow.len(), 2);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config_from(&[("HB_LISTEN_ADDR", "nowhere")]).is_err());
        assert!(config_from(&[("HB_REQUEST_TIMEOUT_MS", "soon")]).is_err());
        assert!(config_from(&[("HB_SETUP_LICENSES_ACCEPTED", "maybe")]).is_err());
    }
}
