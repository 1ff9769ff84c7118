//! Process configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

use spmi_infra::MasterData;

const DEV_JWT_SECRET: &str = "dev-secret";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HS256 secret for session tokens (`JWT_SECRET`).
    pub jwt_secret: String,
    /// Listen address (`BIND_ADDR`).
    pub bind_addr: SocketAddr,
    /// Master-data JSON file (`SPMI_SEED`); built-in demo data when absent.
    pub seed_path: Option<PathBuf>,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (used by `from_env` and tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.trim().is_empty()) {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                DEV_JWT_SECRET.to_string()
            }
        };

        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = raw_addr
            .trim()
            .parse()
            .with_context(|| format!("invalid BIND_ADDR '{raw_addr}'"))?;

        let seed_path = lookup("SPMI_SEED")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            jwt_secret,
            bind_addr,
            seed_path,
        })
    }

    pub fn master_data(&self) -> anyhow::Result<MasterData> {
        match &self.seed_path {
            Some(path) => MasterData::from_path(path)
                .with_context(|| format!("loading master data from {}", path.display())),
            None => {
                tracing::info!("SPMI_SEED not set; using built-in demo master data");
                Ok(MasterData::demo())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.seed_path.is_none());
        assert!(config.master_data().unwrap().users.len() >= 3);
    }

    #[test]
    fn values_are_read_from_the_lookup() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("SPMI_SEED", "/etc/spmi/master.json"),
        ]))
        .unwrap();

        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.seed_path, Some(PathBuf::from("/etc/spmi/master.json")));
    }

    #[test]
    fn bad_bind_addr_is_an_error() {
        let err = ApiConfig::from_lookup(lookup(&[("BIND_ADDR", "nowhere")])).unwrap_err();
        assert!(err.to_string().contains("BIND_ADDR"));
    }
}
