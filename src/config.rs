use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_DB: &str = "eventsync.db";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
}

impl AppConfig {
    /// Build the configuration from `EVENTSYNC_ADDR` and `EVENTSYNC_DB`,
    /// falling back to the defaults when unset, empty, or unparsable.
    pub fn from_env() -> Self {
        let bind_addr = match env_trimmed("EVENTSYNC_ADDR") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("invalid EVENTSYNC_ADDR {raw:?} ({e}), using {DEFAULT_ADDR}");
                default_addr()
            }),
            None => default_addr(),
        };

        let db_path = env_trimmed("EVENTSYNC_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB));

        Self { bind_addr, db_path }
    }
}

fn default_addr() -> SocketAddr {
    DEFAULT_ADDR.parse().expect("default address is valid")
}

fn env_trimmed(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_env() {
        std::env::remove_var("EVENTSYNC_ADDR");
        std::env::remove_var("EVENTSYNC_DB");

        let config = AppConfig::from_env();
        assert_eq!(config.bind_addr, default_addr());
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB));
    }
}
