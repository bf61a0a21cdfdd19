//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::use_cases::presence::PresenceNotifyPolicy;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub server_host: String,
    pub server_port: u16,
    pub database_path: PathBuf,
    pub notify_policy: PresenceNotifyPolicy,
    /// Account names created at startup when missing.
    pub seed_users: Vec<String>,
    pub cors_allowed_origins: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

impl EngineConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".into());

        let server_port = match lookup("SERVER_PORT").or_else(|| lookup("PORT")) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "SERVER_PORT",
                value: raw,
            })?,
            None => 3000,
        };

        let database_path = lookup("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("gauniv.db"));

        let notify_policy = match lookup("PRESENCE_NOTIFY_POLICY") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "PRESENCE_NOTIFY_POLICY",
                value: raw,
            })?,
            None => PresenceNotifyPolicy::default(),
        };

        let seed_users = lookup("SEED_USERS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            server_host,
            server_port,
            database_path,
            notify_policy,
            seed_users,
            cors_allowed_origins,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server_host, self.server_port)
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name: "SERVER_HOST",
                value: self.server_host.clone(),
            })
    }
}

/// Load `.env.local` then `.env` from `root`, ignoring missing files.
pub fn load_dotenv_from(root: &Path) {
    for filename in [".env.local", ".env"] {
        let path = root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
