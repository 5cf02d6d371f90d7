use crate::connection::ConnectionParams;
use crate::connection::connection_params::{
    DEFAULT_APPLICATION_NAME, DEFAULT_CONNECT_TIMEOUT, DEFAULT_PORT,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_USER: &str = "postgres";

/// One layer of connection settings; unset fields fall through to the next layer.
#[derive(Deserialize, PartialEq, Eq, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ConnectionSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub dbname: Option<String>,
    pub password: Option<String>,
    pub connect_timeout_sec: Option<u64>,
    pub application_name: Option<String>,
}

impl ConnectionSettings {
    /// Reads the libpq environment variables through `var`.
    pub fn from_environment<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = var("PGPORT")
            .map(|port| {
                port.trim()
                    .parse::<u16>()
                    .with_context(|| format!("Invalid PGPORT: {port}"))
            })
            .transpose()?;
        let connect_timeout_sec = var("PGCONNECT_TIMEOUT")
            .map(|timeout| {
                timeout
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("Invalid PGCONNECT_TIMEOUT: {timeout}"))
            })
            .transpose()?;
        Ok(Self {
            host: var("PGHOST"),
            port,
            user: var("PGUSER"),
            dbname: var("PGDATABASE"),
            password: var("PGPASSWORD"),
            connect_timeout_sec,
            application_name: var("PGAPPNAME"),
        })
    }

    pub fn or(self, fallback: ConnectionSettings) -> Self {
        Self {
            host: self.host.or(fallback.host),
            port: self.port.or(fallback.port),
            user: self.user.or(fallback.user),
            dbname: self.dbname.or(fallback.dbname),
            password: self.password.or(fallback.password),
            connect_timeout_sec: self.connect_timeout_sec.or(fallback.connect_timeout_sec),
            application_name: self.application_name.or(fallback.application_name),
        }
    }

    /// Fills the remaining gaps the way libpq does: the database defaults to
    /// the user name, the user to the login name, and a timeout of 0 waits
    /// indefinitely.
    pub fn into_params(self, login_name: Option<String>) -> ConnectionParams {
        let user = self
            .user
            .or(login_name)
            .unwrap_or_else(|| DEFAULT_USER.to_string());
        ConnectionParams {
            host: self.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: self.port.unwrap_or(DEFAULT_PORT),
            dbname: self.dbname.unwrap_or_else(|| user.clone()),
            user,
            password: self.password,
            connect_timeout: match self.connect_timeout_sec {
                Some(0) => None,
                Some(seconds) => Some(Duration::from_secs(seconds)),
                None => Some(DEFAULT_CONNECT_TIMEOUT),
            },
            application_name: self
                .application_name
                .unwrap_or_else(|| DEFAULT_APPLICATION_NAME.to_string()),
        }
    }
}

pub struct SettingsManager {
    settings_file_name: PathBuf,
}

impl SettingsManager {
    pub fn new(settings_file_name: &Path) -> Self {
        Self {
            settings_file_name: settings_file_name.to_path_buf(),
        }
    }

    pub async fn load_settings_from_file(&self) -> Result<ConnectionSettings> {
        let content = tokio::fs::read_to_string(&self.settings_file_name)
            .await
            .with_context(|| {
                format!(
                    "Failed to read settings file: {}",
                    self.settings_file_name.display()
                )
            })?;
        Self::parse_settings(&content).with_context(|| {
            format!(
                "Failed to deserialize settings file: {}",
                self.settings_file_name.display()
            )
        })
    }

    pub fn parse_settings(content: &str) -> Result<ConnectionSettings> {
        if content.trim().is_empty() {
            return Ok(ConnectionSettings::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}
