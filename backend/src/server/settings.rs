//! Application settings loaded via OrthoConfig.
//!
//! Values layer from defaults, configuration files, `DAYBOOK_*` environment
//! variables, and command-line flags.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use daybook::domain::{CredentialsValidationError, Registration, Role};
use daybook::inbound::http::session_config::SessionToggles;
use daybook::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SAME_SITE: &str = "lax";
const DEFAULT_ADMIN_NAME: &str = "Administrator";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind_addr '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// Only one of the bootstrap email and password was supplied.
    #[error("bootstrap_admin_email and bootstrap_admin_password must be set together")]
    IncompleteBootstrap,
    /// Bootstrap credentials failed validation.
    #[error("invalid bootstrap admin: {0}")]
    Bootstrap(#[from] CredentialsValidationError),
}

/// Settings for the `daybook` server binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DAYBOOK")]
pub struct AppSettings {
    /// Listen address.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. In-memory storage is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// File holding at least 64 bytes of session key material.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`.
    #[ortho_config(default = true)]
    pub session_cookie_secure: bool,
    /// `strict`, `lax`, or `none`.
    pub session_same_site: Option<String>,
    /// Use a generated session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Email of the administrator created on first start.
    pub bootstrap_admin_email: Option<String>,
    /// Password of the administrator created on first start.
    pub bootstrap_admin_password: Option<String>,
    /// Display name of the administrator created on first start.
    pub bootstrap_admin_name: Option<String>,
}

impl AppSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Pool settings when a database is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?.trim();
        if url.is_empty() {
            return None;
        }
        let config = PoolConfig::new(url);
        Some(match self.db_max_connections {
            Some(max) => config.with_max_size(max),
            None => config,
        })
    }

    /// Session toggles for [`daybook::inbound::http::session_config`].
    pub fn session_toggles(&self) -> SessionToggles<'_> {
        SessionToggles {
            key_file: self.session_key_file.as_deref(),
            cookie_secure: self.session_cookie_secure,
            same_site: self
                .session_same_site
                .as_deref()
                .unwrap_or(DEFAULT_SAME_SITE),
            allow_ephemeral: self.session_allow_ephemeral,
        }
    }

    /// Registration for the first administrator, if configured.
    pub fn bootstrap_admin(&self) -> Result<Option<Registration>, SettingsError> {
        match (
            self.bootstrap_admin_email.as_deref(),
            self.bootstrap_admin_password.as_deref(),
        ) {
            (None, None) => Ok(None),
            (Some(email), Some(password)) => {
                let name = self
                    .bootstrap_admin_name
                    .as_deref()
                    .unwrap_or(DEFAULT_ADMIN_NAME);
                Ok(Some(Registration::try_from_parts(
                    name,
                    email,
                    password,
                    Some(Role::Admin),
                )?))
            }
            _ => Err(SettingsError::IncompleteBootstrap),
        }
    }
}
