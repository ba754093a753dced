//! Community settings loaded via OrthoConfig.
//!
//! Values come from `COMMUNITY_*` environment variables, configuration files,
//! or command-line flags, in the precedence OrthoConfig applies.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::ExperiencePolicy;
use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Runtime configuration for the community server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COMMUNITY")]
pub struct CommunitySettings {
    /// Reject votes move their content owner's experience like approvals.
    #[ortho_config(default = false)]
    pub reject_votes_award_experience: bool,
    /// Retracting a vote takes back the experience it granted.
    #[ortho_config(default = true)]
    pub retractions_debit_experience: bool,
    /// Debit ledger entries record the clamped amount rather than the
    /// nominal one.
    #[ortho_config(default = false)]
    pub debit_ledger_records_applied: bool,
    /// PostgreSQL connection string. The in-memory store is used when unset.
    pub database_url: Option<String>,
    /// Upper bound on open PostgreSQL connections.
    pub database_max_connections: Option<u32>,
    /// Listen address, `0.0.0.0:8080` when unset.
    pub bind_addr: Option<String>,
}

impl CommunitySettings {
    /// Ledger policy assembled from the toggles.
    pub fn experience_policy(&self) -> ExperiencePolicy {
        ExperiencePolicy {
            reject_votes_award_experience: self.reject_votes_award_experience,
            retractions_debit_experience: self.retractions_debit_experience,
            debit_ledger_records_applied: self.debit_ledger_records_applied,
        }
    }

    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::BindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Pool settings when a database is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let config = PoolConfig::new(self.database_url()?);
        Some(match self.database_max_connections {
            Some(max) => config.with_max_connections(max),
            None => config,
        })
    }
}
