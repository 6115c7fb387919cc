//! Settlement configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where the interest part of a funder repayment comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InterestSource {
    /// Pro-rata share of the reward fixed by the campaign's interest rate
    #[default]
    CampaignRate,
    /// floor(principal × percent / 100), chosen at settlement time
    ///
    /// The ledger still caps interest at the stored reward and rejects anything
    /// above it with `ExceedsClaim`.
    ExpectedReturnPercent { percent: u32 },
}

/// What `repay_all_funders` does after one funder fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    #[default]
    ContinueOnFailure,
    StopOnFailure,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    pub batch_policy: BatchPolicy,
    pub interest_source: InterestSource,
}

impl SettlementConfig {
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        toml::from_str(config_str).context("Failed to parse settlement config TOML")
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&config_str)
    }

    /// Load from `$SETTLEMENT_CONFIG`, falling back to defaults when unset
    pub fn from_env() -> Result<Self> {
        match std::env::var("SETTLEMENT_CONFIG") {
            Ok(path) => Self::load(path),
            Err(_) => {
                log::info!("SETTLEMENT_CONFIG not set, using default settlement config");
                Ok(Self::default())
            }
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize settlement config")
    }
}
