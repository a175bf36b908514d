//!
//! Framework configuration: which backend provider serves the registry and the
//! size bounds enforced at the façade boundary.
//!
//! Bounds can be tightened through configuration but never raised above the
//! hard maxima below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, Result};

/// Longest accepted algorithm name, in bytes.
pub const MAX_ALGORITHM_NAME_LEN: usize = 128;
/// Largest single random request and largest seed, in bytes.
pub const MAX_RAND_LEN: usize = 8192;
/// Largest certificate-chain wire buffer, in bytes.
pub const MAX_CERT_CHAIN_LEN: usize = 8192;

/// Backend implementations the registry can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProviderKind {
    #[default]
    Openssl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_algorithm_name_len: usize,
    pub max_rand_len: usize,
    pub max_seed_len: usize,
    pub max_cert_chain_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_algorithm_name_len: MAX_ALGORITHM_NAME_LEN,
            max_rand_len: MAX_RAND_LEN,
            max_seed_len: MAX_RAND_LEN,
            max_cert_chain_len: MAX_CERT_CHAIN_LEN,
        }
    }
}

impl Limits {
    pub fn validate(&self) -> Result<()> {
        check_bound("max_algorithm_name_len", self.max_algorithm_name_len, MAX_ALGORITHM_NAME_LEN)?;
        check_bound("max_rand_len", self.max_rand_len, MAX_RAND_LEN)?;
        check_bound("max_seed_len", self.max_seed_len, MAX_RAND_LEN)?;
        check_bound("max_cert_chain_len", self.max_cert_chain_len, MAX_CERT_CHAIN_LEN)
    }
}

fn check_bound(field: &str, value: usize, hard_max: usize) -> Result<()> {
    if value == 0 || value > hard_max {
        return Err(CryptoError::invalid(format!(
            "{} must be within 1..={}, got {}",
            field, hard_max, value
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkConfig {
    pub provider: ProviderKind,
    pub limits: Limits,
}

impl FrameworkConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: FrameworkConfig = serde_json::from_str(json)
            .map_err(|e| CryptoError::invalid(format!("malformed framework config: {}", e)))?;
        config.limits.validate()?;
        tracing::debug!("loaded framework config: {:?}", config);
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            CryptoError::invalid(format!("cannot read framework config {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }
}
