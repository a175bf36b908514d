//!
//! Certificate-chain validator façade.
//!
//! Accepts a chain in wire form, decodes it and hands the certificates to the
//! provider. Wire-level checks (size bound, declared count) happen here.

use std::any::Any;

use crate::blob::CertChainData;
use crate::codec;
use crate::config::{FrameworkConfig, Limits};
use crate::crypto::CertChainValidatorSpi;
use crate::error::{CryptoError, Result};
use crate::object::ObjectBase;
use crate::registry;

pub const CERT_CHAIN_VALIDATOR_CLASS: &str = "CertChainValidator";

pub struct CertChainValidator {
    spi: Box<dyn CertChainValidatorSpi>,
    algorithm: String,
    limits: Limits,
}

impl CertChainValidator {
    pub fn create(name: &str) -> Result<Self> {
        Self::create_with_config(name, &FrameworkConfig::default())
    }

    pub fn create_with_config(name: &str, config: &FrameworkConfig) -> Result<Self> {
        let create = registry::resolve(
            registry::cert_chain_validator_abilities(config.provider),
            "cert chain validator",
            name,
            &config.limits,
        )?;
        let spi = create(name)?;
        Ok(CertChainValidator { spi, algorithm: name.to_string(), limits: config.limits })
    }

    pub fn validate(&self, chain: &CertChainData) -> Result<()> {
        if chain.data.is_empty() || chain.data.len() > self.limits.max_cert_chain_len {
            tracing::warn!("cert chain data of {} bytes rejected", chain.data.len());
            return Err(CryptoError::invalid(format!(
                "cert chain data must be 1..={} bytes, got {}",
                self.limits.max_cert_chain_len,
                chain.data.len()
            )));
        }
        let certs = codec::decode_cert_chain(&chain.data, chain.count, chain.format)?;
        if certs.len() != usize::from(chain.count) {
            tracing::warn!("cert chain declares {} entries, carries {}", chain.count, certs.len());
            return Err(CryptoError::invalid(format!(
                "cert chain declares {} certificates but carries {}",
                chain.count,
                certs.len()
            )));
        }
        self.spi.engine_validate(&certs)
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }
}

impl ObjectBase for CertChainValidator {
    fn class(&self) -> &'static str {
        CERT_CHAIN_VALIDATOR_CLASS
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::EncodingFormat;

    #[test]
    fn empty_and_oversized_data_are_rejected() {
        let validator = CertChainValidator::create("PKIX").unwrap();
        let empty = CertChainData::new(Vec::new(), 2, EncodingFormat::Der);
        assert!(matches!(validator.validate(&empty), Err(CryptoError::InvalidParams(_))));
        let big = CertChainData::new(vec![0; 8193], 2, EncodingFormat::Der);
        assert!(matches!(validator.validate(&big), Err(CryptoError::InvalidParams(_))));
    }

    #[test]
    fn short_count_is_rejected() {
        let validator = CertChainValidator::create("PKIX").unwrap();
        let chain = codec::encode_cert_chain(&[b"first".as_slice(), b"second".as_slice()], EncodingFormat::Der)
            .unwrap();
        let understated = CertChainData::new(chain.data.clone(), 3, EncodingFormat::Der);
        assert!(matches!(validator.validate(&understated), Err(CryptoError::InvalidParams(_))));
    }

    #[test]
    fn algorithm_is_pkix() {
        let validator = CertChainValidator::create("PKIX").unwrap();
        assert_eq!(validator.algorithm(), "PKIX");
        assert_eq!(validator.class(), CERT_CHAIN_VALIDATOR_CLASS);
    }
}
