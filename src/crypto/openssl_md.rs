//!
//! OpenSSL-backed message digest provider.

use std::any::Any;

use openssl::hash::Hasher;

use super::MdSpi;
use crate::blob::Blob;
use crate::error::{CryptoError, Result};
use crate::object::ObjectBase;
use crate::types::DigestAlgorithm;

pub const OPENSSL_MD_CLASS: &str = "OpensslMd";

/// Digest provider. `hasher` is taken on finalize, which makes the provider terminal.
pub struct OpensslMdSpi {
    algorithm: DigestAlgorithm,
    hasher: Option<Hasher>,
}

impl OpensslMdSpi {
    /// Registry constructor. Unknown names fail here, not at first use.
    pub fn create(name: &str) -> Result<Box<dyn MdSpi>> {
        let algorithm = DigestAlgorithm::from_name(name).ok_or_else(|| {
            tracing::warn!("unsupported digest algorithm: {}", name);
            CryptoError::NotSupported(format!("digest algorithm {}", name))
        })?;
        let hasher = Hasher::new(algorithm.message_digest())?;
        tracing::debug!("created openssl digest provider for {}", name);
        Ok(Box::new(OpensslMdSpi { algorithm, hasher: Some(hasher) }))
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    fn live_hasher(&mut self) -> Result<&mut Hasher> {
        self.hasher
            .as_mut()
            .ok_or_else(|| CryptoError::CryptoOperation("digest already finalized".to_string()))
    }
}

impl ObjectBase for OpensslMdSpi {
    fn class(&self) -> &'static str {
        OPENSSL_MD_CLASS
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl MdSpi for OpensslMdSpi {
    fn engine_update_md(&mut self, input: &[u8]) -> Result<()> {
        if input.is_empty() {
            tracing::warn!("digest update called with empty input");
            return Err(CryptoError::invalid("digest input is empty"));
        }
        self.live_hasher()?.update(input)?;
        Ok(())
    }

    fn engine_do_final_md(&mut self) -> Result<Blob> {
        let mut hasher = self
            .hasher
            .take()
            .ok_or_else(|| CryptoError::CryptoOperation("digest already finalized".to_string()))?;
        let digest = hasher.finish()?;
        Blob::try_copy_from(&digest)
    }

    fn engine_get_md_length(&self) -> u32 {
        self.algorithm.output_len()
    }
}
