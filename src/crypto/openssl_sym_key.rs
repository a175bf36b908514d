//!
//! OpenSSL-backed symmetric key generator and the raw key type it produces.

use std::any::Any;
use std::fmt;

use zeroize::Zeroizing;

use super::{Key, SymKeyGeneratorSpi};
use crate::blob::Blob;
use crate::error::{CryptoError, Result};
use crate::object::ObjectBase;
use crate::types::SymKeyAlgorithm;

pub const OPENSSL_SYM_KEY_CLASS: &str = "OpensslSymKey";
pub const OPENSSL_SYM_KEY_GENERATOR_CLASS: &str = "OpensslSymKeyGenerator";
pub const RAW_KEY_FORMAT: &str = "RAW";

/// Raw symmetric key. Key bytes are wiped on drop and on [`OpensslSymKey::clear_mem`].
pub struct OpensslSymKey {
    algorithm: SymKeyAlgorithm,
    material: Zeroizing<Vec<u8>>,
}

impl OpensslSymKey {
    pub fn key_algorithm(&self) -> SymKeyAlgorithm {
        self.algorithm
    }

    pub(crate) fn material(&self) -> &[u8] {
        &self.material
    }

    #[cfg(test)]
    pub(crate) fn for_tests(material: &[u8]) -> Self {
        OpensslSymKey { algorithm: SymKeyAlgorithm::Aes256, material: Zeroizing::new(material.to_vec()) }
    }

    /// Wipes the key material in place; the key is unusable afterwards.
    pub fn clear_mem(&mut self) {
        self.material = Zeroizing::new(Vec::new());
    }
}

impl fmt::Debug for OpensslSymKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpensslSymKey")
            .field("algorithm", &self.algorithm)
            .field("material", &"<redacted>")
            .finish()
    }
}

impl ObjectBase for OpensslSymKey {
    fn class(&self) -> &'static str {
        OPENSSL_SYM_KEY_CLASS
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Key for OpensslSymKey {
    fn algorithm(&self) -> &str {
        self.algorithm.name()
    }

    fn format(&self) -> &str {
        RAW_KEY_FORMAT
    }

    fn encoded(&self) -> Result<Blob> {
        if self.material.is_empty() {
            return Err(CryptoError::invalid("key material has been cleared"));
        }
        Blob::try_copy_from(&self.material)
    }
}

pub struct OpensslSymKeyGeneratorSpi {
    algorithm: SymKeyAlgorithm,
}

impl OpensslSymKeyGeneratorSpi {
    pub fn create(name: &str) -> Result<Box<dyn SymKeyGeneratorSpi>> {
        let algorithm = SymKeyAlgorithm::from_name(name).ok_or_else(|| {
            tracing::warn!("unsupported symmetric key algorithm: {}", name);
            CryptoError::NotSupported(format!("symmetric key algorithm {}", name))
        })?;
        tracing::debug!("created openssl sym key generator for {}", name);
        Ok(Box::new(OpensslSymKeyGeneratorSpi { algorithm }))
    }

    fn wrap(&self, material: Zeroizing<Vec<u8>>) -> Box<dyn Key> {
        Box::new(OpensslSymKey { algorithm: self.algorithm, material })
    }
}

impl ObjectBase for OpensslSymKeyGeneratorSpi {
    fn class(&self) -> &'static str {
        OPENSSL_SYM_KEY_GENERATOR_CLASS
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl SymKeyGeneratorSpi for OpensslSymKeyGeneratorSpi {
    fn engine_generate_sym_key(&self) -> Result<Box<dyn Key>> {
        let len = self.algorithm.key_len();
        let mut material = Zeroizing::new(Vec::new());
        material.try_reserve_exact(len)?;
        material.resize(len, 0);
        openssl::rand::rand_bytes(&mut material)?;
        Ok(self.wrap(material))
    }

    fn engine_convert_sym_key(&self, material: &[u8]) -> Result<Box<dyn Key>> {
        let expected = self.algorithm.key_len();
        if material.len() != expected {
            tracing::warn!(
                "{} key material must be {} bytes, got {}",
                self.algorithm.name(),
                expected,
                material.len()
            );
            return Err(CryptoError::invalid(format!(
                "{} key material must be {} bytes, got {}",
                self.algorithm.name(),
                expected,
                material.len()
            )));
        }
        let mut copy = Zeroizing::new(Vec::new());
        copy.try_reserve_exact(expected)?;
        copy.extend_from_slice(material);
        Ok(self.wrap(copy))
    }
}
