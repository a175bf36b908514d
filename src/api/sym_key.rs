//!
//! Symmetric key generator façade.

use std::any::Any;

use crate::blob::Blob;
use crate::config::FrameworkConfig;
use crate::crypto::{Key, SymKeyGeneratorSpi};
use crate::error::{CryptoError, Result};
use crate::object::ObjectBase;
use crate::registry;

pub const SYM_KEY_GENERATOR_CLASS: &str = "SymKeyGenerator";

pub struct SymKeyGenerator {
    spi: Box<dyn SymKeyGeneratorSpi>,
    algorithm: String,
}

impl SymKeyGenerator {
    pub fn create(name: &str) -> Result<Self> {
        Self::create_with_config(name, &FrameworkConfig::default())
    }

    pub fn create_with_config(name: &str, config: &FrameworkConfig) -> Result<Self> {
        let create = registry::resolve(
            registry::sym_key_generator_abilities(config.provider),
            "symmetric key",
            name,
            &config.limits,
        )?;
        let spi = create(name)?;
        Ok(SymKeyGenerator { spi, algorithm: name.to_string() })
    }

    /// Generates a key from backend randomness.
    pub fn generate_sym_key(&self) -> Result<Box<dyn Key>> {
        let key = self.spi.engine_generate_sym_key()?;
        tracing::debug!("generated {} key", self.algorithm);
        Ok(key)
    }

    /// Wraps caller-supplied key bytes. The length must match the algorithm.
    pub fn convert_sym_key(&self, material: &Blob) -> Result<Box<dyn Key>> {
        if !material.is_valid() {
            tracing::warn!("empty key material for {}", self.algorithm);
            return Err(CryptoError::invalid("key material is empty"));
        }
        self.spi.engine_convert_sym_key(material.as_slice())
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }
}

impl ObjectBase for SymKeyGenerator {
    fn class(&self) -> &'static str {
        SYM_KEY_GENERATOR_CLASS
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_requires_exact_length() {
        let generator = SymKeyGenerator::create("AES192").unwrap();
        assert!(generator.convert_sym_key(&Blob::new(vec![7; 24])).is_ok());
        assert!(matches!(
            generator.convert_sym_key(&Blob::new(vec![7; 16])).err(),
            Some(CryptoError::InvalidParams(_))
        ));
        assert!(matches!(
            generator.convert_sym_key(&Blob::new(Vec::new())).err(),
            Some(CryptoError::InvalidParams(_))
        ));
    }

    #[test]
    fn generated_keys_differ() {
        let generator = SymKeyGenerator::create("AES128").unwrap();
        let a = generator.generate_sym_key().unwrap().encoded().unwrap();
        let b = generator.generate_sym_key().unwrap().encoded().unwrap();
        assert_ne!(a, b);
        assert_eq!(generator.algorithm(), "AES128");
    }
}
