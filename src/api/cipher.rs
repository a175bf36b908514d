//!
//! Symmetric cipher façade.
//!
//! Created by transformation name, e.g. `AES128|CBC|PKCS7` or
//! `AES256|GCM|NoPadding`. Keys must come from this framework's symmetric key
//! generator and match the transformation's algorithm.

use std::any::Any;

use crate::blob::Blob;
use crate::config::FrameworkConfig;
use crate::crypto::{CipherSpi, Key};
use crate::error::{CryptoError, Result};
use crate::object::ObjectBase;
use crate::registry;
use crate::types::{CipherParams, CryptoMode};

pub const CIPHER_CLASS: &str = "Cipher";

pub struct Cipher {
    spi: Box<dyn CipherSpi>,
    algorithm: String,
}

impl Cipher {
    pub fn create(transformation: &str) -> Result<Self> {
        Self::create_with_config(transformation, &FrameworkConfig::default())
    }

    pub fn create_with_config(transformation: &str, config: &FrameworkConfig) -> Result<Self> {
        let create = registry::resolve_transformation(
            registry::cipher_abilities(config.provider),
            "cipher",
            transformation,
            &config.limits,
        )?;
        let spi = create(transformation)?;
        Ok(Cipher { spi, algorithm: transformation.to_string() })
    }

    /// Starts an operation, discarding any running one.
    ///
    /// # Arguments
    /// * `mode`: Encrypt or decrypt.
    /// * `key`: A key from [`crate::SymKeyGenerator`] of the same algorithm.
    /// * `params`: [`CipherParams::None`] for ECB, an IV for the other block
    ///   modes, GCM parameters for GCM.
    pub fn init(&mut self, mode: CryptoMode, key: &dyn Key, params: &CipherParams) -> Result<()> {
        self.spi.engine_init(mode, key, params)
    }

    pub fn update(&mut self, input: &Blob) -> Result<Blob> {
        if !input.is_valid() {
            tracing::warn!("cipher update with empty input");
            return Err(CryptoError::invalid("cipher input is empty"));
        }
        self.spi.engine_update(input.as_slice())
    }

    /// Finishes the operation, optionally processing one last chunk first.
    /// `init` must be called again before the next operation.
    pub fn do_final(&mut self, input: Option<&Blob>) -> Result<Blob> {
        let input = match input {
            Some(blob) if !blob.is_valid() => {
                tracing::warn!("cipher do_final with empty input");
                return Err(CryptoError::invalid("cipher input is empty"));
            }
            Some(blob) => Some(blob.as_slice()),
            None => None,
        };
        let out = self.spi.engine_do_final(input)?;
        tracing::debug!("{} operation finished", self.algorithm);
        Ok(out)
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }
}

impl ObjectBase for Cipher {
    fn class(&self) -> &'static str {
        CIPHER_CLASS
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SymKeyGenerator;

    #[test]
    fn streaming_matches_one_shot() {
        let key = SymKeyGenerator::create("AES192").unwrap().generate_sym_key().unwrap();
        let iv = CipherParams::Iv(vec![3; 16]);
        let plain = vec![0x42u8; 100];

        let mut cipher = Cipher::create("AES192|CBC|PKCS5").unwrap();
        cipher.init(CryptoMode::Encrypt, &*key, &iv).unwrap();
        let one_shot = cipher.do_final(Some(&Blob::new(plain.clone()))).unwrap().to_vec();

        cipher.init(CryptoMode::Encrypt, &*key, &iv).unwrap();
        let mut streamed = Vec::new();
        for chunk in plain.chunks(7) {
            streamed.extend_from_slice(cipher.update(&Blob::new(chunk.to_vec())).unwrap().as_slice());
        }
        streamed.extend_from_slice(cipher.do_final(None).unwrap().as_slice());
        assert_eq!(streamed, one_shot);
        assert_eq!(one_shot.len(), 112);
    }

    #[test]
    fn empty_inputs_are_invalid() {
        let key = SymKeyGenerator::create("AES128").unwrap().generate_sym_key().unwrap();
        let mut cipher = Cipher::create("AES128|ECB|PKCS7").unwrap();
        cipher.init(CryptoMode::Encrypt, &*key, &CipherParams::None).unwrap();
        let empty = Blob::new(Vec::new());
        assert!(matches!(cipher.update(&empty), Err(CryptoError::InvalidParams(_))));
        assert!(matches!(cipher.do_final(Some(&empty)), Err(CryptoError::InvalidParams(_))));
        assert_eq!(cipher.do_final(None).unwrap().len(), 16);
    }

    #[test]
    fn algorithm_is_the_transformation_name() {
        let cipher = Cipher::create("3DES192|ECB|NoPadding").unwrap();
        assert_eq!(cipher.algorithm(), "3DES192|ECB|NoPadding");
        assert_eq!(cipher.class(), CIPHER_CLASS);
    }
}
