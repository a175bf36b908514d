//!
//! Message digest façade.

use std::any::Any;

use crate::blob::Blob;
use crate::config::FrameworkConfig;
use crate::crypto::MdSpi;
use crate::error::{CryptoError, Result};
use crate::object::ObjectBase;
use crate::registry;

pub const MESSAGE_DIGEST_CLASS: &str = "Md";

pub struct MessageDigest {
    spi: Box<dyn MdSpi>,
    algorithm: String,
}

impl MessageDigest {
    pub fn create(name: &str) -> Result<Self> {
        Self::create_with_config(name, &FrameworkConfig::default())
    }

    pub fn create_with_config(name: &str, config: &FrameworkConfig) -> Result<Self> {
        let create = registry::resolve(
            registry::md_abilities(config.provider),
            "digest",
            name,
            &config.limits,
        )?;
        let spi = create(name)?;
        Ok(MessageDigest { spi, algorithm: name.to_string() })
    }

    pub fn update(&mut self, input: &Blob) -> Result<()> {
        self.update_bytes(input.as_slice())
    }

    /// Same as [`MessageDigest::update`] for borrowed bytes.
    pub fn update_bytes(&mut self, input: &[u8]) -> Result<()> {
        if input.is_empty() {
            tracing::warn!("digest update with empty input");
            return Err(CryptoError::invalid("digest input is empty"));
        }
        self.spi.engine_update_md(input)
    }

    pub fn do_final(&mut self) -> Result<Blob> {
        let out = self.spi.engine_do_final_md()?;
        tracing::debug!("{} digest finalized", self.algorithm);
        Ok(out)
    }

    pub fn md_length(&self) -> u32 {
        self.spi.engine_get_md_length()
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }
}

impl ObjectBase for MessageDigest {
    fn class(&self) -> &'static str {
        MESSAGE_DIGEST_CLASS
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_keeps_name() {
        let md = MessageDigest::create("SHA384").unwrap();
        assert_eq!(md.algorithm(), "SHA384");
        assert_eq!(md.md_length(), 48);
        assert_eq!(md.class(), MESSAGE_DIGEST_CLASS);
    }

    #[test]
    fn lowered_name_limit_applies() {
        let mut config = FrameworkConfig::default();
        config.limits.max_algorithm_name_len = 4;
        assert!(MessageDigest::create_with_config("MD5", &config).is_ok());
        assert!(matches!(
            MessageDigest::create_with_config("SHA256", &config).err(),
            Some(CryptoError::InvalidParams(_))
        ));
    }

    #[test]
    fn empty_blob_is_rejected() {
        let mut md = MessageDigest::create("SHA1").unwrap();
        assert!(matches!(md.update(&Blob::new(Vec::new())), Err(CryptoError::InvalidParams(_))));
        assert_eq!(md.do_final().unwrap().len(), 20);
    }
}
