//!
//! MAC façade (HMAC over a registered digest).

use std::any::Any;

use crate::blob::Blob;
use crate::config::FrameworkConfig;
use crate::crypto::{Key, MacSpi};
use crate::error::{CryptoError, Result};
use crate::object::ObjectBase;
use crate::registry;

pub const MAC_CLASS: &str = "Mac";

pub struct Mac {
    spi: Box<dyn MacSpi>,
    algorithm: String,
}

impl Mac {
    pub fn create(name: &str) -> Result<Self> {
        Self::create_with_config(name, &FrameworkConfig::default())
    }

    pub fn create_with_config(name: &str, config: &FrameworkConfig) -> Result<Self> {
        let create = registry::resolve(
            registry::mac_abilities(config.provider),
            "mac",
            name,
            &config.limits,
        )?;
        let spi = create(name)?;
        Ok(Mac { spi, algorithm: name.to_string() })
    }

    /// Binds `key` and starts a new computation. The key must come from this
    /// framework's symmetric key generator.
    pub fn init(&mut self, key: &dyn Key) -> Result<()> {
        self.spi.engine_init_mac(key)
    }

    pub fn update(&mut self, input: &Blob) -> Result<()> {
        if !input.is_valid() {
            tracing::warn!("mac update with empty input");
            return Err(CryptoError::invalid("mac input is empty"));
        }
        self.spi.engine_update_mac(input.as_slice())
    }

    pub fn do_final(&mut self) -> Result<Blob> {
        let out = self.spi.engine_do_final_mac()?;
        tracing::debug!("{} mac finalized", self.algorithm);
        Ok(out)
    }

    pub fn mac_length(&self) -> u32 {
        self.spi.engine_get_mac_length()
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }
}

impl ObjectBase for Mac {
    fn class(&self) -> &'static str {
        MAC_CLASS
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
