//!
//! Random generator façade.
//!
//! Besides the byte-blob API, [`Random`] implements [`rand_core::RngCore`] and
//! [`rand_core::CryptoRng`], so it can drive any code written against those
//! traits. Large fills are served in chunks no bigger than the configured
//! random limit.

use std::any::Any;

use rand_core::{CryptoRng, RngCore};

use crate::blob::Blob;
use crate::config::{FrameworkConfig, Limits};
use crate::crypto::RandSpi;
use crate::error::{CryptoError, Result};
use crate::object::ObjectBase;
use crate::registry;

pub const RANDOM_CLASS: &str = "Rand";

pub struct Random {
    spi: Box<dyn RandSpi>,
    algorithm: String,
    limits: Limits,
}

impl Random {
    pub fn create(name: &str) -> Result<Self> {
        Self::create_with_config(name, &FrameworkConfig::default())
    }

    pub fn create_with_config(name: &str, config: &FrameworkConfig) -> Result<Self> {
        let create = registry::resolve(
            registry::rand_abilities(config.provider),
            "random",
            name,
            &config.limits,
        )?;
        let spi = create(name)?;
        Ok(Random { spi, algorithm: name.to_string(), limits: config.limits })
    }

    /// Returns `num_bytes` fresh random bytes.
    pub fn generate_random(&mut self, num_bytes: i32) -> Result<Blob> {
        let len = usize::try_from(num_bytes).unwrap_or(0);
        if len == 0 || len > self.limits.max_rand_len {
            tracing::warn!("random length {} out of range", num_bytes);
            return Err(CryptoError::invalid(format!(
                "random length must be within 1..={}, got {}",
                self.limits.max_rand_len, num_bytes
            )));
        }
        self.spi.engine_generate_random(len)
    }

    pub fn set_seed(&mut self, seed: &Blob) -> Result<()> {
        if !seed.is_valid() || seed.len() > self.limits.max_seed_len {
            tracing::warn!("seed of {} bytes rejected", seed.len());
            return Err(CryptoError::invalid(format!(
                "seed length must be within 1..={}, got {}",
                self.limits.max_seed_len,
                seed.len()
            )));
        }
        self.spi.engine_set_seed(seed.as_slice())
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }
}

impl ObjectBase for Random {
    fn class(&self) -> &'static str {
        RANDOM_CLASS
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// # Panics
///
/// `next_u32`, `next_u64` and `fill_bytes` panic if the backend fails to
/// produce bytes, as the [`RngCore`] contract requires of infallible fills.
/// Use [`RngCore::try_fill_bytes`] or [`Random::generate_random`] to get the
/// failure as an error instead.
impl RngCore for Random {
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }

    /// # Panics
    ///
    /// Panics when the backend generator fails.
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if let Err(err) = self.try_fill_bytes(dest) {
            panic!("random generator failure: {}", err);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand_core::Error> {
        for chunk in dest.chunks_mut(self.limits.max_rand_len) {
            let bytes = self.spi.engine_generate_random(chunk.len()).map_err(rand_core::Error::new)?;
            chunk.copy_from_slice(bytes.as_slice());
        }
        Ok(())
    }
}

impl CryptoRng for Random {}
