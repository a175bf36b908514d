//!
//! OpenSSL-backed random generator provider.
//!
//! Output always comes from the backend CSPRNG. Caller-supplied seed material
//! is condensed into a local pool; once a pool exists, each request is XORed
//! with a SHA-512 keystream derived from it. The keystream is independent of
//! the backend output, so seeding supplements entropy and cannot weaken it.

use std::any::Any;

use openssl::hash::{Hasher, MessageDigest};
use zeroize::Zeroizing;

use super::RandSpi;
use crate::blob::Blob;
use crate::config::MAX_RAND_LEN;
use crate::error::{CryptoError, Result};
use crate::object::ObjectBase;

pub const OPENSSL_RAND_CLASS: &str = "OpensslRand";
pub const OPENSSL_RAND_ALGORITHM: &str = "OpensslRand";

const KEYSTREAM_BLOCK_LEN: usize = 64;

pub struct OpensslRandSpi {
    seed_pool: Option<Zeroizing<Vec<u8>>>,
    generation: u64,
}

impl OpensslRandSpi {
    pub fn create(name: &str) -> Result<Box<dyn RandSpi>> {
        if name != OPENSSL_RAND_ALGORITHM {
            return Err(CryptoError::NotSupported(format!("random algorithm {}", name)));
        }
        tracing::debug!("created openssl random provider");
        Ok(Box::new(OpensslRandSpi { seed_pool: None, generation: 0 }))
    }

    fn mix_seed_pool(&mut self, out: &mut [u8]) -> Result<()> {
        let pool = match &self.seed_pool {
            Some(pool) => pool,
            None => return Ok(()),
        };
        self.generation = self.generation.wrapping_add(1);
        for (block, chunk) in out.chunks_mut(KEYSTREAM_BLOCK_LEN).enumerate() {
            let mut hasher = Hasher::new(MessageDigest::sha512())?;
            hasher.update(pool)?;
            hasher.update(&self.generation.to_be_bytes())?;
            hasher.update(&(block as u64).to_be_bytes())?;
            let keystream = Zeroizing::new(hasher.finish()?.to_vec());
            for (byte, k) in chunk.iter_mut().zip(keystream.iter()) {
                *byte ^= k;
            }
        }
        Ok(())
    }
}

impl ObjectBase for OpensslRandSpi {
    fn class(&self) -> &'static str {
        OPENSSL_RAND_CLASS
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl RandSpi for OpensslRandSpi {
    fn engine_generate_random(&mut self, num_bytes: usize) -> Result<Blob> {
        if num_bytes == 0 || num_bytes > MAX_RAND_LEN {
            tracing::warn!("random length {} out of range", num_bytes);
            return Err(CryptoError::invalid(format!(
                "random length must be within 1..={}, got {}",
                MAX_RAND_LEN, num_bytes
            )));
        }
        let mut out = Vec::new();
        out.try_reserve_exact(num_bytes)?;
        out.resize(num_bytes, 0);
        let mut out = Blob::new(out);
        let bytes = out.as_mut_slice();
        openssl::rand::rand_bytes(bytes)?;
        self.mix_seed_pool(bytes)?;
        Ok(out)
    }

    fn engine_set_seed(&mut self, seed: &[u8]) -> Result<()> {
        if seed.is_empty() || seed.len() > MAX_RAND_LEN {
            tracing::warn!("seed length {} out of range", seed.len());
            return Err(CryptoError::invalid(format!(
                "seed length must be within 1..={}, got {}",
                MAX_RAND_LEN,
                seed.len()
            )));
        }
        let mut hasher = Hasher::new(MessageDigest::sha512())?;
        if let Some(pool) = &self.seed_pool {
            hasher.update(pool)?;
        }
        hasher.update(seed)?;
        self.seed_pool = Some(Zeroizing::new(hasher.finish()?.to_vec()));
        tracing::debug!("mixed {} bytes of seed material", seed.len());
        Ok(())
    }
}
