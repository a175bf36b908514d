//!
//! Service provider interfaces.
//!
//! Each capability family is a trait a backend implements. Façades in
//! [`crate::api`] own exactly one boxed provider and forward to it after
//! validating arguments. Providers translate every backend failure into
//! [`crate::error::CryptoError`] before returning.

use crate::blob::{Blob, BlobArray};
use crate::error::Result;
use crate::object::ObjectBase;
use crate::types::{CipherParams, CryptoMode};

/// Message digest provider.
pub trait MdSpi: ObjectBase + Send {
    /// Appends `input` to the running hash.
    ///
    /// # Arguments
    /// * `input`: The next chunk of the message. Empty input is rejected.
    ///
    /// # Returns
    /// `Ok(())`, or `InvalidParams` for empty input and `CryptoOperation` once
    /// the provider has been finalized.
    fn engine_update_md(&mut self, input: &[u8]) -> Result<()>;

    /// Computes the digest over everything passed to `engine_update_md`.
    /// The provider is spent afterwards.
    ///
    /// # Returns
    /// A blob of exactly `engine_get_md_length()` bytes.
    fn engine_do_final_md(&mut self) -> Result<Blob>;

    /// Fixed output width in bytes.
    fn engine_get_md_length(&self) -> u32;
}

/// Random generator provider.
pub trait RandSpi: ObjectBase + Send {
    /// Produces `num_bytes` bytes from the backend generator.
    ///
    /// # Arguments
    /// * `num_bytes`: Requested length. The façade has already bounded it.
    ///
    /// # Returns
    /// A blob of exactly `num_bytes` bytes, or `CryptoOperation` if the backend
    /// cannot produce them.
    fn engine_generate_random(&mut self, num_bytes: usize) -> Result<Blob>;

    /// Mixes `seed` into the generator state without replacing backend entropy.
    fn engine_set_seed(&mut self, seed: &[u8]) -> Result<()>;
}

/// Certificate-chain validator provider. Stateless across calls.
pub trait CertChainValidatorSpi: ObjectBase + Send + Sync {
    /// Verifies that the leaf chains up to the remaining certificates.
    ///
    /// # Arguments
    /// * `certs`: Decoded certificates. `certs[0]` is the leaf; the remaining
    ///   entries form the trust store. Their encoding is `certs.format()`.
    ///
    /// # Returns
    /// `Ok(())` if the chain verifies, a certificate-specific error for the
    /// recognised verification failures, or `CryptoOperation` otherwise.
    fn engine_validate(&self, certs: &BlobArray) -> Result<()>;
}

/// Symmetric key generator provider.
pub trait SymKeyGeneratorSpi: ObjectBase + Send + Sync {
    /// Generates a fresh key of the provider's algorithm from backend randomness.
    fn engine_generate_sym_key(&self) -> Result<Box<dyn Key>>;

    /// Wraps caller-supplied key bytes.
    ///
    /// # Arguments
    /// * `material`: Raw key bytes. Must be exactly the algorithm's key length.
    ///
    /// # Returns
    /// The key, or `InvalidParams` when the length does not match.
    fn engine_convert_sym_key(&self, material: &[u8]) -> Result<Box<dyn Key>>;
}

/// MAC provider.
pub trait MacSpi: ObjectBase + Send {
    /// Binds `key` and starts a new computation, discarding any running one.
    ///
    /// # Arguments
    /// * `key`: Must be a key produced by the same backend. Keys of any other
    ///   class are rejected with `InvalidParams`.
    fn engine_init_mac(&mut self, key: &dyn Key) -> Result<()>;

    /// Appends `input` to the running computation.
    ///
    /// # Returns
    /// `InvalidParams` for empty input, `CryptoOperation` when no computation
    /// is running.
    fn engine_update_mac(&mut self, input: &[u8]) -> Result<()>;

    /// Produces the tag and ends the computation. Another `engine_init_mac`
    /// is required before the next update.
    fn engine_do_final_mac(&mut self) -> Result<Blob>;

    /// Output width in bytes, or 0 before a key is bound.
    fn engine_get_mac_length(&self) -> u32;
}

/// Symmetric cipher provider for one `ALG|MODE|PADDING` transformation.
pub trait CipherSpi: ObjectBase + Send {
    /// Binds `key` and starts an encryption or decryption, discarding any
    /// running one.
    ///
    /// # Arguments
    /// * `mode`: Encrypt or decrypt.
    /// * `key`: A key from the same backend whose algorithm matches the
    ///   transformation.
    /// * `params`: IV or GCM parameters as the mode requires.
    ///
    /// # Returns
    /// `InvalidParams` for a foreign key, a key of another algorithm, or
    /// parameters that do not fit the mode.
    fn engine_init(&mut self, mode: CryptoMode, key: &dyn Key, params: &CipherParams) -> Result<()>;

    /// Processes `input` and returns whatever output is ready. Block modes
    /// may buffer up to one block, so the output can be shorter than the input.
    fn engine_update(&mut self, input: &[u8]) -> Result<Blob>;

    /// Processes the optional last chunk, flushes padding and ends the
    /// operation.
    ///
    /// # Returns
    /// The remaining output. For GCM encryption the tag is appended; for GCM
    /// decryption a tag mismatch yields `CryptoOperation`.
    fn engine_do_final(&mut self, input: Option<&[u8]>) -> Result<Blob>;
}

/// Key material handed between providers.
pub trait Key: ObjectBase + Send + Sync {
    /// Algorithm name as registered, e.g. `AES256`.
    fn algorithm(&self) -> &str;

    /// Encoding of `encoded()`; `RAW` for symmetric keys.
    fn format(&self) -> &str;

    /// Returns a copy of the encoded key material.
    fn encoded(&self) -> Result<Blob>;
}

pub mod openssl_md;
pub mod openssl_rand;
pub mod openssl_cert_chain_validator;
pub mod openssl_sym_key;
pub mod openssl_mac;
pub mod openssl_cipher;

pub use openssl_cert_chain_validator::OpensslCertChainValidatorSpi;
pub use openssl_cipher::OpensslCipherSpi;
pub use openssl_mac::OpensslMacSpi;
pub use openssl_md::OpensslMdSpi;
pub use openssl_rand::OpensslRandSpi;
pub use openssl_sym_key::{OpensslSymKey, OpensslSymKeyGeneratorSpi};
