#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(deprecated)]

//!
//! CryptoFrame-Core is a pluggable cryptographic framework core.
//!
//! Callers create a façade by algorithm name for one capability family
//! (message digest, random generator, certificate-chain validator, symmetric
//! key generator, MAC, symmetric cipher). The name is resolved through an
//! immutable capability registry to a backend provider, currently OpenSSL.
//! Façades validate input, providers do the work, and every failure is
//! reported through one error taxonomy ([`error::ResultCode`]).

// Result codes and the error type shared by every family.
pub mod error;

// Class-tag identity for framework objects.
pub mod object;

// Owned zeroize-on-drop buffers and the certificate-chain wire type.
pub mod blob;

// Size bounds and provider selection.
pub mod config;

// Algorithm enumerations.
pub mod types;

// Certificate-chain wire codec.
pub mod codec;

// Provider interfaces and the OpenSSL providers.
pub mod crypto;

// Algorithm name -> provider constructor tables.
pub mod registry;

// Caller-facing façades.
pub mod api;

#[cfg(feature = "log-subscriber")]
pub mod logging;

pub use api::{CertChainValidator, Cipher, Mac, MessageDigest, Random, SymKeyGenerator};
pub use blob::{Blob, BlobArray, CertChainData, EncodingFormat};
pub use config::{FrameworkConfig, Limits, ProviderKind};
pub use crypto::Key;
pub use error::{BusinessError, CryptoError, Result, ResultCode};
pub use object::{destroy, ObjectBase};
pub use types::{CipherParams, CryptoMode};
