//!
//! Caller-facing façades, one per capability family.
//!
//! A façade validates arguments against the configured [`crate::config::Limits`],
//! owns exactly one provider obtained from the registry, and forwards to it.
//! Dropping a façade (or passing it to [`crate::object::destroy`]) releases the
//! provider with it.

pub mod cert_chain_validator;
pub mod cipher;
pub mod mac;
pub mod md;
pub mod rand;
pub mod sym_key;

pub use cert_chain_validator::CertChainValidator;
pub use cipher::Cipher;
pub use mac::Mac;
pub use md::MessageDigest;
pub use rand::Random;
pub use sym_key::SymKeyGenerator;
