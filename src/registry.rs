//!
//! Capability registry.
//!
//! One immutable table per capability family maps an exact algorithm name to
//! the provider constructor that serves it. Tables are plain `static` arrays
//! of `fn` pointers, selected by [`ProviderKind`].

use crate::config::{Limits, ProviderKind};
use crate::crypto::{
    CertChainValidatorSpi, CipherSpi, MacSpi, MdSpi, OpensslCertChainValidatorSpi,
    OpensslCipherSpi, OpensslMacSpi, OpensslMdSpi, OpensslRandSpi, OpensslSymKeyGeneratorSpi,
    RandSpi, SymKeyGeneratorSpi,
};
use crate::error::{CryptoError, Result};

pub type MdCreate = fn(&str) -> Result<Box<dyn MdSpi>>;
pub type RandCreate = fn(&str) -> Result<Box<dyn RandSpi>>;
pub type CertChainValidatorCreate = fn(&str) -> Result<Box<dyn CertChainValidatorSpi>>;
pub type SymKeyGeneratorCreate = fn(&str) -> Result<Box<dyn SymKeyGeneratorSpi>>;
pub type MacCreate = fn(&str) -> Result<Box<dyn MacSpi>>;
/// Receives the full `ALG|MODE|PADDING` name; the table is keyed on `ALG`.
pub type CipherCreate = fn(&str) -> Result<Box<dyn CipherSpi>>;

/// Algorithm descriptor: a name and the constructor registered for it.
#[derive(Debug, Clone, Copy)]
pub struct Ability<C: 'static> {
    pub name: &'static str,
    pub create: C,
}

static OPENSSL_MD_ABILITIES: [Ability<MdCreate>; 6] = [
    Ability { name: "SHA1", create: OpensslMdSpi::create },
    Ability { name: "SHA224", create: OpensslMdSpi::create },
    Ability { name: "SHA256", create: OpensslMdSpi::create },
    Ability { name: "SHA384", create: OpensslMdSpi::create },
    Ability { name: "SHA512", create: OpensslMdSpi::create },
    Ability { name: "MD5", create: OpensslMdSpi::create },
];

static OPENSSL_RAND_ABILITIES: [Ability<RandCreate>; 1] =
    [Ability { name: "OpensslRand", create: OpensslRandSpi::create }];

static OPENSSL_CERT_CHAIN_VALIDATOR_ABILITIES: [Ability<CertChainValidatorCreate>; 1] =
    [Ability { name: "PKIX", create: OpensslCertChainValidatorSpi::create }];

static OPENSSL_SYM_KEY_ABILITIES: [Ability<SymKeyGeneratorCreate>; 4] = [
    Ability { name: "AES128", create: OpensslSymKeyGeneratorSpi::create },
    Ability { name: "AES192", create: OpensslSymKeyGeneratorSpi::create },
    Ability { name: "AES256", create: OpensslSymKeyGeneratorSpi::create },
    Ability { name: "3DES192", create: OpensslSymKeyGeneratorSpi::create },
];

static OPENSSL_MAC_ABILITIES: [Ability<MacCreate>; 5] = [
    Ability { name: "SHA1", create: OpensslMacSpi::create },
    Ability { name: "SHA224", create: OpensslMacSpi::create },
    Ability { name: "SHA256", create: OpensslMacSpi::create },
    Ability { name: "SHA384", create: OpensslMacSpi::create },
    Ability { name: "SHA512", create: OpensslMacSpi::create },
];

static OPENSSL_CIPHER_ABILITIES: [Ability<CipherCreate>; 4] = [
    Ability { name: "AES128", create: OpensslCipherSpi::create },
    Ability { name: "AES192", create: OpensslCipherSpi::create },
    Ability { name: "AES256", create: OpensslCipherSpi::create },
    Ability { name: "3DES192", create: OpensslCipherSpi::create },
];

pub fn md_abilities(provider: ProviderKind) -> &'static [Ability<MdCreate>] {
    match provider {
        ProviderKind::Openssl => &OPENSSL_MD_ABILITIES,
    }
}

pub fn rand_abilities(provider: ProviderKind) -> &'static [Ability<RandCreate>] {
    match provider {
        ProviderKind::Openssl => &OPENSSL_RAND_ABILITIES,
    }
}

pub fn cert_chain_validator_abilities(
    provider: ProviderKind,
) -> &'static [Ability<CertChainValidatorCreate>] {
    match provider {
        ProviderKind::Openssl => &OPENSSL_CERT_CHAIN_VALIDATOR_ABILITIES,
    }
}

pub fn sym_key_generator_abilities(
    provider: ProviderKind,
) -> &'static [Ability<SymKeyGeneratorCreate>] {
    match provider {
        ProviderKind::Openssl => &OPENSSL_SYM_KEY_ABILITIES,
    }
}

pub fn mac_abilities(provider: ProviderKind) -> &'static [Ability<MacCreate>] {
    match provider {
        ProviderKind::Openssl => &OPENSSL_MAC_ABILITIES,
    }
}

pub fn cipher_abilities(provider: ProviderKind) -> &'static [Ability<CipherCreate>] {
    match provider {
        ProviderKind::Openssl => &OPENSSL_CIPHER_ABILITIES,
    }
}

/// Linear scan with case-sensitive exact match.
pub fn find_ability<C: Copy>(table: &[Ability<C>], name: &str) -> Option<C> {
    table.iter().find(|ability| ability.name == name).map(|ability| ability.create)
}

pub fn validate_algorithm_name(name: &str, limits: &Limits) -> Result<()> {
    if name.is_empty() || name.len() > limits.max_algorithm_name_len {
        tracing::warn!("algorithm name of {} bytes rejected", name.len());
        return Err(CryptoError::invalid(format!(
            "algorithm name must be 1..={} bytes, got {}",
            limits.max_algorithm_name_len,
            name.len()
        )));
    }
    Ok(())
}

fn check_limits(family: &str, limits: &Limits) -> Result<()> {
    let checked = limits.validate();
    if let Err(e) = &checked {
        tracing::warn!("{} rejected out-of-range limits: {}", family, e);
    }
    checked
}

fn lookup<C: Copy>(table: &[Ability<C>], family: &str, name: &str) -> Result<C> {
    find_ability(table, name).ok_or_else(|| {
        tracing::warn!("{} algorithm {} is not registered", family, name);
        CryptoError::NotSupported(format!("{} algorithm {}", family, name))
    })
}

/// Validates `limits` and `name`, then resolves `name` in `table`.
///
/// `limits` may come from a hand-built [`crate::FrameworkConfig`], so the
/// hard maxima are re-checked here rather than trusted.
pub(crate) fn resolve<C: Copy>(
    table: &[Ability<C>],
    family: &str,
    name: &str,
    limits: &Limits,
) -> Result<C> {
    check_limits(family, limits)?;
    validate_algorithm_name(name, limits)?;
    lookup(table, family, name)
}

/// Like [`resolve`], but looks up the algorithm component of an
/// `ALG|MODE|PADDING` transformation. Mode and padding are left to the
/// provider constructor.
pub(crate) fn resolve_transformation<C: Copy>(
    table: &[Ability<C>],
    family: &str,
    name: &str,
    limits: &Limits,
) -> Result<C> {
    check_limits(family, limits)?;
    validate_algorithm_name(name, limits)?;
    let algorithm = name.split('|').next().unwrap_or(name);
    lookup(table, family, algorithm)
}
