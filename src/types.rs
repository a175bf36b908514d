//!
//! Algorithm enumerations shared by the digest, MAC, symmetric key and cipher
//! providers. Names are the exact strings the registry accepts; matching is
//! case-sensitive.

use std::fmt;

use crate::error::{CryptoError, Result};

/// Message digest algorithms, also used as the HMAC underlying hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DigestAlgorithm {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Md5,
}

impl DigestAlgorithm {
    pub const ALL: [DigestAlgorithm; 6] = [
        DigestAlgorithm::Sha1,
        DigestAlgorithm::Sha224,
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha384,
        DigestAlgorithm::Sha512,
        DigestAlgorithm::Md5,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SHA1" => Some(DigestAlgorithm::Sha1),
            "SHA224" => Some(DigestAlgorithm::Sha224),
            "SHA256" => Some(DigestAlgorithm::Sha256),
            "SHA384" => Some(DigestAlgorithm::Sha384),
            "SHA512" => Some(DigestAlgorithm::Sha512),
            "MD5" => Some(DigestAlgorithm::Md5),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "SHA1",
            DigestAlgorithm::Sha224 => "SHA224",
            DigestAlgorithm::Sha256 => "SHA256",
            DigestAlgorithm::Sha384 => "SHA384",
            DigestAlgorithm::Sha512 => "SHA512",
            DigestAlgorithm::Md5 => "MD5",
        }
    }

    /// Output width in bytes.
    pub fn output_len(self) -> u32 {
        match self {
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha224 => 28,
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
            DigestAlgorithm::Md5 => 16,
        }
    }

    pub(crate) fn message_digest(self) -> openssl::hash::MessageDigest {
        use openssl::hash::MessageDigest;
        match self {
            DigestAlgorithm::Sha1 => MessageDigest::sha1(),
            DigestAlgorithm::Sha224 => MessageDigest::sha224(),
            DigestAlgorithm::Sha256 => MessageDigest::sha256(),
            DigestAlgorithm::Sha384 => MessageDigest::sha384(),
            DigestAlgorithm::Sha512 => MessageDigest::sha512(),
            DigestAlgorithm::Md5 => MessageDigest::md5(),
        }
    }

    /// Backend digest handle for the `EVP_MD_CTX` based interfaces.
    pub(crate) fn md(self) -> &'static openssl::md::MdRef {
        use openssl::md::Md;
        match self {
            DigestAlgorithm::Sha1 => Md::sha1(),
            DigestAlgorithm::Sha224 => Md::sha224(),
            DigestAlgorithm::Sha256 => Md::sha256(),
            DigestAlgorithm::Sha384 => Md::sha384(),
            DigestAlgorithm::Sha512 => Md::sha512(),
            DigestAlgorithm::Md5 => Md::md5(),
        }
    }
}

/// Symmetric key algorithms the key generator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SymKeyAlgorithm {
    Aes128,
    Aes192,
    Aes256,
    TripleDes192,
}

impl SymKeyAlgorithm {
    pub const ALL: [SymKeyAlgorithm; 4] = [
        SymKeyAlgorithm::Aes128,
        SymKeyAlgorithm::Aes192,
        SymKeyAlgorithm::Aes256,
        SymKeyAlgorithm::TripleDes192,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "AES128" => Some(SymKeyAlgorithm::Aes128),
            "AES192" => Some(SymKeyAlgorithm::Aes192),
            "AES256" => Some(SymKeyAlgorithm::Aes256),
            "3DES192" => Some(SymKeyAlgorithm::TripleDes192),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SymKeyAlgorithm::Aes128 => "AES128",
            SymKeyAlgorithm::Aes192 => "AES192",
            SymKeyAlgorithm::Aes256 => "AES256",
            SymKeyAlgorithm::TripleDes192 => "3DES192",
        }
    }

    /// Key size in bytes.
    pub fn key_len(self) -> usize {
        match self {
            SymKeyAlgorithm::Aes128 => 16,
            SymKeyAlgorithm::Aes192 | SymKeyAlgorithm::TripleDes192 => 24,
            SymKeyAlgorithm::Aes256 => 32,
        }
    }
}

/// Direction of a cipher operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CryptoMode {
    Encrypt,
    Decrypt,
}

/// Block cipher mode of operation. `Cfb` is an alias of the full-block
/// feedback width (`Cfb128` for AES, 64-bit feedback for 3DES).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CipherMode {
    Ecb,
    Cbc,
    Ctr,
    Ofb,
    Cfb,
    Cfb1,
    Cfb8,
    Cfb128,
    Gcm,
}

impl CipherMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ECB" => Some(CipherMode::Ecb),
            "CBC" => Some(CipherMode::Cbc),
            "CTR" => Some(CipherMode::Ctr),
            "OFB" => Some(CipherMode::Ofb),
            "CFB" => Some(CipherMode::Cfb),
            "CFB1" => Some(CipherMode::Cfb1),
            "CFB8" => Some(CipherMode::Cfb8),
            "CFB128" => Some(CipherMode::Cfb128),
            "GCM" => Some(CipherMode::Gcm),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CipherMode::Ecb => "ECB",
            CipherMode::Cbc => "CBC",
            CipherMode::Ctr => "CTR",
            CipherMode::Ofb => "OFB",
            CipherMode::Cfb => "CFB",
            CipherMode::Cfb1 => "CFB1",
            CipherMode::Cfb8 => "CFB8",
            CipherMode::Cfb128 => "CFB128",
            CipherMode::Gcm => "GCM",
        }
    }

    pub fn is_aead(self) -> bool {
        self == CipherMode::Gcm
    }
}

/// Block padding scheme. PKCS5 and PKCS7 produce identical output for the
/// block sizes offered here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Padding {
    NoPadding,
    Pkcs5,
    Pkcs7,
}

impl Padding {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "NoPadding" => Some(Padding::NoPadding),
            "PKCS5" => Some(Padding::Pkcs5),
            "PKCS7" => Some(Padding::Pkcs7),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Padding::NoPadding => "NoPadding",
            Padding::Pkcs5 => "PKCS5",
            Padding::Pkcs7 => "PKCS7",
        }
    }
}

/// A parsed `ALG|MODE|PADDING` cipher name, e.g. `AES128|CBC|PKCS7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transformation {
    pub algorithm: SymKeyAlgorithm,
    pub mode: CipherMode,
    pub padding: Padding,
}

impl Transformation {
    /// Parses a transformation name.
    ///
    /// # Returns
    ///
    /// * `InvalidParams` - the name does not have exactly three components, or
    ///   the mode or padding component is unknown
    /// * `NotSupported` - the algorithm component is not a known key algorithm
    pub fn parse(name: &str) -> Result<Self> {
        let parts: Vec<&str> = name.split('|').collect();
        let [algorithm, mode, padding] = parts[..] else {
            return Err(CryptoError::invalid(format!(
                "cipher name must be ALG|MODE|PADDING, got {}",
                name
            )));
        };
        let algorithm = SymKeyAlgorithm::from_name(algorithm)
            .ok_or_else(|| CryptoError::NotSupported(format!("cipher algorithm {}", algorithm)))?;
        let mode = CipherMode::from_name(mode)
            .ok_or_else(|| CryptoError::invalid(format!("unknown cipher mode {}", mode)))?;
        let padding = Padding::from_name(padding)
            .ok_or_else(|| CryptoError::invalid(format!("unknown cipher padding {}", padding)))?;
        Ok(Transformation { algorithm, mode, padding })
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.algorithm.name(), self.mode.name(), self.padding.name())
    }
}

/// Per-operation cipher parameters passed to `init`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CipherParams {
    /// No parameters. Only ECB accepts this.
    #[default]
    None,
    /// Initialisation vector for CBC, CTR, OFB and the CFB modes. Must be one
    /// cipher block long.
    Iv(Vec<u8>),
    /// GCM nonce (12 bytes), additional authenticated data (1..=2048 bytes)
    /// and tag (1..=16 bytes). When encrypting only the tag length is read;
    /// the computed tag is appended to the `do_final` output.
    Gcm { iv: Vec<u8>, aad: Vec<u8>, tag: Vec<u8> },
}
