//!
//! OpenSSL-backed HMAC provider.
//!
//! The key is loaded as an `EVP_PKEY_HMAC` and the tag is produced through the
//! backend's digest-sign interface, so key normalisation and padding stay in
//! OpenSSL.

use std::any::Any;

use openssl::md_ctx::MdCtx;
use openssl::pkey::PKey;

use super::openssl_sym_key::{OpensslSymKey, OPENSSL_SYM_KEY_CLASS};
use super::{Key, MacSpi};
use crate::blob::Blob;
use crate::error::{CryptoError, Result};
use crate::object::{downcast_checked, ObjectBase};
use crate::types::DigestAlgorithm;

pub const OPENSSL_MAC_CLASS: &str = "OpensslMac";

/// HMAC provider. `ctx` is present between `init` and `do_final`; `keyed`
/// records that a key has been bound at least once.
pub struct OpensslMacSpi {
    algorithm: DigestAlgorithm,
    ctx: Option<MdCtx>,
    keyed: bool,
}

impl OpensslMacSpi {
    pub fn create(name: &str) -> Result<Box<dyn MacSpi>> {
        let algorithm = match DigestAlgorithm::from_name(name) {
            Some(DigestAlgorithm::Md5) | None => {
                tracing::warn!("unsupported mac digest: {}", name);
                return Err(CryptoError::NotSupported(format!("mac digest {}", name)));
            }
            Some(alg) => alg,
        };
        tracing::debug!("created openssl mac provider for {}", name);
        Ok(Box::new(OpensslMacSpi { algorithm, ctx: None, keyed: false }))
    }

    fn not_initialised(&self) -> CryptoError {
        if self.keyed {
            CryptoError::CryptoOperation("mac must be re-initialised".to_string())
        } else {
            CryptoError::CryptoOperation("mac is not initialised".to_string())
        }
    }
}

impl ObjectBase for OpensslMacSpi {
    fn class(&self) -> &'static str {
        OPENSSL_MAC_CLASS
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl MacSpi for OpensslMacSpi {
    fn engine_init_mac(&mut self, key: &dyn Key) -> Result<()> {
        let key = downcast_checked::<OpensslSymKey, _>(key, OPENSSL_SYM_KEY_CLASS)?;
        if key.material().is_empty() {
            tracing::warn!("mac init with cleared key");
            return Err(CryptoError::invalid("mac key material is empty"));
        }
        let pkey = PKey::hmac(key.material())?;
        let mut ctx = MdCtx::new()?;
        ctx.digest_sign_init(Some(self.algorithm.md()), &pkey)?;
        self.ctx = Some(ctx);
        self.keyed = true;
        tracing::debug!("mac initialised with {} key", key.algorithm());
        Ok(())
    }

    fn engine_update_mac(&mut self, input: &[u8]) -> Result<()> {
        if input.is_empty() {
            tracing::warn!("mac update called with empty input");
            return Err(CryptoError::invalid("mac input is empty"));
        }
        match self.ctx.as_mut() {
            Some(ctx) => Ok(ctx.digest_sign_update(input)?),
            None => Err(self.not_initialised()),
        }
    }

    fn engine_do_final_mac(&mut self) -> Result<Blob> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) => ctx,
            None => return Err(self.not_initialised()),
        };
        let mut tag = Vec::new();
        tag.try_reserve_exact(self.algorithm.output_len() as usize)?;
        ctx.digest_sign_final_to_vec(&mut tag)?;
        Ok(Blob::new(tag))
    }

    fn engine_get_mac_length(&self) -> u32 {
        if self.keyed {
            self.algorithm.output_len()
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::OpensslSymKeyGeneratorSpi;
    use openssl::pkey::PKey;
    use openssl::sign::Signer;

    fn backend_hmac(alg: DigestAlgorithm, key: &[u8], data: &[u8]) -> Vec<u8> {
        let pkey = PKey::hmac(key).unwrap();
        let mut signer = Signer::new(alg.message_digest(), &pkey).unwrap();
        signer.update(data).unwrap();
        signer.sign_to_vec().unwrap()
    }

    #[test]
    fn agrees_with_backend_hmac() {
        let keygen = OpensslSymKeyGeneratorSpi::create("AES256").unwrap();
        let key = keygen.engine_generate_sym_key().unwrap();
        let material = key.encoded().unwrap();
        for alg in [
            DigestAlgorithm::Sha1,
            DigestAlgorithm::Sha224,
            DigestAlgorithm::Sha256,
            DigestAlgorithm::Sha384,
            DigestAlgorithm::Sha512,
        ] {
            let mut mac = OpensslMacSpi::create(alg.name()).unwrap();
            mac.engine_init_mac(&*key).unwrap();
            mac.engine_update_mac(b"hello ").unwrap();
            mac.engine_update_mac(b"world").unwrap();
            let out = mac.engine_do_final_mac().unwrap();
            assert_eq!(out.len() as u32, mac.engine_get_mac_length());
            assert_eq!(out.to_vec(), backend_hmac(alg, material.as_slice(), b"hello world"));
        }
    }

    #[test]
    fn keys_longer_than_a_block_match_backend() {
        let material = vec![0xA5u8; 200];
        let key = OpensslSymKey::for_tests(&material);
        let mut mac = OpensslMacSpi::create("SHA256").unwrap();
        mac.engine_init_mac(&key).unwrap();
        mac.engine_update_mac(b"data").unwrap();
        let out = mac.engine_do_final_mac().unwrap();
        assert_eq!(out.to_vec(), backend_hmac(DigestAlgorithm::Sha256, &material, b"data"));
    }

    #[test]
    fn use_before_init_fails() {
        let mut mac = OpensslMacSpi::create("SHA1").unwrap();
        assert_eq!(mac.engine_get_mac_length(), 0);
        assert!(matches!(mac.engine_update_mac(b"x"), Err(CryptoError::CryptoOperation(_))));
        assert!(matches!(mac.engine_do_final_mac(), Err(CryptoError::CryptoOperation(_))));
    }

    #[test]
    fn final_requires_reinit() {
        let keygen = OpensslSymKeyGeneratorSpi::create("AES128").unwrap();
        let key = keygen.engine_generate_sym_key().unwrap();
        let mut mac = OpensslMacSpi::create("SHA384").unwrap();
        mac.engine_init_mac(&*key).unwrap();
        let first = mac.engine_do_final_mac().unwrap();
        assert!(matches!(mac.engine_do_final_mac(), Err(CryptoError::CryptoOperation(_))));
        mac.engine_init_mac(&*key).unwrap();
        assert_eq!(mac.engine_do_final_mac().unwrap(), first);
    }

    #[test]
    fn foreign_key_is_rejected() {
        struct ForeignKey;
        impl ObjectBase for ForeignKey {
            fn class(&self) -> &'static str {
                "ForeignKey"
            }
            fn as_any(&self) -> &dyn Any {
                self
            }
        }
        impl Key for ForeignKey {
            fn algorithm(&self) -> &str {
                "AES128"
            }
            fn format(&self) -> &str {
                "RAW"
            }
            fn encoded(&self) -> Result<Blob> {
                Ok(Blob::new(vec![1; 16]))
            }
        }

        let mut mac = OpensslMacSpi::create("SHA256").unwrap();
        assert!(matches!(mac.engine_init_mac(&ForeignKey), Err(CryptoError::InvalidParams(_))));
        assert_eq!(mac.engine_get_mac_length(), 0);
    }

    #[test]
    fn md5_is_not_a_mac_digest() {
        assert!(matches!(OpensslMacSpi::create("MD5").err(), Some(CryptoError::NotSupported(_))));
    }
}
