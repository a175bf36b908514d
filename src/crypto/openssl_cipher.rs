//!
//! OpenSSL-backed symmetric cipher provider (AES and 3DES over `EVP_CIPHER`).
//!
//! One provider serves one transformation. `init` binds a key and starts an
//! operation; `do_final` ends it, after which the provider must be
//! re-initialised. Any backend failure mid-operation also ends it.

use std::any::Any;

use openssl::symm::{Cipher as BackendCipher, Crypter, Mode};

use super::openssl_sym_key::{OpensslSymKey, OPENSSL_SYM_KEY_CLASS};
use super::{CipherSpi, Key};
use crate::blob::Blob;
use crate::error::{CryptoError, Result};
use crate::object::{downcast_checked, ObjectBase};
use crate::types::{CipherMode, CipherParams, CryptoMode, Padding, SymKeyAlgorithm, Transformation};

pub const OPENSSL_CIPHER_CLASS: &str = "OpensslCipher";

pub const GCM_IV_LEN: usize = 12;
pub const MAX_AAD_LEN: usize = 2048;
pub const MAX_GCM_TAG_LEN: usize = 16;

/// Backend cipher for a transformation, or `None` when the mode is not
/// offered for that algorithm.
fn backend_cipher(t: &Transformation) -> Option<BackendCipher> {
    use CipherMode::*;
    use SymKeyAlgorithm::*;
    let cipher = match (t.algorithm, t.mode) {
        (Aes128, Ecb) => BackendCipher::aes_128_ecb(),
        (Aes128, Cbc) => BackendCipher::aes_128_cbc(),
        (Aes128, Ctr) => BackendCipher::aes_128_ctr(),
        (Aes128, Ofb) => BackendCipher::aes_128_ofb(),
        (Aes128, Cfb | Cfb128) => BackendCipher::aes_128_cfb128(),
        (Aes128, Cfb1) => BackendCipher::aes_128_cfb1(),
        (Aes128, Cfb8) => BackendCipher::aes_128_cfb8(),
        (Aes128, Gcm) => BackendCipher::aes_128_gcm(),
        (Aes192, Ecb) => BackendCipher::aes_192_ecb(),
        (Aes192, Cbc) => BackendCipher::aes_192_cbc(),
        (Aes192, Ctr) => BackendCipher::aes_192_ctr(),
        (Aes192, Ofb) => BackendCipher::aes_192_ofb(),
        (Aes192, Cfb | Cfb128) => BackendCipher::aes_192_cfb128(),
        (Aes192, Cfb1) => BackendCipher::aes_192_cfb1(),
        (Aes192, Cfb8) => BackendCipher::aes_192_cfb8(),
        (Aes192, Gcm) => BackendCipher::aes_192_gcm(),
        (Aes256, Ecb) => BackendCipher::aes_256_ecb(),
        (Aes256, Cbc) => BackendCipher::aes_256_cbc(),
        (Aes256, Ctr) => BackendCipher::aes_256_ctr(),
        (Aes256, Ofb) => BackendCipher::aes_256_ofb(),
        (Aes256, Cfb | Cfb128) => BackendCipher::aes_256_cfb128(),
        (Aes256, Cfb1) => BackendCipher::aes_256_cfb1(),
        (Aes256, Cfb8) => BackendCipher::aes_256_cfb8(),
        (Aes256, Gcm) => BackendCipher::aes_256_gcm(),
        (TripleDes192, Ecb) => BackendCipher::des_ede3(),
        (TripleDes192, Cbc) => BackendCipher::des_ede3_cbc(),
        (TripleDes192, Ofb) => BackendCipher::des_ede3_ofb(),
        (TripleDes192, Cfb) => BackendCipher::des_ede3_cfb64(),
        (TripleDes192, Cfb8) => BackendCipher::des_ede3_cfb8(),
        (TripleDes192, _) => return None,
    };
    Some(cipher)
}

enum AeadTag {
    /// Encrypting: append a tag of this many bytes to the final output.
    Emit(usize),
    /// Decrypting: the tag the ciphertext must authenticate against.
    Expect(Vec<u8>),
}

struct Operation {
    crypter: Crypter,
    tag: Option<AeadTag>,
}

pub struct OpensslCipherSpi {
    transformation: Transformation,
    cipher: BackendCipher,
    op: Option<Operation>,
}

fn scratch(len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)?;
    buf.resize(len, 0);
    Ok(buf)
}

impl OpensslCipherSpi {
    /// Registry constructor. `name` is the full `ALG|MODE|PADDING` string.
    pub fn create(name: &str) -> Result<Box<dyn CipherSpi>> {
        let transformation = Transformation::parse(name)?;
        let cipher = backend_cipher(&transformation).ok_or_else(|| {
            tracing::warn!("unsupported cipher transformation: {}", name);
            CryptoError::NotSupported(format!("cipher transformation {}", name))
        })?;
        tracing::debug!("created openssl cipher provider for {}", transformation);
        Ok(Box::new(OpensslCipherSpi { transformation, cipher, op: None }))
    }

    pub fn transformation(&self) -> Transformation {
        self.transformation
    }

    /// Checks `params` against the mode and splits out the IV, AAD and tag.
    fn unpack<'p>(
        &self,
        mode: CryptoMode,
        params: &'p CipherParams,
    ) -> Result<(Option<&'p [u8]>, Option<&'p [u8]>, Option<AeadTag>)> {
        if self.transformation.mode.is_aead() {
            let CipherParams::Gcm { iv, aad, tag } = params else {
                return Err(CryptoError::invalid("GCM requires GCM parameters"));
            };
            if iv.len() != GCM_IV_LEN {
                return Err(CryptoError::invalid(format!(
                    "GCM nonce must be {} bytes, got {}",
                    GCM_IV_LEN,
                    iv.len()
                )));
            }
            if aad.is_empty() || aad.len() > MAX_AAD_LEN {
                return Err(CryptoError::invalid(format!(
                    "GCM aad must be 1..={} bytes, got {}",
                    MAX_AAD_LEN,
                    aad.len()
                )));
            }
            if tag.is_empty() || tag.len() > MAX_GCM_TAG_LEN {
                return Err(CryptoError::invalid(format!(
                    "GCM tag must be 1..={} bytes, got {}",
                    MAX_GCM_TAG_LEN,
                    tag.len()
                )));
            }
            let tag = match mode {
                CryptoMode::Encrypt => AeadTag::Emit(tag.len()),
                CryptoMode::Decrypt => AeadTag::Expect(tag.clone()),
            };
            return Ok((Some(iv), Some(aad), Some(tag)));
        }

        match (self.cipher.iv_len(), params) {
            (None, CipherParams::None) => Ok((None, None, None)),
            (Some(expected), CipherParams::Iv(iv)) if iv.len() == expected => {
                Ok((Some(iv), None, None))
            }
            (Some(expected), CipherParams::Iv(iv)) => Err(CryptoError::invalid(format!(
                "{} iv must be {} bytes, got {}",
                self.transformation,
                expected,
                iv.len()
            ))),
            _ => Err(CryptoError::invalid(format!(
                "parameters do not match {}",
                self.transformation
            ))),
        }
    }

    fn running(&mut self) -> Result<&mut Operation> {
        self.op
            .as_mut()
            .ok_or_else(|| CryptoError::CryptoOperation("cipher is not initialised".to_string()))
    }
}

impl ObjectBase for OpensslCipherSpi {
    fn class(&self) -> &'static str {
        OPENSSL_CIPHER_CLASS
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl CipherSpi for OpensslCipherSpi {
    fn engine_init(&mut self, mode: CryptoMode, key: &dyn Key, params: &CipherParams) -> Result<()> {
        self.op = None;
        let key = downcast_checked::<OpensslSymKey, _>(key, OPENSSL_SYM_KEY_CLASS)?;
        if key.key_algorithm() != self.transformation.algorithm {
            tracing::warn!(
                "{} key cannot drive {}",
                key.key_algorithm().name(),
                self.transformation
            );
            return Err(CryptoError::invalid(format!(
                "{} key does not match {}",
                key.key_algorithm().name(),
                self.transformation
            )));
        }
        if key.material().is_empty() {
            tracing::warn!("cipher init with cleared key");
            return Err(CryptoError::invalid("cipher key material is empty"));
        }
        let (iv, aad, tag) = self.unpack(mode, params)?;

        let backend_mode = match mode {
            CryptoMode::Encrypt => Mode::Encrypt,
            CryptoMode::Decrypt => Mode::Decrypt,
        };
        let mut crypter = Crypter::new(self.cipher, backend_mode, key.material(), iv)?;
        crypter.pad(self.transformation.padding != Padding::NoPadding);
        if let Some(aad) = aad {
            crypter.aad_update(aad)?;
        }
        self.op = Some(Operation { crypter, tag });
        tracing::debug!("{} initialised for {:?}", self.transformation, mode);
        Ok(())
    }

    fn engine_update(&mut self, input: &[u8]) -> Result<Blob> {
        if input.is_empty() {
            tracing::warn!("cipher update called with empty input");
            return Err(CryptoError::invalid("cipher input is empty"));
        }
        let block_size = self.cipher.block_size();
        let op = self.running()?;
        let mut out = scratch(input.len() + block_size)?;
        match op.crypter.update(input, &mut out) {
            Ok(n) => {
                out.truncate(n);
                Ok(Blob::new(out))
            }
            Err(e) => {
                self.op = None;
                tracing::warn!("{} update failed", self.transformation);
                Err(e.into())
            }
        }
    }

    fn engine_do_final(&mut self, input: Option<&[u8]>) -> Result<Blob> {
        let mut op = self
            .op
            .take()
            .ok_or_else(|| CryptoError::CryptoOperation("cipher is not initialised".to_string()))?;
        let input = input.unwrap_or_default();
        let block_size = self.cipher.block_size();
        let tag_len = match op.tag {
            Some(AeadTag::Emit(len)) => len,
            _ => 0,
        };
        let mut out = scratch(input.len() + 2 * block_size + tag_len)?;

        let mut n = 0;
        if !input.is_empty() {
            n = op.crypter.update(input, &mut out)?;
        }
        if let Some(AeadTag::Expect(tag)) = &op.tag {
            op.crypter.set_tag(tag)?;
        }
        n += op.crypter.finalize(&mut out[n..]).map_err(|e| {
            tracing::warn!("{} final block rejected", self.transformation);
            CryptoError::from(e)
        })?;
        if tag_len > 0 {
            op.crypter.get_tag(&mut out[n..n + tag_len])?;
            n += tag_len;
        }
        out.truncate(n);
        Ok(Blob::new(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::OpensslSymKeyGeneratorSpi;

    fn key(algorithm: &str) -> Box<dyn Key> {
        OpensslSymKeyGeneratorSpi::create(algorithm).unwrap().engine_generate_sym_key().unwrap()
    }

    fn gcm(tag: Vec<u8>) -> CipherParams {
        CipherParams::Gcm { iv: vec![7; GCM_IV_LEN], aad: b"header".to_vec(), tag }
    }

    #[test]
    fn cbc_matches_backend_one_shot() {
        let key = key("AES128");
        let material = key.encoded().unwrap();
        let iv = [0x11u8; 16];
        let mut spi = OpensslCipherSpi::create("AES128|CBC|PKCS7").unwrap();
        spi.engine_init(CryptoMode::Encrypt, &*key, &CipherParams::Iv(iv.to_vec())).unwrap();
        let mut ct = spi.engine_update(b"thirteen byte").unwrap().to_vec();
        ct.extend_from_slice(spi.engine_do_final(None).unwrap().as_slice());
        let expected =
            openssl::symm::encrypt(BackendCipher::aes_128_cbc(), material.as_slice(), Some(&iv), b"thirteen byte")
                .unwrap();
        assert_eq!(ct, expected);
    }

    #[test]
    fn gcm_appends_tag_and_authenticates() {
        let key = key("AES256");
        let mut spi = OpensslCipherSpi::create("AES256|GCM|NoPadding").unwrap();
        spi.engine_init(CryptoMode::Encrypt, &*key, &gcm(vec![0; 16])).unwrap();
        let sealed = spi.engine_do_final(Some(b"attack at dawn")).unwrap().to_vec();
        assert_eq!(sealed.len(), 14 + 16);
        let (ct, tag) = sealed.split_at(14);

        spi.engine_init(CryptoMode::Decrypt, &*key, &gcm(tag.to_vec())).unwrap();
        assert_eq!(spi.engine_do_final(Some(ct)).unwrap().as_slice(), b"attack at dawn");

        let mut bad_tag = tag.to_vec();
        bad_tag[0] ^= 1;
        spi.engine_init(CryptoMode::Decrypt, &*key, &gcm(bad_tag)).unwrap();
        assert!(matches!(spi.engine_do_final(Some(ct)), Err(CryptoError::CryptoOperation(_))));
    }

    #[test]
    fn gcm_parameters_are_checked() {
        let key = key("AES128");
        let mut spi = OpensslCipherSpi::create("AES128|GCM|NoPadding").unwrap();
        let short_iv = CipherParams::Gcm { iv: vec![0; 16], aad: vec![1], tag: vec![0; 16] };
        let no_aad = CipherParams::Gcm { iv: vec![0; 12], aad: Vec::new(), tag: vec![0; 16] };
        let long_tag = gcm(vec![0; 17]);
        for params in [CipherParams::None, CipherParams::Iv(vec![0; 12]), short_iv, no_aad, long_tag] {
            assert!(
                matches!(spi.engine_init(CryptoMode::Encrypt, &*key, &params), Err(CryptoError::InvalidParams(_))),
                "{:?}",
                params
            );
        }
    }

    #[test]
    fn iv_must_match_block_size() {
        let key = key("3DES192");
        let mut spi = OpensslCipherSpi::create("3DES192|CBC|PKCS5").unwrap();
        for params in [CipherParams::None, CipherParams::Iv(vec![0; 16])] {
            assert!(matches!(
                spi.engine_init(CryptoMode::Encrypt, &*key, &params),
                Err(CryptoError::InvalidParams(_))
            ));
        }
        spi.engine_init(CryptoMode::Encrypt, &*key, &CipherParams::Iv(vec![0; 8])).unwrap();
    }

    #[test]
    fn key_algorithm_must_match_transformation() {
        let key = key("AES192");
        let mut spi = OpensslCipherSpi::create("AES128|ECB|PKCS7").unwrap();
        assert!(matches!(
            spi.engine_init(CryptoMode::Encrypt, &*key, &CipherParams::None),
            Err(CryptoError::InvalidParams(_))
        ));
    }

    #[test]
    fn triple_des_modes_are_limited() {
        for name in ["3DES192|GCM|NoPadding", "3DES192|CTR|NoPadding", "3DES192|CFB1|NoPadding"] {
            assert!(matches!(OpensslCipherSpi::create(name).err(), Some(CryptoError::NotSupported(_))), "{}", name);
        }
        assert!(OpensslCipherSpi::create("3DES192|OFB|NoPadding").is_ok());
    }

    #[test]
    fn use_before_init_fails() {
        let mut spi = OpensslCipherSpi::create("AES128|CTR|NoPadding").unwrap();
        assert!(matches!(spi.engine_update(b"x"), Err(CryptoError::CryptoOperation(_))));
        assert!(matches!(spi.engine_do_final(None), Err(CryptoError::CryptoOperation(_))));
    }

    #[test]
    fn final_ends_the_operation() {
        let key = key("AES128");
        let mut spi = OpensslCipherSpi::create("AES128|ECB|PKCS7").unwrap();
        spi.engine_init(CryptoMode::Encrypt, &*key, &CipherParams::None).unwrap();
        assert_eq!(spi.engine_do_final(Some(b"abc")).unwrap().len(), 16);
        assert!(matches!(spi.engine_update(b"abc"), Err(CryptoError::CryptoOperation(_))));
    }

    #[test]
    fn unpadded_partial_block_fails_at_final() {
        let key = key("AES128");
        let mut spi = OpensslCipherSpi::create("AES128|CBC|NoPadding").unwrap();
        spi.engine_init(CryptoMode::Encrypt, &*key, &CipherParams::Iv(vec![0; 16])).unwrap();
        assert!(matches!(spi.engine_do_final(Some(b"short")), Err(CryptoError::CryptoOperation(_))));
    }
}
