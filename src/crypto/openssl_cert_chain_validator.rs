//!
//! OpenSSL-backed certificate-chain validator.
//!
//! The leaf (index 0) is verified against a trust store built from every other
//! entry, added from the highest index (the presumed anchor) down to index 1.
//! The validity-window check is switched off: the validator answers whether the
//! chain is structurally and cryptographically sound, independent of the clock.

use std::any::Any;

use openssl::stack::Stack;
use openssl::x509::store::X509StoreBuilder;
use openssl::x509::verify::X509VerifyFlags;
use openssl::x509::{X509StoreContext, X509};

use super::CertChainValidatorSpi;
use crate::blob::{Blob, BlobArray, EncodingFormat};
use crate::error::{CryptoError, Result};
use crate::object::ObjectBase;

pub const OPENSSL_CERT_CHAIN_VALIDATOR_CLASS: &str = "OpensslX509CertChainValidator";
pub const PKIX_ALGORITHM: &str = "PKIX";

const X509_V_ERR_CERT_SIGNATURE_FAILURE: i32 = 7;
const X509_V_ERR_CERT_NOT_YET_VALID: i32 = 9;
const X509_V_ERR_CERT_HAS_EXPIRED: i32 = 10;
const X509_V_ERR_UNABLE_TO_GET_ISSUER_CERT_LOCALLY: i32 = 20;
const X509_V_ERR_KEYUSAGE_NO_CERTSIGN: i32 = 32;
const X509_V_ERR_KEYUSAGE_NO_DIGITAL_SIGNATURE: i32 = 39;

/// Backend verify codes with a dedicated result code. Anything else is a
/// generic crypto operation failure.
const VERIFY_ERROR_TABLE: [(i32, CryptoError); 6] = [
    (X509_V_ERR_CERT_SIGNATURE_FAILURE, CryptoError::CertSignatureFailure),
    (X509_V_ERR_CERT_NOT_YET_VALID, CryptoError::CertNotYetValid),
    (X509_V_ERR_CERT_HAS_EXPIRED, CryptoError::CertHasExpired),
    (X509_V_ERR_UNABLE_TO_GET_ISSUER_CERT_LOCALLY, CryptoError::IssuerCertUnreachable),
    (X509_V_ERR_KEYUSAGE_NO_CERTSIGN, CryptoError::KeyUsageNoCertSign),
    (X509_V_ERR_KEYUSAGE_NO_DIGITAL_SIGNATURE, CryptoError::KeyUsageNoDigitalSignature),
];

pub(crate) fn translate_verify_error(raw: i32, detail: &str) -> CryptoError {
    VERIFY_ERROR_TABLE
        .into_iter()
        .find(|(code, _)| *code == raw)
        .map(|(_, err)| err)
        .unwrap_or_else(|| CryptoError::CryptoOperation(format!("verify error {}: {}", raw, detail)))
}

pub struct OpensslCertChainValidatorSpi;

impl OpensslCertChainValidatorSpi {
    pub fn create(name: &str) -> Result<Box<dyn CertChainValidatorSpi>> {
        if name != PKIX_ALGORITHM {
            return Err(CryptoError::NotSupported(format!("cert chain validator {}", name)));
        }
        tracing::debug!("created openssl cert chain validator");
        Ok(Box::new(OpensslCertChainValidatorSpi))
    }
}

fn parse_cert(blob: &Blob, format: EncodingFormat) -> Result<X509> {
    let parsed = match format {
        EncodingFormat::Der => X509::from_der(blob.as_slice()),
        EncodingFormat::Pem => X509::from_pem(blob.as_slice()),
    };
    parsed.map_err(|e| {
        tracing::error!("failed to decode {:?} certificate: {}", format, e);
        CryptoError::CryptoOperation(format!("cannot decode {:?} certificate", format))
    })
}

impl ObjectBase for OpensslCertChainValidatorSpi {
    fn class(&self) -> &'static str {
        OPENSSL_CERT_CHAIN_VALIDATOR_CLASS
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl CertChainValidatorSpi for OpensslCertChainValidatorSpi {
    fn engine_validate(&self, certs: &BlobArray) -> Result<()> {
        if certs.len() < 2 {
            tracing::warn!("cert chain of {} entries cannot be validated", certs.len());
            return Err(CryptoError::invalid(format!(
                "cert chain needs at least 2 certificates, got {}",
                certs.len()
            )));
        }
        let format = certs.format();

        let mut store = X509StoreBuilder::new()?;
        for index in (1..certs.len()).rev() {
            store.add_cert(parse_cert(&certs[index], format)?)?;
        }
        store.set_flags(X509VerifyFlags::NO_CHECK_TIME)?;
        let store = store.build();

        let leaf = parse_cert(&certs[0], format)?;
        let untrusted: Stack<X509> = Stack::new()?;
        let mut ctx = X509StoreContext::new()?;
        let (verified, result) = ctx.init(&store, &leaf, &untrusted, |c| {
            let verified = c.verify_cert()?;
            Ok((verified, c.error()))
        })?;

        if verified {
            tracing::debug!("cert chain of {} entries verified", certs.len());
            return Ok(());
        }
        tracing::error!(
            "cert chain verification failed: {} ({})",
            result.error_string(),
            result.as_raw()
        );
        Err(translate_verify_error(result.as_raw(), result.error_string()))
    }
}
