//!
//! Certificate-chain wire codec.
//!
//! A chain travels as `count` back-to-back records, each a `u16` length
//! followed by exactly that many value bytes. The length prefix is in the
//! host's native byte order: the format is only portable between hosts of the
//! same endianness.
//!
//! The total-size bound is enforced by the façade before decoding, not here.

use crate::blob::{Blob, BlobArray, CertChainData, EncodingFormat};
use crate::config::MAX_CERT_CHAIN_LEN;
use crate::error::{CryptoError, Result};

const LEN_PREFIX_SIZE: usize = std::mem::size_of::<u16>();

/// Decodes `data` into at most `count` owned blobs.
///
/// On any failure the blobs decoded so far are released before the error is
/// returned.
pub fn decode_cert_chain(data: &[u8], count: u8, format: EncodingFormat) -> Result<BlobArray> {
    let mut certs = BlobArray::with_capacity(format, usize::from(count))?;
    let mut cursor = 0usize;

    while cursor < data.len() {
        let remaining = data.len() - cursor;
        if remaining < LEN_PREFIX_SIZE {
            tracing::warn!("truncated length prefix at offset {}", cursor);
            return Err(CryptoError::invalid("truncated record length prefix"));
        }
        if certs.len() >= usize::from(count) {
            tracing::warn!("chain holds more than the declared {} records", count);
            return Err(CryptoError::invalid(format!(
                "chain holds more than {} records",
                count
            )));
        }

        let len = usize::from(u16::from_ne_bytes([data[cursor], data[cursor + 1]]));
        cursor += LEN_PREFIX_SIZE;

        if len > data.len() - cursor {
            tracing::warn!("record {} of {} bytes overruns the buffer", certs.len(), len);
            return Err(CryptoError::invalid("record length overruns the buffer"));
        }

        certs.push(Blob::try_copy_from(&data[cursor..cursor + len])?);
        cursor += len;
    }

    Ok(certs)
}

/// Encodes `blobs` into wire form.
pub fn encode_cert_chain<B: AsRef<[u8]>>(blobs: &[B], format: EncodingFormat) -> Result<CertChainData> {
    let count = u8::try_from(blobs.len())
        .map_err(|_| CryptoError::invalid(format!("too many certificates: {}", blobs.len())))?;

    let total = blobs
        .iter()
        .map(|b| LEN_PREFIX_SIZE + b.as_ref().len())
        .sum::<usize>();
    if total > MAX_CERT_CHAIN_LEN {
        return Err(CryptoError::invalid(format!(
            "encoded chain of {} bytes exceeds {}",
            total, MAX_CERT_CHAIN_LEN
        )));
    }

    let mut data = Vec::new();
    data.try_reserve_exact(total)?;
    for blob in blobs {
        let bytes = blob.as_ref();
        let len = u16::try_from(bytes.len())
            .map_err(|_| CryptoError::invalid("record longer than u16::MAX"))?;
        data.extend_from_slice(&len.to_ne_bytes());
        data.extend_from_slice(bytes);
    }

    Ok(CertChainData::new(data, count, format))
}
