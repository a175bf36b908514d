//!
//! Owned byte buffers exchanged across the provider and façade boundaries.
//!
//! A [`Blob`] returned by an operation belongs to the caller. Its contents are
//! wiped when it is dropped, so digests, MACs, key material and random output
//! never linger in freed memory.

use std::fmt;

use zeroize::Zeroize;

use crate::error::{CryptoError, Result};

#[cfg(any(test, feature = "test-utils"))]
mod live {
    use std::cell::Cell;

    thread_local! {
        static LIVE_BLOBS: Cell<usize> = const { Cell::new(0) };
    }

    pub(super) fn inc() {
        LIVE_BLOBS.with(|c| c.set(c.get() + 1));
    }

    pub(super) fn dec() {
        LIVE_BLOBS.with(|c| c.set(c.get().saturating_sub(1)));
    }

    pub(super) fn count() -> usize {
        LIVE_BLOBS.with(|c| c.get())
    }
}

/// Number of blobs currently alive on the calling thread.
#[cfg(any(test, feature = "test-utils"))]
pub fn live_blob_count() -> usize {
    live::count()
}

#[inline]
fn track_alloc() {
    #[cfg(any(test, feature = "test-utils"))]
    live::inc();
}

#[inline]
fn track_free() {
    #[cfg(any(test, feature = "test-utils"))]
    live::dec();
}

/// An owned, zeroize-on-drop byte buffer.
pub struct Blob {
    data: Vec<u8>,
}

impl Blob {
    pub fn new(data: Vec<u8>) -> Self {
        track_alloc();
        Blob { data }
    }

    /// Copies `src` into a freshly allocated blob, reporting allocation failure
    /// instead of aborting.
    pub fn try_copy_from(src: &[u8]) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(src.len())?;
        data.extend_from_slice(src);
        Ok(Blob::new(data))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// A blob is usable as operation input only when it holds data.
    pub fn is_valid(&self) -> bool {
        !self.data.is_empty()
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.data.clone()
    }

    /// Moves the bytes out; wiping them becomes the caller's concern.
    pub fn into_vec(mut self) -> Vec<u8> {
        std::mem::take(&mut self.data)
    }
}

impl Drop for Blob {
    fn drop(&mut self) {
        self.data.zeroize();
        track_free();
    }
}

impl Clone for Blob {
    fn clone(&self) -> Self {
        Blob::new(self.data.clone())
    }
}

impl PartialEq for Blob {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for Blob {}

impl AsRef<[u8]> for Blob {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for Blob {
    fn from(data: Vec<u8>) -> Self {
        Blob::new(data)
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blob").field("len", &self.data.len()).finish()
    }
}

/// Encoding of certificate bytes, carried out of band next to the wire data.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EncodingFormat {
    Der = 0,
    Pem = 1,
}

impl TryFrom<u32> for EncodingFormat {
    type Error = CryptoError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(EncodingFormat::Der),
            1 => Ok(EncodingFormat::Pem),
            _ => Err(CryptoError::invalid(format!("unknown encoding format: {}", value))),
        }
    }
}

/// Ordered sequence of owned blobs sharing one encoding format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobArray {
    blobs: Vec<Blob>,
    format: EncodingFormat,
}

impl BlobArray {
    pub fn new(format: EncodingFormat) -> Self {
        BlobArray { blobs: Vec::new(), format }
    }

    pub(crate) fn with_capacity(format: EncodingFormat, capacity: usize) -> Result<Self> {
        let mut blobs = Vec::new();
        blobs.try_reserve_exact(capacity)?;
        Ok(BlobArray { blobs, format })
    }

    pub fn push(&mut self, blob: Blob) {
        self.blobs.push(blob);
    }

    pub fn format(&self) -> EncodingFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Blob> {
        self.blobs.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Blob> {
        self.blobs.iter()
    }
}

impl std::ops::Index<usize> for BlobArray {
    type Output = Blob;

    fn index(&self, index: usize) -> &Blob {
        &self.blobs[index]
    }
}

/// A certificate chain in wire form: back-to-back length-prefixed records.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CertChainData {
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
    pub count: u8,
    pub format: EncodingFormat,
}

impl CertChainData {
    pub fn new(data: Vec<u8>, count: u8, format: EncodingFormat) -> Self {
        CertChainData { data, count, format }
    }
}
