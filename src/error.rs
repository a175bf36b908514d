//!
//! Defines the single result taxonomy shared by every capability family.
//!
//! Providers translate backend failures into [`CryptoError`] at the point the
//! backend call returns; façades only ever see and forward these values.

use std::fmt;

/// Stable, provider-agnostic result codes.
///
/// The numeric values are part of the external interface and never change.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ResultCode {
    /// The operation completed.
    Success = 0,
    /// A caller-supplied argument was empty, out of range or malformed.
    InvalidParams = -10001,
    /// No provider implements the requested algorithm.
    NotSupported = -10002,
    /// A buffer could not be reserved.
    AllocationFailure = -20001,
    /// Copying into a caller buffer failed.
    CopyFailure = -20002,
    /// The backend reported a failure with no more specific code.
    CryptoOperationFailure = -30001,
    /// A certificate signature did not verify against its issuer.
    SignatureFailure = -30002,
    /// A certificate's notBefore is in the future.
    CertNotYetValid = -30003,
    /// A certificate's notAfter has passed.
    CertExpired = -30004,
    /// The issuer of some certificate is not in the chain.
    IssuerUnreachable = -30005,
    /// An issuer's key usage does not permit certificate signing.
    KeyUsageNoCertSign = -30006,
    /// A key usage forbids the digital signature the chain relies on.
    KeyUsageNoDigitalSignature = -30007,
}

impl ResultCode {
    /// Every code in the taxonomy, in declaration order.
    pub const ALL: [ResultCode; 12] = [
        ResultCode::Success,
        ResultCode::InvalidParams,
        ResultCode::NotSupported,
        ResultCode::AllocationFailure,
        ResultCode::CopyFailure,
        ResultCode::CryptoOperationFailure,
        ResultCode::SignatureFailure,
        ResultCode::CertNotYetValid,
        ResultCode::CertExpired,
        ResultCode::IssuerUnreachable,
        ResultCode::KeyUsageNoCertSign,
        ResultCode::KeyUsageNoDigitalSignature,
    ];

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Short fixed message paired with the code for binding layers.
    pub fn message(self) -> &'static str {
        match self {
            ResultCode::Success => "success",
            ResultCode::InvalidParams => "invalid params",
            ResultCode::NotSupported => "not supported",
            ResultCode::AllocationFailure => "memory allocation failed",
            ResultCode::CopyFailure => "memory copy failed",
            ResultCode::CryptoOperationFailure => "crypto operation error",
            ResultCode::SignatureFailure => "certificate signature verification failed",
            ResultCode::CertNotYetValid => "certificate is not yet valid",
            ResultCode::CertExpired => "certificate has expired",
            ResultCode::IssuerUnreachable => "unable to get issuer certificate locally",
            ResultCode::KeyUsageNoCertSign => "key usage does not include certificate sign",
            ResultCode::KeyUsageNoDigitalSignature => "key usage does not include digital signature",
        }
    }

    /// Collapses an operation result into its code.
    pub fn of<T>(result: &Result<T>) -> ResultCode {
        match result {
            Ok(_) => ResultCode::Success,
            Err(e) => e.code(),
        }
    }
}

impl TryFrom<i32> for ResultCode {
    type Error = String;

    fn try_from(value: i32) -> std::result::Result<Self, Self::Error> {
        ResultCode::ALL
            .iter()
            .copied()
            .find(|c| c.as_i32() == value)
            .ok_or_else(|| format!("Invalid result code: {}", value))
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.as_i32())
    }
}

/// Errors returned by every framework operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    /// Argument validation failed; the string says which argument.
    #[error("Invalid params: {0}")]
    InvalidParams(String),
    /// Unknown algorithm, mode or provider combination.
    #[error("Not supported: {0}")]
    NotSupported(String),
    /// A buffer reservation failed.
    #[error("Memory allocation failed: {0}")]
    Allocation(String),
    /// Reserved for copy failures; no safe path produces it.
    #[error("Memory copy failed: {0}")]
    Copy(String),
    /// Backend failure, carrying the backend's own description.
    #[error("Crypto operation failed: {0}")]
    CryptoOperation(String),
    /// Maps to [`ResultCode::SignatureFailure`].
    #[error("Certificate signature verification failed")]
    CertSignatureFailure,
    /// Maps to [`ResultCode::CertNotYetValid`].
    #[error("Certificate is not yet valid")]
    CertNotYetValid,
    /// Maps to [`ResultCode::CertExpired`].
    #[error("Certificate has expired")]
    CertHasExpired,
    /// Maps to [`ResultCode::IssuerUnreachable`].
    #[error("Unable to get issuer certificate locally")]
    IssuerCertUnreachable,
    /// Maps to [`ResultCode::KeyUsageNoCertSign`].
    #[error("Key usage does not include certificate sign")]
    KeyUsageNoCertSign,
    /// Maps to [`ResultCode::KeyUsageNoDigitalSignature`].
    #[error("Key usage does not include digital signature")]
    KeyUsageNoDigitalSignature,
}

impl CryptoError {
    /// The stable code this error reports across the binding boundary.
    pub fn code(&self) -> ResultCode {
        match self {
            CryptoError::InvalidParams(_) => ResultCode::InvalidParams,
            CryptoError::NotSupported(_) => ResultCode::NotSupported,
            CryptoError::Allocation(_) => ResultCode::AllocationFailure,
            CryptoError::Copy(_) => ResultCode::CopyFailure,
            CryptoError::CryptoOperation(_) => ResultCode::CryptoOperationFailure,
            CryptoError::CertSignatureFailure => ResultCode::SignatureFailure,
            CryptoError::CertNotYetValid => ResultCode::CertNotYetValid,
            CryptoError::CertHasExpired => ResultCode::CertExpired,
            CryptoError::IssuerCertUnreachable => ResultCode::IssuerUnreachable,
            CryptoError::KeyUsageNoCertSign => ResultCode::KeyUsageNoCertSign,
            CryptoError::KeyUsageNoDigitalSignature => ResultCode::KeyUsageNoDigitalSignature,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        CryptoError::InvalidParams(msg.into())
    }
}

impl From<openssl::error::ErrorStack> for CryptoError {
    fn from(err: openssl::error::ErrorStack) -> Self {
        tracing::error!("openssl error: {}", err);
        CryptoError::CryptoOperation(err.to_string())
    }
}

impl From<std::collections::TryReserveError> for CryptoError {
    fn from(err: std::collections::TryReserveError) -> Self {
        CryptoError::Allocation(err.to_string())
    }
}

/// The `(code, message)` pair surfaced to scripting bindings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BusinessError {
    pub code: ResultCode,
    pub message: String,
}

impl BusinessError {
    pub fn new(code: ResultCode, message: impl Into<String>) -> Self {
        BusinessError { code, message: message.into() }
    }
}

impl From<&CryptoError> for BusinessError {
    fn from(err: &CryptoError) -> Self {
        let code = err.code();
        BusinessError::new(code, code.message())
    }
}

impl fmt::Display for BusinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_i32(), self.message)
    }
}

/// Result type for framework operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
