//!
//! Optional subscriber setup for binaries and tests embedding the framework.
//! The library itself only emits `tracing` events.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{CryptoError, Result};

/// Installs a global fmt subscriber filtered by `RUST_LOG`
/// (default `cryptoframe_core=info`). Fails if a subscriber is already set.
pub fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cryptoframe_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| CryptoError::CryptoOperation(format!("cannot install subscriber: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_fails() {
        let _ = init_tracing();
        assert!(matches!(init_tracing(), Err(CryptoError::CryptoOperation(_))));
    }
}
