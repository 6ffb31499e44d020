//! Session facade: submits calls through whichever signer the host provides.
//!
//! The wallet lives outside this crate. The host shell implements [`Signer`]
//! for it and drives the connection through a [`SignerSlot`]; every
//! [`Session`] handed out by the slot only observes what the host published.
//!
//! ```text
//!              slot.connect(signer)
//! Disconnected ─────────────────────► Connected
//!      ▲                                  │
//!      └──────────────────────────────────┘
//!              slot.disconnect()
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::call::MoveCall;
use crate::errors::{ListingError, Result};
use crate::types::{Address, SubmissionResult};

/// Error type reported by wallet implementations.
pub type SignerError = Box<dyn std::error::Error + Send + Sync>;

/// A wallet capability able to authorise calls for one account.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Account the signer acts for.
    fn account(&self) -> Address;

    /// Ask the wallet to open a connection.
    async fn connect(&self) -> std::result::Result<(), SignerError>;

    /// Ask the wallet to close the connection.
    async fn disconnect(&self) -> std::result::Result<(), SignerError>;

    /// Sign the call, send it to the ledger and return the transaction digest.
    async fn sign_and_execute(
        &self,
        call: &MoveCall,
    ) -> std::result::Result<SubmissionResult, SignerError>;
}

type SharedSigner = Option<Arc<dyn Signer>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected,
}

/// Host-side handle that publishes or withdraws the active signer.
pub struct SignerSlot {
    sender: watch::Sender<SharedSigner>,
}

impl Default for SignerSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl SignerSlot {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        SignerSlot { sender }
    }

    /// A new observer of this slot.
    pub fn session(&self) -> Session {
        Session {
            signer: self.sender.subscribe(),
        }
    }

    /// Connect the wallet and make it the active signer.
    pub async fn connect(&self, signer: Arc<dyn Signer>) -> std::result::Result<(), SignerError> {
        signer.connect().await?;
        info!("Signer connected for {}", signer.account());
        self.sender.send_replace(Some(signer));
        Ok(())
    }

    /// Withdraw the active signer, then tell the wallet to disconnect.
    pub async fn disconnect(&self) -> std::result::Result<(), SignerError> {
        if let Some(signer) = self.sender.send_replace(None) {
            info!("Signer disconnected for {}", signer.account());
            signer.disconnect().await?;
        }
        Ok(())
    }
}

/// Read-only view of the connection, used to submit calls.
#[derive(Clone)]
pub struct Session {
    signer: watch::Receiver<SharedSigner>,
}

impl Session {
    pub fn state(&self) -> SessionState {
        if self.has_active_signer() {
            SessionState::Connected
        } else {
            SessionState::Disconnected
        }
    }

    pub fn has_active_signer(&self) -> bool {
        self.signer.borrow().is_some()
    }

    pub fn active_account(&self) -> Option<Address> {
        self.signer.borrow().as_ref().map(|s| s.account())
    }

    /// Hand the call to the active signer and return its digest unchanged.
    ///
    /// Fails with [`ListingError::NoSignerConnected`] without contacting
    /// anything when no signer is active. Failures are not retried.
    pub async fn submit(&self, call: &MoveCall) -> Result<SubmissionResult> {
        let signer = self
            .signer
            .borrow()
            .clone()
            .ok_or(ListingError::NoSignerConnected)?;

        debug!("Submitting {} for {}", call.target, signer.account());

        match signer.sign_and_execute(call).await {
            Ok(result) => {
                info!("Call {} accepted: {}", call.target, result.digest);
                Ok(result)
            }
            Err(e) => {
                warn!("Call {} rejected: {e}", call.target);
                Err(ListingError::SubmissionFailed(e.to_string()))
            }
        }
    }

    /// Wait for the host to connect or disconnect, and return the new state.
    ///
    /// Reports `Disconnected` once the slot itself is gone.
    pub async fn changed(&mut self) -> SessionState {
        match self.signer.changed().await {
            Ok(()) => self.state(),
            Err(_) => SessionState::Disconnected,
        }
    }
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::call::CallEncoder;

    /// Wallet stand-in that records how often it was asked to execute.
    pub(crate) struct MockSigner {
        pub account: Address,
        pub digest: Option<String>,
        pub executed: AtomicUsize,
        pub connects: AtomicUsize,
        pub disconnects: AtomicUsize,
    }

    impl MockSigner {
        pub(crate) fn accepting(digest: &str) -> Arc<Self> {
            Arc::new(MockSigner {
                account: "0xa11ce".parse().unwrap(),
                digest: Some(digest.to_string()),
                executed: AtomicUsize::new(0),
                connects: AtomicUsize::new(0),
                disconnects: AtomicUsize::new(0),
            })
        }

        pub(crate) fn rejecting() -> Arc<Self> {
            Arc::new(MockSigner {
                account: "0xa11ce".parse().unwrap(),
                digest: None,
                executed: AtomicUsize::new(0),
                connects: AtomicUsize::new(0),
                disconnects: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Signer for MockSigner {
        fn account(&self) -> Address {
            self.account
        }

        async fn connect(&self) -> std::result::Result<(), SignerError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn disconnect(&self) -> std::result::Result<(), SignerError> {
            self.disconnects.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn sign_and_execute(
            &self,
            _call: &MoveCall,
        ) -> std::result::Result<SubmissionResult, SignerError> {
            self.executed.fetch_add(1, Ordering::SeqCst);
            match &self.digest {
                Some(d) => Ok(SubmissionResult::new(d.clone())),
                None => Err("user rejected the request".into()),
            }
        }
    }

    fn sample_call() -> MoveCall {
        CallEncoder::new("0x1".parse().unwrap()).update_availability("0x2".parse().unwrap(), true)
    }

    #[tokio::test]
    async fn submit_without_signer_fails() {
        let slot = SignerSlot::new();
        let session = slot.session();

        assert!(!session.has_active_signer());
        assert_eq!(session.state(), SessionState::Disconnected);
        assert!(matches!(
            session.submit(&sample_call()).await,
            Err(ListingError::NoSignerConnected)
        ));
    }

    #[tokio::test]
    async fn submit_returns_signer_digest_unchanged() {
        let slot = SignerSlot::new();
        let session = slot.session();
        let signer = MockSigner::accepting("9fJ2kQ7xWbQv");

        slot.connect(signer.clone()).await.unwrap();
        assert_eq!(session.state(), SessionState::Connected);
        assert_eq!(session.active_account(), Some(signer.account));

        let result = session.submit(&sample_call()).await.unwrap();
        assert_eq!(result.digest, "9fJ2kQ7xWbQv");
        assert_eq!(signer.executed.load(Ordering::SeqCst), 1);
        assert_eq!(signer.connects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rejected_call_is_submission_failure() {
        let slot = SignerSlot::new();
        let signer = MockSigner::rejecting();
        slot.connect(signer.clone()).await.unwrap();

        let err = slot.session().submit(&sample_call()).await.unwrap_err();
        assert!(matches!(err, ListingError::SubmissionFailed(msg) if msg.contains("rejected")));
        assert_eq!(signer.executed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn disconnect_stops_submissions() {
        let slot = SignerSlot::new();
        let session = slot.session();
        let signer = MockSigner::accepting("d1");

        slot.connect(signer.clone()).await.unwrap();
        slot.disconnect().await.unwrap();

        assert!(!session.has_active_signer());
        assert!(matches!(
            session.submit(&sample_call()).await,
            Err(ListingError::NoSignerConnected)
        ));
        assert_eq!(signer.executed.load(Ordering::SeqCst), 0);
        assert_eq!(signer.disconnects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn observer_sees_transitions() {
        let slot = SignerSlot::new();
        let mut session = slot.session();

        slot.connect(MockSigner::accepting("d2")).await.unwrap();
        assert_eq!(session.changed().await, SessionState::Connected);

        slot.disconnect().await.unwrap();
        assert_eq!(session.changed().await, SessionState::Disconnected);

        drop(slot);
        assert_eq!(session.changed().await, SessionState::Disconnected);
    }
}
