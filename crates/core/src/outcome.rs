//! Stream-end summary shared between the part stream and its consumers.
//!
//! The assembler publishes the terminal usage, finish reason and provider
//! metadata through a `tokio::sync::watch` channel so that callers can await
//! them without walking the stream a second time.

use crate::ai_sdk_types::v2 as v2t;
use crate::core::error::SdkError;
use tokio::sync::watch;

/// Terminal values of one streamed call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinishSummary {
    pub usage: v2t::Usage,
    pub finish_reason: v2t::FinishReason,
    pub provider_metadata: Option<v2t::ProviderMetadata>,
}

#[derive(Debug, Clone, Default)]
struct OutcomeState {
    summary: Option<FinishSummary>,
    done: bool,
}

/// Write side, owned by the stream assembler.
#[derive(Debug)]
pub struct OutcomeSender {
    tx: watch::Sender<OutcomeState>,
}

/// Read side, handed to callers on [`crate::core::StreamResponse`].
#[derive(Debug, Clone)]
pub struct StreamOutcome {
    rx: watch::Receiver<OutcomeState>,
}

pub fn outcome_channel() -> (OutcomeSender, StreamOutcome) {
    let (tx, rx) = watch::channel(OutcomeState::default());
    (OutcomeSender { tx }, StreamOutcome { rx })
}

impl OutcomeSender {
    /// Record the summary produced by the terminal finish part.
    pub fn set_summary(&self, summary: FinishSummary) {
        self.tx.send_modify(|state| state.summary = Some(summary));
    }

    /// Amend an already recorded summary. No-op before a summary exists.
    pub fn update_summary(&self, f: impl FnOnce(&mut FinishSummary)) {
        self.tx.send_modify(|state| {
            if let Some(summary) = state.summary.as_mut() {
                f(summary);
            }
        });
    }

    /// Mark the stream drained; waiters resolve now.
    pub fn close(&self) {
        self.tx.send_modify(|state| state.done = true);
    }
}

impl StreamOutcome {
    /// An outcome that is already resolved.
    pub fn resolved(summary: FinishSummary) -> Self {
        let (tx, rx) = watch::channel(OutcomeState {
            summary: Some(summary),
            done: true,
        });
        drop(tx);
        Self { rx }
    }

    /// Current summary without waiting.
    pub fn snapshot(&self) -> Option<FinishSummary> {
        self.rx.borrow().summary.clone()
    }

    /// Wait until the stream is drained (or abandoned) and return its summary.
    ///
    /// Resolves to [`SdkError::Cancelled`] when the stream ended without a
    /// finish part, e.g. after a transport failure or when it was dropped.
    pub async fn wait(&self) -> Result<FinishSummary, SdkError> {
        let mut rx = self.rx.clone();
        loop {
            {
                let state = rx.borrow_and_update();
                if state.done {
                    return state.summary.clone().ok_or(SdkError::Cancelled);
                }
            }
            if rx.changed().await.is_err() {
                return rx.borrow().summary.clone().ok_or(SdkError::Cancelled);
            }
        }
    }

    pub async fn usage(&self) -> Result<v2t::Usage, SdkError> {
        self.wait().await.map(|s| s.usage)
    }

    pub async fn finish_reason(&self) -> Result<v2t::FinishReason, SdkError> {
        self.wait().await.map(|s| s.finish_reason)
    }

    pub async fn provider_metadata(&self) -> Result<Option<v2t::ProviderMetadata>, SdkError> {
        self.wait().await.map(|s| s.provider_metadata)
    }
}
