use std::thread::ThreadId;

use thiserror::Error;

use crate::state::CallState;

/// A broken contract between the orchestrator and a call session.
///
/// Defects are programming errors, not call failures. They are reported and
/// the session carries on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Defect {
    #[error("{operation} called off the call context (owner {owner:?}, current {current:?})")]
    OffContext {
        operation: &'static str,
        owner: ThreadId,
        current: ThreadId,
    },
    #[error("illegal state transition {from} -> {to}")]
    IllegalTransition { from: CallState, to: CallState },
    #[error("deferred acceptance set while in state {0}")]
    DeferredAcceptanceOutsideAccepting(CallState),
    #[error("pending deferred acceptance replaced")]
    DeferredAcceptanceReplaced,
    #[error("media ready while accepting with no deferred acceptance queued")]
    AcceptingWithoutDeferredAcceptance,
    #[error("call record linked twice")]
    CallRecordRelinked,
    #[error("call removed from system without being reported")]
    RemovedBeforeReported,
    #[error("call dropped in non-terminal state {0}")]
    NotEndedAtTeardown(CallState),
    #[error("system registration mismatch at teardown (reported: {reported}, removed: {removed})")]
    RegistrationMismatch { reported: bool, removed: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal in debug builds.
    Fatal,
    /// Logged; never fatal.
    Anomaly,
}

impl Defect {
    pub fn severity(&self) -> Severity {
        match self {
            Defect::OffContext { .. } => Severity::Fatal,
            _ => Severity::Anomaly,
        }
    }
}

/// Sink for contract violations.
pub trait DefectReporter: Send + Sync {
    fn report(&self, defect: Defect);
}

/// Logs every defect and optionally panics on fatal ones.
pub struct TracingReporter {
    panic_on_fatal: bool,
}

impl TracingReporter {
    pub fn new(panic_on_fatal: bool) -> Self {
        Self { panic_on_fatal }
    }
}

impl Default for TracingReporter {
    fn default() -> Self {
        Self::new(cfg!(debug_assertions))
    }
}

impl DefectReporter for TracingReporter {
    fn report(&self, defect: Defect) {
        match defect.severity() {
            Severity::Fatal => {
                tracing::error!("fatal call session defect: {defect}");
                if self.panic_on_fatal {
                    panic!("call session defect: {defect}");
                }
            }
            Severity::Anomaly => tracing::error!("call session defect: {defect}"),
        }
    }
}
