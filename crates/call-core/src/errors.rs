use thiserror::Error;

use crate::state::CallState;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CallError {
    #[error("illegal call state transition: {from} -> {to}")]
    IllegalTransition { from: CallState, to: CallState },
    #[error("deferred acceptance set while in state {0}")]
    DeferredAcceptanceOutsideAccepting(CallState),
    #[error("call record already linked")]
    CallRecordAlreadyLinked,
    #[error("cannot accept a call in state {0}")]
    NotRinging(CallState),
    #[error("no deferred acceptance queued")]
    NoDeferredAcceptance,
    #[error("acceptance failed: {0}")]
    Acceptance(String),
    #[error("config error: {0}")]
    Config(String),
}
