//! Answering an incoming call across the ringing split.
//!
//! The user may answer while the system UI is already ringing but the media
//! engine is not yet ready. In that case the call moves to `Accepting` and
//! the completion is queued until [`media_ready`] is signaled.

use crate::defects::Defect;
use crate::errors::CallError;
use crate::session::{CallSession, DeferredAcceptance};
use crate::state::CallState;

/// The user answered. Completes now if the media engine is ready, otherwise
/// queues `action` until it is. The action is queued before the delegate
/// hears about `Accepting`.
pub fn accept(call: &mut CallSession, action: DeferredAcceptance) -> Result<(), CallError> {
    match call.state() {
        CallState::LocalRingingReadyToAnswer => complete(call, action),
        CallState::LocalRingingAnticipatory => {
            tracing::info!("media not ready, deferring acceptance for call: {call}");
            call.begin_accepting(action)
        }
        other => {
            tracing::warn!("ignoring accept in state {other} for call: {call}");
            Err(CallError::NotRinging(other))
        }
    }
}

/// The media engine is ready to answer.
pub fn media_ready(call: &mut CallSession) -> Result<(), CallError> {
    match call.state() {
        CallState::Answering | CallState::LocalRingingAnticipatory => {
            call.set_state(CallState::LocalRingingReadyToAnswer)
        }
        CallState::Accepting => match call.take_deferred_acceptance() {
            Some(action) => complete(call, action),
            None => {
                call.report_defect(Defect::AcceptingWithoutDeferredAcceptance);
                call.set_state(CallState::LocalFailure)?;
                Err(CallError::NoDeferredAcceptance)
            }
        },
        other => {
            tracing::debug!("media ready in state {other}, nothing to do");
            Ok(())
        }
    }
}

fn complete(call: &mut CallSession, action: DeferredAcceptance) -> Result<(), CallError> {
    match action() {
        Ok(()) => call.set_state(CallState::Connected),
        Err(e) => {
            tracing::error!("acceptance failed for call {call}: {e}");
            call.set_state(CallState::LocalFailure)?;
            Err(e)
        }
    }
}
