use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};
use std::thread::{self, ThreadId};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::CallConfig;
use crate::contact::{ContactThread, RemoteAddress};
use crate::defects::{Defect, DefectReporter, TracingReporter};
use crate::delegate::CallSessionDelegate;
use crate::errors::CallError;
use crate::record::CallRecord;
use crate::route::NetworkRoute;
use crate::state::{CallAdapterType, CallDirection, CallState, OfferMediaType, RecordPermission};

/// Queued "finish answering" work, run once the media engine is ready.
pub type DeferredAcceptance = Box<dyn FnOnce() -> Result<(), CallError> + Send>;

/// Everything the orchestrator knows when a call starts.
pub struct CallParams {
    pub direction: CallDirection,
    pub local_id: Uuid,
    pub state: CallState,
    pub thread: Arc<dyn ContactThread>,
    pub sent_at_timestamp: u64,
    pub adapter_type: CallAdapterType,
    pub offer_media_type: OfferMediaType,
    pub record_permission: RecordPermission,
}

impl CallParams {
    /// A call placed now by the local user.
    pub fn outgoing(
        thread: Arc<dyn ContactThread>,
        offer_media_type: OfferMediaType,
        record_permission: RecordPermission,
    ) -> Self {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        Self {
            direction: CallDirection::Outgoing,
            local_id: Uuid::new_v4(),
            state: CallState::Dialing,
            thread,
            sent_at_timestamp: now,
            adapter_type: CallAdapterType::Default,
            offer_media_type,
            record_permission,
        }
    }

    /// A call offer received from the remote party, sent at `sent_at_timestamp`.
    pub fn incoming(
        thread: Arc<dyn ContactThread>,
        sent_at_timestamp: u64,
        offer_media_type: OfferMediaType,
        record_permission: RecordPermission,
    ) -> Self {
        Self {
            direction: CallDirection::Incoming,
            local_id: Uuid::new_v4(),
            state: CallState::Answering,
            thread,
            sent_at_timestamp,
            adapter_type: CallAdapterType::Default,
            offer_media_type,
            record_permission,
        }
    }

    pub fn with_adapter_type(mut self, adapter_type: CallAdapterType) -> Self {
        self.adapter_type = adapter_type;
        self
    }
}

/// Data model for one individual voice/video call.
///
/// All access must happen on the context that created the session. Every
/// mutation notifies the delegate synchronously, after the session's own
/// bookkeeping.
pub struct CallSession {
    local_id: Uuid,
    direction: CallDirection,
    thread: Arc<dyn ContactThread>,
    remote_address: RemoteAddress,
    sent_at_timestamp: u64,
    adapter_type: CallAdapterType,
    offer_media_type: OfferMediaType,

    state: CallState,
    signaling_id: Option<u64>,
    is_audio_muted: bool,
    has_local_video: bool,
    is_on_hold: bool,
    is_remote_video_enabled: bool,
    is_remote_sharing_screen: bool,
    network_route: NetworkRoute,
    call_record: Option<Arc<dyn CallRecord>>,
    deferred_acceptance: Option<DeferredAcceptance>,

    // system call registry bookkeeping
    was_reported_to_system: bool,
    was_removed_from_system: bool,

    delegate: Option<Weak<dyn CallSessionDelegate>>,
    defects: Arc<dyn DefectReporter>,
    enforce_transition_table: bool,
    owner: ThreadId,
}

impl CallSession {
    pub fn new(params: CallParams) -> Self {
        Self::with_config(params, &CallConfig::default())
    }

    pub fn with_config(params: CallParams, config: &CallConfig) -> Self {
        let reporter = Arc::new(TracingReporter::new(config.panic_on_fatal_defect));
        Self::with_reporter(params, config, reporter)
    }

    pub fn with_reporter(
        params: CallParams,
        config: &CallConfig,
        defects: Arc<dyn DefectReporter>,
    ) -> Self {
        let remote_address = params.thread.contact_address();
        let call = Self {
            local_id: params.local_id,
            direction: params.direction,
            thread: params.thread,
            remote_address,
            sent_at_timestamp: params.sent_at_timestamp,
            adapter_type: params.adapter_type,
            offer_media_type: params.offer_media_type,
            state: params.state,
            signaling_id: None,
            // Start muted without microphone access. Outgoing calls ask for it
            // up front, so this mostly affects incoming calls.
            is_audio_muted: !params.record_permission.is_granted(),
            has_local_video: params.offer_media_type == OfferMediaType::Video,
            is_on_hold: false,
            is_remote_video_enabled: false,
            is_remote_sharing_screen: false,
            network_route: NetworkRoute::default(),
            call_record: None,
            deferred_acceptance: None,
            was_reported_to_system: false,
            was_removed_from_system: false,
            delegate: None,
            defects,
            enforce_transition_table: config.enforce_transition_table,
            owner: thread::current().id(),
        };
        tracing::info!(
            "created {call}: direction={:?} state={} offer={:?}",
            call.direction,
            call.state,
            call.offer_media_type
        );
        call
    }

    pub fn local_id(&self) -> Uuid {
        self.local_id
    }

    pub fn direction(&self) -> CallDirection {
        self.direction
    }

    pub fn thread(&self) -> &Arc<dyn ContactThread> {
        &self.thread
    }

    pub fn remote_address(&self) -> &RemoteAddress {
        &self.remote_address
    }

    pub fn sent_at_timestamp(&self) -> u64 {
        self.sent_at_timestamp
    }

    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.sent_at_timestamp)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
    }

    pub fn adapter_type(&self) -> CallAdapterType {
        self.adapter_type
    }

    pub fn offer_media_type(&self) -> OfferMediaType {
        self.offer_media_type
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    pub fn is_ended(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn signaling_id(&self) -> Option<u64> {
        self.signaling_id
    }

    pub fn is_audio_muted(&self) -> bool {
        self.is_audio_muted
    }

    pub fn has_local_video(&self) -> bool {
        self.has_local_video
    }

    pub fn is_on_hold(&self) -> bool {
        self.is_on_hold
    }

    pub fn is_remote_video_enabled(&self) -> bool {
        self.is_remote_video_enabled
    }

    pub fn is_remote_sharing_screen(&self) -> bool {
        self.is_remote_sharing_screen
    }

    pub fn network_route(&self) -> NetworkRoute {
        self.network_route
    }

    pub fn call_record(&self) -> Option<&Arc<dyn CallRecord>> {
        self.call_record.as_ref()
    }

    pub fn has_deferred_acceptance(&self) -> bool {
        self.deferred_acceptance.is_some()
    }

    pub fn was_reported_to_system(&self) -> bool {
        self.was_reported_to_system
    }

    pub fn was_removed_from_system(&self) -> bool {
        self.was_removed_from_system
    }

    /// Attach the single observer, replacing any previous one.
    pub fn set_delegate(&mut self, delegate: &Arc<dyn CallSessionDelegate>) {
        self.assert_on_context("set_delegate");
        self.delegate = Some(Arc::downgrade(delegate));
    }

    pub fn clear_delegate(&mut self) {
        self.assert_on_context("clear_delegate");
        self.delegate = None;
    }

    fn delegate(&self) -> Option<Arc<dyn CallSessionDelegate>> {
        self.delegate.as_ref().and_then(Weak::upgrade)
    }

    /// Move the call to `state`.
    ///
    /// Terminal states are absorbing. With `enforce_transition_table` set the
    /// move must also be in the transition table. A rejected move leaves the
    /// state untouched and sends no notification.
    pub fn set_state(&mut self, state: CallState) -> Result<(), CallError> {
        self.assert_on_context("set_state");
        self.apply_state(state)?;
        self.notify_state(state);
        Ok(())
    }

    /// Move to `Accepting` with `action` already queued, so the delegate sees
    /// the pending acceptance when it is told about the new state.
    pub fn begin_accepting(&mut self, action: DeferredAcceptance) -> Result<(), CallError> {
        self.assert_on_context("begin_accepting");
        self.apply_state(CallState::Accepting)?;
        self.queue_deferred_acceptance(action);
        self.notify_state(CallState::Accepting);
        Ok(())
    }

    pub fn set_signaling_id(&mut self, signaling_id: u64) {
        self.assert_on_context("set_signaling_id");
        if let Some(previous) = self.signaling_id {
            if previous != signaling_id {
                tracing::warn!("signaling id reassigned {previous} -> {signaling_id}");
            }
        }
        self.signaling_id = Some(signaling_id);
        tracing::info!("signaling id set for call: {self}");
    }

    pub fn set_audio_muted(&mut self, muted: bool) {
        self.assert_on_context("set_audio_muted");
        let old = self.is_audio_muted;
        self.is_audio_muted = muted;
        tracing::debug!("muted changed: {old} -> {muted}");

        if let Some(delegate) = self.delegate() {
            delegate.call_local_audio_mute_did_change(self, muted);
        }
    }

    pub fn set_local_video_enabled(&mut self, enabled: bool) {
        self.assert_on_context("set_local_video_enabled");
        self.has_local_video = enabled;
        tracing::debug!("local video enabled: {enabled}");

        if let Some(delegate) = self.delegate() {
            delegate.call_local_video_mute_did_change(self, !enabled);
        }
    }

    pub fn set_on_hold(&mut self, on_hold: bool) {
        self.assert_on_context("set_on_hold");
        let old = self.is_on_hold;
        self.is_on_hold = on_hold;
        tracing::debug!("isOnHold changed: {old} -> {on_hold}");

        if let Some(delegate) = self.delegate() {
            delegate.call_hold_did_change(self, on_hold);
        }
    }

    /// Remote video state as reported by inbound signaling.
    pub fn set_remote_video_enabled(&mut self, enabled: bool) {
        self.assert_on_context("set_remote_video_enabled");
        self.is_remote_video_enabled = enabled;
        tracing::info!("remote video enabled: {enabled}");

        if let Some(delegate) = self.delegate() {
            delegate.call_remote_video_mute_did_change(self, !enabled);
        }
    }

    /// Remote screen-share state as reported by inbound signaling.
    pub fn set_remote_sharing_screen(&mut self, sharing: bool) {
        self.assert_on_context("set_remote_sharing_screen");
        self.is_remote_sharing_screen = sharing;
        tracing::info!("remote sharing screen: {sharing}");

        if let Some(delegate) = self.delegate() {
            delegate.call_remote_sharing_screen_did_change(self, sharing);
        }
    }

    pub fn set_network_route(&mut self, route: NetworkRoute) {
        self.assert_on_context("set_network_route");
        self.network_route = route;
        tracing::debug!("network route: {:?}", route.local_adapter_type);
    }

    /// Link the persisted history entry. A call is linked at most once.
    pub fn set_call_record(&mut self, record: Arc<dyn CallRecord>) -> Result<(), CallError> {
        self.assert_on_context("set_call_record");
        if self.call_record.is_some() {
            self.defects.report(Defect::CallRecordRelinked);
            return Err(CallError::CallRecordAlreadyLinked);
        }
        self.call_record = Some(record);
        self.update_call_record_type();
        Ok(())
    }

    /// Queue the action that completes answering. Only valid while accepting.
    pub fn set_deferred_acceptance(&mut self, action: DeferredAcceptance) -> Result<(), CallError> {
        self.assert_on_context("set_deferred_acceptance");
        if self.state != CallState::Accepting {
            self.defects
                .report(Defect::DeferredAcceptanceOutsideAccepting(self.state));
            return Err(CallError::DeferredAcceptanceOutsideAccepting(self.state));
        }
        self.queue_deferred_acceptance(action);
        Ok(())
    }

    pub fn take_deferred_acceptance(&mut self) -> Option<DeferredAcceptance> {
        self.assert_on_context("take_deferred_acceptance");
        self.deferred_acceptance.take()
    }

    pub fn mark_reported_to_system(&mut self) {
        self.assert_on_context("mark_reported_to_system");
        self.was_reported_to_system = true;
    }

    pub fn mark_removed_from_system(&mut self) {
        self.assert_on_context("mark_removed_from_system");
        if !self.was_reported_to_system {
            self.defects.report(Defect::RemovedBeforeReported);
            return;
        }
        self.was_removed_from_system = true;
    }

    pub fn snapshot(&self) -> CallSnapshot {
        CallSnapshot {
            local_id: self.local_id,
            direction: self.direction,
            thread_id: self.thread.unique_id(),
            remote_address: self.remote_address.clone(),
            sent_at_timestamp: self.sent_at_timestamp,
            adapter_type: self.adapter_type,
            offer_media_type: self.offer_media_type,
            state: self.state,
            is_ended: self.is_ended(),
            signaling_id: self.signaling_id,
            is_audio_muted: self.is_audio_muted,
            has_local_video: self.has_local_video,
            is_on_hold: self.is_on_hold,
            is_remote_video_enabled: self.is_remote_video_enabled,
            is_remote_sharing_screen: self.is_remote_sharing_screen,
            network_route: self.network_route,
            has_call_record: self.call_record.is_some(),
            has_deferred_acceptance: self.deferred_acceptance.is_some(),
            was_reported_to_system: self.was_reported_to_system,
            was_removed_from_system: self.was_removed_from_system,
        }
    }

    pub(crate) fn report_defect(&self, defect: Defect) {
        self.defects.report(defect);
    }

    fn apply_state(&mut self, state: CallState) -> Result<(), CallError> {
        let old = self.state;
        let allowed = if self.enforce_transition_table {
            old.can_transition_to(state)
        } else {
            !old.is_terminal()
        };
        if !allowed {
            self.defects
                .report(Defect::IllegalTransition { from: old, to: state });
            return Err(CallError::IllegalTransition { from: old, to: state });
        }

        self.state = state;
        tracing::debug!("state changed: {old} -> {state} for call: {self}");

        if state != CallState::Accepting && self.deferred_acceptance.take().is_some() {
            tracing::info!("discarding deferred acceptance for call: {self}");
        }

        self.update_call_record_type();
        Ok(())
    }

    fn notify_state(&self, state: CallState) {
        if let Some(delegate) = self.delegate() {
            delegate.call_state_did_change(self, state);
        }
    }

    /// The newest action wins; a replaced one is reported.
    fn queue_deferred_acceptance(&mut self, action: DeferredAcceptance) {
        if self.deferred_acceptance.replace(action).is_some() {
            self.defects.report(Defect::DeferredAcceptanceReplaced);
        }
    }

    fn assert_on_context(&self, operation: &'static str) {
        let current = thread::current().id();
        if current != self.owner {
            self.defects.report(Defect::OffContext {
                operation,
                owner: self.owner,
                current,
            });
        }
    }

    /// Mark incomplete calls as completed once connected.
    fn update_call_record_type(&self) {
        let Some(record) = &self.call_record else {
            return;
        };
        if self.state != CallState::Connected {
            return;
        }
        let current = record.call_type();
        if let Some(completed) = current.completed_counterpart() {
            tracing::info!("call record {current:?} -> {completed:?} for call: {self}");
            record.update_call_type(completed);
        }
    }
}

impl Drop for CallSession {
    fn drop(&mut self) {
        tracing::debug!("dropping {self}");
        if !self.is_ended() {
            self.defects.report(Defect::NotEndedAtTeardown(self.state));
        }
        if self.was_reported_to_system != self.was_removed_from_system {
            self.defects.report(Defect::RegistrationMismatch {
                reported: self.was_reported_to_system,
                removed: self.was_removed_from_system,
            });
        }
    }
}

impl PartialEq for CallSession {
    fn eq(&self, other: &Self) -> bool {
        self.local_id == other.local_id
    }
}

impl Eq for CallSession {}

impl Hash for CallSession {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.local_id.hash(state);
    }
}

impl fmt::Display for CallSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CallSession {{{}, local_id: {}, signaling_id: {:?}}}",
            self.remote_address, self.local_id, self.signaling_id
        )
    }
}

impl fmt::Debug for CallSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallSession")
            .field("local_id", &self.local_id)
            .field("direction", &self.direction)
            .field("state", &self.state)
            .field("signaling_id", &self.signaling_id)
            .finish_non_exhaustive()
    }
}

/// Point-in-time copy of a session's observable fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSnapshot {
    pub local_id: Uuid,
    pub direction: CallDirection,
    pub thread_id: String,
    pub remote_address: RemoteAddress,
    pub sent_at_timestamp: u64,
    pub adapter_type: CallAdapterType,
    pub offer_media_type: OfferMediaType,
    pub state: CallState,
    pub is_ended: bool,
    pub signaling_id: Option<u64>,
    pub is_audio_muted: bool,
    pub has_local_video: bool,
    pub is_on_hold: bool,
    pub is_remote_video_enabled: bool,
    pub is_remote_sharing_screen: bool,
    pub network_route: NetworkRoute,
    pub has_call_record: bool,
    pub has_deferred_acceptance: bool,
    pub was_reported_to_system: bool,
    pub was_removed_from_system: bool,
}
