use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::delegate::CallSessionDelegate;
use crate::session::CallSession;
use crate::state::CallState;

/// Change notifications as values, for orchestrators that prefer draining a
/// queue to implementing [`CallSessionDelegate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallEvent {
    StateChanged { local_id: Uuid, state: CallState },
    LocalVideoMuteChanged { local_id: Uuid, is_video_muted: bool },
    LocalAudioMuteChanged { local_id: Uuid, is_audio_muted: bool },
    HoldChanged { local_id: Uuid, is_on_hold: bool },
    RemoteVideoMuteChanged { local_id: Uuid, is_video_muted: bool },
    RemoteSharingScreenChanged { local_id: Uuid, is_sharing_screen: bool },
}

impl CallEvent {
    pub fn local_id(&self) -> Uuid {
        match self {
            CallEvent::StateChanged { local_id, .. }
            | CallEvent::LocalVideoMuteChanged { local_id, .. }
            | CallEvent::LocalAudioMuteChanged { local_id, .. }
            | CallEvent::HoldChanged { local_id, .. }
            | CallEvent::RemoteVideoMuteChanged { local_id, .. }
            | CallEvent::RemoteSharingScreenChanged { local_id, .. } => *local_id,
        }
    }
}

/// Delegate that forwards every notification into an unbounded channel.
///
/// Sends never block, so delivery stays synchronous and in order. The
/// receiver should be drained on the call context.
pub struct EventChannel {
    tx: mpsc::UnboundedSender<CallEvent>,
}

impl EventChannel {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<CallEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }

    fn send(&self, event: CallEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("call event receiver dropped");
        }
    }
}

impl CallSessionDelegate for EventChannel {
    fn call_state_did_change(&self, call: &CallSession, state: CallState) {
        self.send(CallEvent::StateChanged {
            local_id: call.local_id(),
            state,
        });
    }

    fn call_local_video_mute_did_change(&self, call: &CallSession, is_video_muted: bool) {
        self.send(CallEvent::LocalVideoMuteChanged {
            local_id: call.local_id(),
            is_video_muted,
        });
    }

    fn call_local_audio_mute_did_change(&self, call: &CallSession, is_audio_muted: bool) {
        self.send(CallEvent::LocalAudioMuteChanged {
            local_id: call.local_id(),
            is_audio_muted,
        });
    }

    fn call_hold_did_change(&self, call: &CallSession, is_on_hold: bool) {
        self.send(CallEvent::HoldChanged {
            local_id: call.local_id(),
            is_on_hold,
        });
    }

    fn call_remote_video_mute_did_change(&self, call: &CallSession, is_video_muted: bool) {
        self.send(CallEvent::RemoteVideoMuteChanged {
            local_id: call.local_id(),
            is_video_muted,
        });
    }

    fn call_remote_sharing_screen_did_change(&self, call: &CallSession, is_sharing_screen: bool) {
        self.send(CallEvent::RemoteSharingScreenChanged {
            local_id: call.local_id(),
            is_sharing_screen,
        });
    }
}
