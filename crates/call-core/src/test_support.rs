use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::config::CallConfig;
use crate::contact::{ContactThread, RemoteAddress};
use crate::defects::{Defect, DefectReporter};
use crate::delegate::CallSessionDelegate;
use crate::events::CallEvent;
use crate::record::{CallRecord, CallRecordType};
use crate::session::{CallParams, CallSession};
use crate::state::CallState;

pub struct FakeThread;

impl FakeThread {
    pub fn shared() -> Arc<dyn ContactThread> {
        Arc::new(FakeThread)
    }

    pub fn address() -> RemoteAddress {
        RemoteAddress::new(Some(Uuid::nil()), Some("+15550100".to_string()))
    }
}

impl ContactThread for FakeThread {
    fn unique_id(&self) -> String {
        "thread-1".to_string()
    }

    fn contact_address(&self) -> RemoteAddress {
        Self::address()
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    defects: Mutex<Vec<Defect>>,
}

impl RecordingReporter {
    pub fn defects(&self) -> Vec<Defect> {
        self.defects.lock().unwrap().clone()
    }
}

impl DefectReporter for RecordingReporter {
    fn report(&self, defect: Defect) {
        self.defects.lock().unwrap().push(defect);
    }
}

#[derive(Default)]
pub struct RecordingDelegate {
    events: Mutex<Vec<CallEvent>>,
}

impl RecordingDelegate {
    pub fn events(&self) -> Vec<CallEvent> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: CallEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl CallSessionDelegate for RecordingDelegate {
    fn call_state_did_change(&self, call: &CallSession, state: CallState) {
        self.push(CallEvent::StateChanged {
            local_id: call.local_id(),
            state,
        });
    }

    fn call_local_video_mute_did_change(&self, call: &CallSession, is_video_muted: bool) {
        self.push(CallEvent::LocalVideoMuteChanged {
            local_id: call.local_id(),
            is_video_muted,
        });
    }

    fn call_local_audio_mute_did_change(&self, call: &CallSession, is_audio_muted: bool) {
        self.push(CallEvent::LocalAudioMuteChanged {
            local_id: call.local_id(),
            is_audio_muted,
        });
    }

    fn call_hold_did_change(&self, call: &CallSession, is_on_hold: bool) {
        self.push(CallEvent::HoldChanged {
            local_id: call.local_id(),
            is_on_hold,
        });
    }

    fn call_remote_video_mute_did_change(&self, call: &CallSession, is_video_muted: bool) {
        self.push(CallEvent::RemoteVideoMuteChanged {
            local_id: call.local_id(),
            is_video_muted,
        });
    }

    fn call_remote_sharing_screen_did_change(&self, call: &CallSession, is_sharing_screen: bool) {
        self.push(CallEvent::RemoteSharingScreenChanged {
            local_id: call.local_id(),
            is_sharing_screen,
        });
    }
}

pub struct MemoryRecord {
    call_type: Mutex<CallRecordType>,
    updates: AtomicUsize,
}

impl MemoryRecord {
    pub fn shared(call_type: CallRecordType) -> Arc<MemoryRecord> {
        Arc::new(MemoryRecord {
            call_type: Mutex::new(call_type),
            updates: AtomicUsize::new(0),
        })
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

impl CallRecord for MemoryRecord {
    fn call_type(&self) -> CallRecordType {
        *self.call_type.lock().unwrap()
    }

    fn update_call_type(&self, call_type: CallRecordType) {
        *self.call_type.lock().unwrap() = call_type;
        self.updates.fetch_add(1, Ordering::SeqCst);
    }
}

/// Session whose defects are recorded instead of logged or panicking.
pub fn session_with_reporter(params: CallParams) -> (CallSession, Arc<RecordingReporter>) {
    let reporter = Arc::new(RecordingReporter::default());
    let call = CallSession::with_reporter(params, &CallConfig::default(), reporter.clone());
    (call, reporter)
}

pub fn quiet_session(params: CallParams) -> CallSession {
    session_with_reporter(params).0
}
