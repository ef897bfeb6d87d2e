use crate::session::CallSession;
use crate::state::CallState;

/// Observer of a single call session.
///
/// Callbacks run synchronously on the call context, after the session has
/// finished its own bookkeeping, once per assignment. The session holds the
/// delegate weakly.
pub trait CallSessionDelegate: Send + Sync {
    fn call_state_did_change(&self, call: &CallSession, state: CallState);
    fn call_local_video_mute_did_change(&self, call: &CallSession, is_video_muted: bool);
    fn call_local_audio_mute_did_change(&self, call: &CallSession, is_audio_muted: bool);
    fn call_hold_did_change(&self, call: &CallSession, is_on_hold: bool);
    fn call_remote_video_mute_did_change(&self, call: &CallSession, is_video_muted: bool);
    fn call_remote_sharing_screen_did_change(&self, call: &CallSession, is_sharing_screen: bool);
}
