use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of an individual call.
///
/// The local ringing state is split in two because the system call UI may
/// start ringing before the media engine is ready to answer. A call can only
/// be answered once the user has accepted and the media engine is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallState {
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "dialing")]
    Dialing,
    #[serde(rename = "answering")]
    Answering,
    #[serde(rename = "remoteRinging")]
    RemoteRinging,
    /// Media engine not ready, user has not answered.
    #[serde(rename = "localRinging_Anticipatory")]
    LocalRingingAnticipatory,
    /// Media engine ready, user has not answered.
    #[serde(rename = "localRinging_ReadyToAnswer")]
    LocalRingingReadyToAnswer,
    /// Media engine not ready, user has answered.
    #[serde(rename = "accepting")]
    Accepting,
    #[serde(rename = "connected")]
    Connected,
    #[serde(rename = "reconnecting")]
    Reconnecting,
    #[serde(rename = "localFailure")]
    LocalFailure,
    #[serde(rename = "localHangup")]
    LocalHangup,
    #[serde(rename = "remoteHangup")]
    RemoteHangup,
    #[serde(rename = "remoteHangupNeedPermission")]
    RemoteHangupNeedPermission,
    #[serde(rename = "remoteBusy")]
    RemoteBusy,
    #[serde(rename = "answeredElsewhere")]
    AnsweredElsewhere,
    #[serde(rename = "declinedElsewhere")]
    DeclinedElsewhere,
    #[serde(rename = "busyElsewhere")]
    BusyElsewhere,
}

impl CallState {
    pub const ALL: [CallState; 17] = [
        CallState::Idle,
        CallState::Dialing,
        CallState::Answering,
        CallState::RemoteRinging,
        CallState::LocalRingingAnticipatory,
        CallState::LocalRingingReadyToAnswer,
        CallState::Accepting,
        CallState::Connected,
        CallState::Reconnecting,
        CallState::LocalFailure,
        CallState::LocalHangup,
        CallState::RemoteHangup,
        CallState::RemoteHangupNeedPermission,
        CallState::RemoteBusy,
        CallState::AnsweredElsewhere,
        CallState::DeclinedElsewhere,
        CallState::BusyElsewhere,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CallState::Idle => "idle",
            CallState::Dialing => "dialing",
            CallState::Answering => "answering",
            CallState::RemoteRinging => "remoteRinging",
            CallState::LocalRingingAnticipatory => "localRinging_Anticipatory",
            CallState::LocalRingingReadyToAnswer => "localRinging_ReadyToAnswer",
            CallState::Accepting => "accepting",
            CallState::Connected => "connected",
            CallState::Reconnecting => "reconnecting",
            CallState::LocalFailure => "localFailure",
            CallState::LocalHangup => "localHangup",
            CallState::RemoteHangup => "remoteHangup",
            CallState::RemoteHangupNeedPermission => "remoteHangupNeedPermission",
            CallState::RemoteBusy => "remoteBusy",
            CallState::AnsweredElsewhere => "answeredElsewhere",
            CallState::DeclinedElsewhere => "declinedElsewhere",
            CallState::BusyElsewhere => "busyElsewhere",
        }
    }

    /// Terminal states are call outcomes; a call never leaves one.
    pub fn is_terminal(&self) -> bool {
        match self {
            CallState::LocalFailure
            | CallState::LocalHangup
            | CallState::RemoteHangup
            | CallState::RemoteHangupNeedPermission
            | CallState::RemoteBusy
            | CallState::AnsweredElsewhere
            | CallState::DeclinedElsewhere
            | CallState::BusyElsewhere => true,
            CallState::Idle
            | CallState::Dialing
            | CallState::Answering
            | CallState::RemoteRinging
            | CallState::LocalRingingAnticipatory
            | CallState::LocalRingingReadyToAnswer
            | CallState::Accepting
            | CallState::Connected
            | CallState::Reconnecting => false,
        }
    }

    /// Whether `next` is a legal successor of `self` in the transition table.
    ///
    /// Any live state may end the call, and a live state may be re-assigned
    /// to itself. Nothing leaves a terminal state.
    pub fn can_transition_to(&self, next: CallState) -> bool {
        use CallState::*;

        if self.is_terminal() {
            return false;
        }
        if next.is_terminal() || *self == next {
            return true;
        }
        matches!(
            (*self, next),
            (Idle, Dialing)
                | (Idle, Answering)
                | (Dialing, RemoteRinging)
                | (RemoteRinging, Connected)
                | (Answering, LocalRingingAnticipatory)
                | (Answering, LocalRingingReadyToAnswer)
                | (LocalRingingAnticipatory, LocalRingingReadyToAnswer)
                | (LocalRingingAnticipatory, Accepting)
                | (LocalRingingReadyToAnswer, Connected)
                | (Accepting, Connected)
                | (Connected, Reconnecting)
                | (Reconnecting, Connected)
        )
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallDirection {
    Outgoing,
    Incoming,
}

/// Selects between local media-routing configurations (system call UI or not).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallAdapterType {
    #[default]
    Default,
    NonCallKit,
}

/// Media type carried by the call offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferMediaType {
    #[default]
    Audio,
    Video,
}

/// Microphone permission as seen by the orchestrator when the call starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordPermission {
    Granted,
    Denied,
    Undetermined,
}

impl RecordPermission {
    pub fn is_granted(&self) -> bool {
        matches!(self, RecordPermission::Granted)
    }
}
