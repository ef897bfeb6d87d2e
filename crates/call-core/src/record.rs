use serde::{Deserialize, Serialize};

/// Classification of a persisted call-history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallRecordType {
    Incoming,
    Outgoing,
    IncomingIncomplete,
    OutgoingIncomplete,
    IncomingMissed,
    OutgoingMissed,
    IncomingDeclined,
    IncomingAnsweredElsewhere,
    IncomingDeclinedElsewhere,
    IncomingBusyElsewhere,
}

impl CallRecordType {
    /// The type an incomplete record takes once the call connects.
    pub fn completed_counterpart(&self) -> Option<CallRecordType> {
        match self {
            CallRecordType::OutgoingIncomplete => Some(CallRecordType::Outgoing),
            CallRecordType::IncomingIncomplete => Some(CallRecordType::Incoming),
            _ => None,
        }
    }
}

/// Handle to a call-history record owned by the persistence layer.
///
/// The session never creates or deletes records. It only reads the current
/// type and may request a one-way promotion.
pub trait CallRecord: Send + Sync {
    fn call_type(&self) -> CallRecordType;
    fn update_call_type(&self, call_type: CallRecordType);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_incomplete_types_promote() {
        assert_eq!(
            CallRecordType::OutgoingIncomplete.completed_counterpart(),
            Some(CallRecordType::Outgoing)
        );
        assert_eq!(
            CallRecordType::IncomingIncomplete.completed_counterpart(),
            Some(CallRecordType::Incoming)
        );
        assert_eq!(CallRecordType::Outgoing.completed_counterpart(), None);
        assert_eq!(CallRecordType::IncomingMissed.completed_counterpart(), None);
    }
}
