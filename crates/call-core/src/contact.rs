use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable address of the remote party.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteAddress {
    pub service_id: Option<Uuid>,
    pub phone_number: Option<String>,
}

impl RemoteAddress {
    pub fn new(service_id: Option<Uuid>, phone_number: Option<String>) -> Self {
        Self {
            service_id,
            phone_number,
        }
    }
}

impl fmt::Display for RemoteAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.service_id, &self.phone_number) {
            (Some(id), Some(phone)) => write!(f, "<{id}, {phone}>"),
            (Some(id), None) => write!(f, "<{id}>"),
            (None, Some(phone)) => write!(f, "<{phone}>"),
            (None, None) => f.write_str("<unknown>"),
        }
    }
}

/// The 1:1 conversation a call belongs to.
///
/// Owned by the contacts layer; a call session only keeps a shared handle.
pub trait ContactThread: Send + Sync {
    fn unique_id(&self) -> String;
    fn contact_address(&self) -> RemoteAddress;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefers_both_identifiers() {
        let id = Uuid::nil();
        let addr = RemoteAddress::new(Some(id), Some("+15550100".into()));
        assert_eq!(addr.to_string(), format!("<{id}, +15550100>"));
        assert_eq!(RemoteAddress::new(None, None).to_string(), "<unknown>");
    }
}
