//! Individual (1:1) call session core.
//!
//! Pure Rust crate with no platform dependencies. Models the lifecycle of
//! one voice/video call; telephony integration, media transport and
//! persistence are collaborators behind traits.

pub mod acceptance;
pub mod config;
pub mod contact;
pub mod defects;
pub mod delegate;
pub mod errors;
pub mod events;
pub mod logging;
pub mod record;
pub mod route;
pub mod session;
pub mod state;

#[cfg(test)]
mod test_support;

pub use config::{CallConfig, ConfigStore};
pub use contact::{ContactThread, RemoteAddress};
pub use defects::{Defect, DefectReporter, Severity, TracingReporter};
pub use delegate::CallSessionDelegate;
pub use errors::CallError;
pub use events::{CallEvent, EventChannel};
pub use logging::init_logging;
pub use record::{CallRecord, CallRecordType};
pub use route::{NetworkAdapterType, NetworkRoute};
pub use session::{CallParams, CallSession, CallSnapshot, DeferredAcceptance};
pub use state::{CallAdapterType, CallDirection, CallState, OfferMediaType, RecordPermission};
