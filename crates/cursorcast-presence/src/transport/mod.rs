//! Transport contract and the in-process loopback implementation.
//!
//! The realtime adapter lives in [`crate::realtime`].

mod loopback;
mod types;

pub use loopback::{LoopbackBus, LoopbackTransport};
pub use types::{StreamSelector, Transport, TransportEvent};
