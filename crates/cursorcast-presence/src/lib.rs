//! Live pointer presence over a shared element tree.
//!
//! Local pointer movement is encoded into portable element addresses and
//! broadcast; remote moves are decoded back into local elements and drawn
//! as cursor markers that expire when their owner goes quiet.

pub mod address;
pub mod identity;
pub mod marker;
pub mod protocol;
pub mod realtime;
pub mod reaper;
pub mod reporter;
pub mod session;
pub mod store;
pub mod transport;
pub mod tree;

pub use address::{decode, encode, AddressEncoder};
pub use identity::LocalSession;
pub use marker::{Marker, MarkerId, MarkerLayer, MarkerSurface};
pub use protocol::{Location, PresenceMessage};
pub use realtime::{RealtimeConfig, RealtimeTransport};
pub use reaper::{Reaper, ReaperState};
pub use reporter::{LocalInputReporter, PointerEvent, PointerHub, PointerSubscription};
pub use session::{
    Liveness, SessionController, SessionHandle, SessionSnapshot, SessionState,
};
pub use store::{CursorEntry, PresenceStore, UpsertOutcome};
pub use transport::{LoopbackBus, LoopbackTransport, StreamSelector, Transport, TransportEvent};
pub use tree::{ElementTree, NodeId, NodeKind};
