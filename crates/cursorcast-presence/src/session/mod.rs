//! Session lifecycle: `Idle → Connecting → Active → Disconnected`.
//!
//! [`SessionController`] is the synchronous state machine; [`spawn`] runs it
//! on a tokio task against a [`Transport`](crate::transport::Transport) and
//! a [`PointerHub`](crate::reporter::PointerHub).

mod controller;
mod runtime;
mod types;

pub use controller::SessionController;
pub use runtime::{spawn, SessionHandle};
pub use types::{
    CursorSnapshot, Liveness, SessionCounters, SessionEffect, SessionSnapshot, SessionState,
};
