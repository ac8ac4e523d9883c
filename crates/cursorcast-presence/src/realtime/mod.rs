//! Supabase Realtime transport over the Phoenix Channels v1 protocol.
//!
//! A background task owns the WebSocket, sends heartbeats, rejoins
//! channels after a reconnect, and backs off exponentially between
//! attempts. [`RealtimeTransport`] adapts it to the session's
//! [`Transport`](crate::transport::Transport) contract.

mod client;
mod connection;
mod handler;
mod transport;
mod types;

pub use client::RealtimeClient;
pub use transport::RealtimeTransport;
pub use types::{ChannelConfig, PhoenixMessage, RealtimeConfig, RealtimeEvent, SIGNED_TOPIC};
