//! Subcommand implementations.

mod address;
mod connect;
mod demo;

pub use address::{decode_address, encode_point};
pub use connect::run_connect;
pub use demo::{run_demo, DemoOptions};

use std::sync::Arc;
use std::time::Duration;

use cursorcast_common::{CursorcastError, Result};
use cursorcast_presence::{ElementTree, SessionHandle, SessionState};
use tokio::sync::RwLock;

use crate::page::sample_page;

pub(crate) fn shared_page() -> Result<Arc<RwLock<ElementTree>>> {
    Ok(Arc::new(RwLock::new(sample_page()?)))
}

/// Poll `handle` until the session is active or `limit` elapses.
pub(crate) async fn wait_active(handle: &SessionHandle, limit: Duration) -> Result<()> {
    let poll = async {
        loop {
            match handle.state().await {
                Some(SessionState::Active) => return Ok(()),
                Some(_) => tokio::time::sleep(Duration::from_millis(5)).await,
                None => return Err(CursorcastError::Session("session stopped".into())),
            }
        }
    };
    tokio::time::timeout(limit, poll)
        .await
        .map_err(|_| CursorcastError::Session(format!("not active after {limit:?}")))?
}
