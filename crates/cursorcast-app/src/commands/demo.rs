//! Two loopback participants on the sample page.
//!
//! `alice` sweeps her pointer across the page; `bob` watches where her
//! marker lands. The bus is then severed and `bob`'s store must be empty.

use std::time::Duration;

use cursorcast_common::{Point, Result};
use cursorcast_presence::session::spawn;
use cursorcast_presence::{
    Liveness, LocalSession, LoopbackBus, MarkerLayer, PointerEvent, PointerHub,
    SessionController, SessionState, StreamSelector,
};
use tracing::{info, warn};

use super::{shared_page, wait_active};

const FRAME: Duration = Duration::from_millis(16);
const START: Point = Point { x: 100.0, y: 150.0 };
const END: Point = Point { x: 1100.0, y: 380.0 };

#[derive(Debug, Clone)]
pub struct DemoOptions {
    pub moves: u32,
    pub throttle: Duration,
    pub liveness: Liveness,
}

#[derive(Debug, Clone, Default)]
pub struct DemoReport {
    /// Moves alice handed to the bus.
    pub sent: u64,
    /// Distinct marker positions bob observed for alice, in order.
    pub observed: Vec<Point>,
    /// Whether bob's store was empty after the disconnect.
    pub flushed: bool,
}

fn participant(id: &str, throttle: Duration, liveness: Liveness) -> SessionController {
    let session = LocalSession::from_parts(Some(id.to_string()), None, throttle);
    SessionController::with_liveness(
        session,
        StreamSelector::Named("demo".into()),
        MarkerLayer::new(),
        liveness,
    )
}

/// Point `i` of `n` on the scripted sweep.
fn scripted(i: u32, n: u32) -> Point {
    let t = if n <= 1 {
        0.0
    } else {
        f64::from(i) / f64::from(n - 1)
    };
    Point::new(START.x + (END.x - START.x) * t, START.y + (END.y - START.y) * t)
}

pub async fn run_demo(options: DemoOptions) -> Result<DemoReport> {
    let bus = LoopbackBus::new();
    let tree = shared_page()?;
    let alice_hub = PointerHub::default();
    let bob_hub = PointerHub::default();

    let alice = spawn(
        participant("alice", options.throttle, options.liveness),
        bus.transport(),
        tree.clone(),
        alice_hub.clone(),
    )
    .await?;
    let bob = spawn(
        participant("bob", options.throttle, options.liveness),
        bus.transport(),
        tree.clone(),
        bob_hub,
    )
    .await?;
    wait_active(&alice, Duration::from_secs(2)).await?;
    wait_active(&bob, Duration::from_secs(2)).await?;
    info!(moves = options.moves, throttle = ?options.throttle, "Demo started");

    let mut report = DemoReport::default();
    for i in 0..options.moves {
        let p = scripted(i, options.moves);
        let path = tree.read().await.hit_test(p.x, p.y);
        match path {
            Some(path) => {
                alice_hub.dispatch(PointerEvent::new(path, p.x, p.y));
            }
            None => warn!(x = p.x, y = p.y, "Scripted point misses the page"),
        }
        tokio::time::sleep(FRAME).await;
        observe(&bob, &mut report).await;
    }

    // Let the trailing throttled move arrive.
    tokio::time::sleep(options.throttle + FRAME).await;
    observe(&bob, &mut report).await;
    if let Some(snapshot) = alice.snapshot().await {
        report.sent = snapshot.counters.sent;
    }

    bus.sever();
    tokio::time::sleep(FRAME).await;
    if let Some(snapshot) = bob.snapshot().await {
        report.flushed = snapshot.state == SessionState::Disconnected && snapshot.cursors.is_empty();
        info!(
            state = %snapshot.state,
            cursors = snapshot.cursors.len(),
            "Bus severed"
        );
    }

    alice.detach().await?;
    bob.detach().await?;
    info!(
        sent = report.sent,
        observed = report.observed.len(),
        flushed = report.flushed,
        "Demo finished"
    );
    Ok(report)
}

async fn observe(bob: &cursorcast_presence::SessionHandle, report: &mut DemoReport) {
    let Some(snapshot) = bob.snapshot().await else {
        return;
    };
    let Some(position) = snapshot.cursor("alice").and_then(|c| c.position) else {
        return;
    };
    if report.observed.last() != Some(&position) {
        info!(x = position.x, y = position.y, "alice's marker moved");
        report.observed.push(position);
    }
}
