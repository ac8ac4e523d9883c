//! Realtime session driven by pointer positions on stdin.

use std::time::Duration;

use cursorcast_common::Result;
use cursorcast_config::PresenceSettings;
use cursorcast_presence::session::{spawn, CursorSnapshot};
use cursorcast_presence::{
    MarkerLayer, PointerEvent, PointerHub, RealtimeTransport, SessionController,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use super::shared_page;

const REPORT_INTERVAL: Duration = Duration::from_millis(250);

/// Run until stdin closes or Ctrl-C.
pub async fn run_connect(settings: PresenceSettings) -> Result<()> {
    let tree = shared_page()?;
    let hub = PointerHub::default();
    info!(
        participant = settings.session.id(),
        stream = %settings.stream,
        "Connecting"
    );

    let controller = SessionController::with_liveness(
        settings.session,
        settings.stream,
        MarkerLayer::new(),
        settings.liveness,
    );
    let handle = spawn(
        controller,
        RealtimeTransport::new(settings.realtime),
        tree.clone(),
        hub.clone(),
    )
    .await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(REPORT_INTERVAL);
    let mut seen: Vec<CursorSnapshot> = Vec::new();

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    let Some((x, y)) = parse_point(&line) else {
                        warn!(line = %line, "Expected `x y`");
                        continue;
                    };
                    match tree.read().await.hit_test(x, y) {
                        Some(path) => {
                            hub.dispatch(PointerEvent::new(path, x, y));
                        }
                        None => debug!(x, y, "Point is outside the page"),
                    }
                }
                None => break,
            },
            _ = ticker.tick() => {
                let Some(snapshot) = handle.snapshot().await else {
                    warn!("Session stopped");
                    break;
                };
                report_changes(&seen, &snapshot.cursors);
                seen = snapshot.cursors;
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.detach().await
}

/// Parse an `x y` line. Commas are accepted as separators too.
fn parse_point(line: &str) -> Option<(f64, f64)> {
    let mut parts = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|p| !p.is_empty());
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((x, y))
}

fn report_changes(previous: &[CursorSnapshot], current: &[CursorSnapshot]) {
    let (moved, gone) = diff_cursors(previous, current);
    for cursor in moved {
        match cursor.position {
            Some(p) => info!(id = %cursor.id, color = %cursor.color, x = p.x, y = p.y, "Cursor"),
            None => info!(id = %cursor.id, "Cursor without position"),
        }
    }
    for id in gone {
        info!(id = %id, "Cursor gone");
    }
}

/// Cursors that are new or changed, and ids that disappeared.
fn diff_cursors<'a>(
    previous: &'a [CursorSnapshot],
    current: &'a [CursorSnapshot],
) -> (Vec<&'a CursorSnapshot>, Vec<&'a str>) {
    let moved = current
        .iter()
        .filter(|c| !previous.contains(c))
        .collect();
    let gone = previous
        .iter()
        .filter(|p| !current.iter().any(|c| c.id == p.id))
        .map(|p| p.id.as_str())
        .collect();
    (moved, gone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cursorcast_common::Point;

    fn cursor(id: &str, x: f64) -> CursorSnapshot {
        CursorSnapshot {
            id: id.into(),
            color: "#ffffff".into(),
            position: Some(Point::new(x, 0.0)),
        }
    }

    #[test]
    fn parses_points() {
        assert_eq!(parse_point("10 20"), Some((10.0, 20.0)));
        assert_eq!(parse_point("  1.5,\t2.5 "), Some((1.5, 2.5)));
        assert_eq!(parse_point("10"), None);
        assert_eq!(parse_point("a b"), None);
        assert_eq!(parse_point("1 2 3"), None);
    }

    #[test]
    fn diff_reports_new_moved_and_gone() {
        let before = vec![cursor("a", 1.0), cursor("b", 1.0)];
        let after = vec![cursor("a", 1.0), cursor("c", 3.0)];
        let (moved, gone) = diff_cursors(&before, &after);
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].id, "c");
        assert_eq!(gone, vec!["b"]);

        let later = vec![cursor("a", 2.0), cursor("c", 3.0)];
        let (moved, gone) = diff_cursors(&after, &later);
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].id, "a");
        assert!(gone.is_empty());
    }
}
