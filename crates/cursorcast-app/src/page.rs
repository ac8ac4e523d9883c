//! A small fixed page used by every command.

use cursorcast_common::{Rect, TreeError};
use cursorcast_presence::{ElementTree, NodeId};

pub const VIEWPORT_WIDTH: f64 = 1280.0;
pub const VIEWPORT_HEIGHT: f64 = 800.0;

fn el(tree: &mut ElementTree, parent: NodeId, tag: &str, rect: Rect) -> Result<NodeId, TreeError> {
    tree.create_element(parent, tag, rect)
}

/// Header with a nav, an article column, a `profile-card` custom element
/// rendering through a shadow root, and a footer.
pub fn sample_page() -> Result<ElementTree, TreeError> {
    let mut tree = ElementTree::new();
    let doc = tree.document();

    let body = el(&mut tree, doc, "body", Rect::new(0.0, 0.0, VIEWPORT_WIDTH, VIEWPORT_HEIGHT))?;

    let header = el(&mut tree, body, "header", Rect::new(0.0, 0.0, 1280.0, 80.0))?;
    let nav = el(&mut tree, header, "nav", Rect::new(880.0, 20.0, 380.0, 40.0))?;
    for i in 0..3 {
        let x = 880.0 + f64::from(i) * 130.0;
        el(&mut tree, nav, "a", Rect::new(x, 20.0, 120.0, 40.0))?;
    }

    let main = el(&mut tree, body, "main", Rect::new(0.0, 80.0, 1280.0, 640.0))?;
    let section = el(&mut tree, main, "section", Rect::new(40.0, 120.0, 560.0, 560.0))?;
    el(&mut tree, section, "h1", Rect::new(60.0, 140.0, 520.0, 60.0))?;
    for i in 0..3 {
        let y = 220.0 + f64::from(i) * 140.0;
        let p = el(&mut tree, section, "p", Rect::new(60.0, y, 520.0, 120.0))?;
        tree.append_text(p)?;
    }

    let card = el(&mut tree, main, "profile-card", Rect::new(680.0, 120.0, 560.0, 300.0))?;
    let shadow = tree.attach_shadow(card)?;
    let frame = el(&mut tree, shadow, "div", Rect::new(700.0, 140.0, 520.0, 260.0))?;
    el(&mut tree, frame, "img", Rect::new(720.0, 160.0, 80.0, 80.0))?;
    el(&mut tree, frame, "span", Rect::new(820.0, 160.0, 380.0, 40.0))?;
    el(&mut tree, frame, "span", Rect::new(820.0, 210.0, 380.0, 40.0))?;
    el(&mut tree, frame, "button", Rect::new(820.0, 330.0, 120.0, 40.0))?;

    el(&mut tree, body, "footer", Rect::new(0.0, 720.0, 1280.0, 80.0))?;

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cursorcast_presence::{decode, encode};

    fn address_at(tree: &ElementTree, x: f64, y: f64) -> String {
        let path = tree.hit_test(x, y).unwrap();
        encode(tree, &path).unwrap()
    }

    #[test]
    fn light_tree_addresses() {
        let tree = sample_page().unwrap();
        assert_eq!(address_at(&tree, 1200.0, 30.0), "body>header>nav>a[3]");
        assert_eq!(address_at(&tree, 100.0, 400.0), "body>main>section>p[2]");
        assert_eq!(address_at(&tree, 10.0, 750.0), "body>footer");
    }

    #[test]
    fn shadow_content_is_addressed_through_the_boundary() {
        let tree = sample_page().unwrap();
        let address = address_at(&tree, 900.0, 220.0);
        assert_eq!(address, "body>main>profile-card>>>div>span[2]");
    }

    #[test]
    fn addresses_resolve_back_to_the_hit_element() {
        let tree = sample_page().unwrap();
        for (x, y) in [(900.0, 30.0), (300.0, 600.0), (750.0, 200.0), (850.0, 350.0)] {
            let path = tree.hit_test(x, y).unwrap();
            let address = encode(&tree, &path).unwrap();
            assert_eq!(decode(&tree, &address), Some(path[0]), "{address}");
        }
    }
}
