//! Portable element addresses.
//!
//! An address names an element by its path from the document: one segment
//! per element, `tag` or `tag[n]` where `n` is the 1-based position among
//! element siblings with the same tag. Segments are joined with `>`; a
//! step into a host's shadow root is joined with `>>>` instead.
//!
//! ```text
//! html>body>div[2]>x-card>>>section>p[3]
//! ```
//!
//! Addresses stay valid across re-renders as long as sibling order and tag
//! composition along the path are unchanged.

mod decode;
mod encode;
mod segment;

pub use decode::decode;
pub use encode::{encode, AddressEncoder};
pub use segment::Segment;

/// Joins a parent segment to a child segment.
pub const CHILD_SEPARATOR: &str = ">";
/// Joins a host segment to the first segment inside its shadow root.
pub const BOUNDARY_MARKER: &str = ">>>";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{ElementTree, NodeId};
    use cursorcast_common::Rect;

    fn el(tree: &mut ElementTree, parent: NodeId, tag: &str) -> NodeId {
        tree.create_element(parent, tag, Rect::default()).unwrap()
    }

    fn address_of(tree: &ElementTree, node: NodeId) -> String {
        encode(tree, &tree.composed_path(node)).unwrap()
    }

    /// html > body > [div, p, div > (span, text, span, em)]
    fn sample() -> (ElementTree, Vec<NodeId>) {
        let mut tree = ElementTree::new();
        let doc = tree.document();
        let html = el(&mut tree, doc, "html");
        let body = el(&mut tree, html, "body");
        let div1 = el(&mut tree, body, "div");
        let p = el(&mut tree, body, "p");
        let div2 = el(&mut tree, body, "div");
        let span1 = el(&mut tree, div2, "span");
        tree.append_text(div2).unwrap();
        let span2 = el(&mut tree, div2, "span");
        let em = el(&mut tree, div2, "em");
        (tree, vec![html, body, div1, p, div2, span1, span2, em])
    }

    /// Every connected element in the tree, shadow content included.
    fn all_elements(tree: &ElementTree) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![tree.document()];
        while let Some(node) = stack.pop() {
            if tree.is_element(node) {
                out.push(node);
            }
            stack.extend(tree.children(node).iter().copied());
            if let Some(shadow) = tree.shadow_root(node) {
                stack.push(shadow);
            }
        }
        out
    }

    #[test]
    fn encodes_plain_path() {
        let (tree, ids) = sample();
        assert_eq!(address_of(&tree, ids[0]), "html");
        assert_eq!(address_of(&tree, ids[2]), "html>body>div");
        assert_eq!(address_of(&tree, ids[3]), "html>body>p");
        assert_eq!(address_of(&tree, ids[4]), "html>body>div[2]");
    }

    #[test]
    fn text_nodes_do_not_shift_ordinals() {
        let (tree, ids) = sample();
        assert_eq!(address_of(&tree, ids[5]), "html>body>div[2]>span");
        assert_eq!(address_of(&tree, ids[6]), "html>body>div[2]>span[2]");
        assert_eq!(address_of(&tree, ids[7]), "html>body>div[2]>em");
    }

    #[test]
    fn round_trips_every_element() {
        let (tree, _) = sample();
        for node in all_elements(&tree) {
            let address = address_of(&tree, node);
            assert_eq!(decode(&tree, &address), Some(node), "{address}");
        }
    }

    #[test]
    fn same_tag_siblings_get_distinct_increasing_ordinals() {
        let mut tree = ElementTree::new();
        let doc = tree.document();
        let list = el(&mut tree, doc, "ul");
        let items: Vec<NodeId> = (0..5)
            .map(|i| {
                if i % 2 == 0 {
                    tree.append_text(list).unwrap();
                }
                el(&mut tree, list, "li")
            })
            .collect();

        let segments: Vec<Segment> = items
            .iter()
            .map(|&li| Segment::of(&tree, li).unwrap())
            .collect();
        for pair in segments.windows(2) {
            assert_ne!(pair[0].to_string(), pair[1].to_string());
            assert!(pair[0].ordinal < pair[1].ordinal);
        }
        assert_eq!(segments[0].to_string(), "li");
        assert_eq!(segments[4].to_string(), "li[5]");
    }

    #[test]
    fn tag_comparison_is_case_insensitive() {
        let (tree, ids) = sample();
        assert_eq!(decode(&tree, "HTML>Body>DIV[2]>SPAN[2]"), Some(ids[6]));
    }

    #[test]
    fn boundary_crossings_round_trip_in_order() {
        let mut tree = ElementTree::new();
        let doc = tree.document();
        let body = el(&mut tree, doc, "body");
        el(&mut tree, body, "x-panel");
        let outer_host = el(&mut tree, body, "x-panel");
        let outer_shadow = tree.attach_shadow(outer_host).unwrap();
        let section = el(&mut tree, outer_shadow, "section");
        let inner_host = el(&mut tree, section, "x-button");
        let inner_shadow = tree.attach_shadow(inner_host).unwrap();
        el(&mut tree, inner_shadow, "span");
        let label = el(&mut tree, inner_shadow, "span");

        let address = address_of(&tree, label);
        assert_eq!(
            address,
            "body>x-panel[2]>>>section>x-button>>>span[2]"
        );
        assert_eq!(decode(&tree, &address), Some(label));
    }

    #[test]
    fn shadow_content_is_invisible_to_plain_descent() {
        let mut tree = ElementTree::new();
        let doc = tree.document();
        let host = el(&mut tree, doc, "x-card");
        let shadow = tree.attach_shadow(host).unwrap();
        el(&mut tree, shadow, "p");

        assert!(decode(&tree, "x-card>p").is_none());
        assert!(decode(&tree, "x-card>>>p").is_some());
    }

    #[test]
    fn light_children_of_a_host_use_plain_separator() {
        let mut tree = ElementTree::new();
        let doc = tree.document();
        let host = el(&mut tree, doc, "x-card");
        tree.attach_shadow(host).unwrap();
        let slotted = el(&mut tree, host, "img");

        let address = address_of(&tree, slotted);
        assert_eq!(address, "x-card>img");
        assert_eq!(decode(&tree, &address), Some(slotted));
    }

    #[test]
    fn missing_shadow_root_is_not_found() {
        let (tree, _) = sample();
        assert!(decode(&tree, "html>body>p>>>span").is_none());
    }

    #[test]
    fn structural_change_is_not_found() {
        let (mut tree, ids) = sample();
        let address = address_of(&tree, ids[6]);
        tree.remove(ids[5]).unwrap();
        // span[2] no longer exists; the old span[2] is now span.
        assert!(decode(&tree, &address).is_none());
        assert_eq!(decode(&tree, "html>body>div[2]>span"), Some(ids[6]));
    }

    #[test]
    fn removed_element_is_not_found() {
        let (mut tree, ids) = sample();
        let address = address_of(&tree, ids[7]);
        tree.remove(ids[4]).unwrap();
        assert!(decode(&tree, &address).is_none());
    }

    #[test]
    fn malformed_addresses_are_not_found() {
        let (tree, _) = sample();
        for bad in [
            "",
            ">",
            "html>",
            "html>>body",
            "html>>>>body",
            "html>body>div[0]",
            "html>body>div[]",
            "html>body>div[x]",
            "html>body>div[2",
            "html>body>div[-1]",
            "html>body>div[99]",
            "html body",
            "html>body>dív",
        ] {
            assert!(decode(&tree, bad).is_none(), "{bad:?}");
        }
    }

    #[test]
    fn partial_resolution_is_never_returned() {
        let (tree, _) = sample();
        assert!(decode(&tree, "html>body>div[2]>strong").is_none());
    }

    #[test]
    fn encode_without_elements_is_none() {
        let mut tree = ElementTree::new();
        let doc = tree.document();
        let text = tree.append_text(doc).unwrap();
        assert!(encode(&tree, &[text, doc]).is_none());
        assert!(encode(&tree, &[]).is_none());
    }

    #[test]
    fn encoder_memoises_segments_within_a_pass() {
        let (tree, ids) = sample();
        let mut encoder = AddressEncoder::new(&tree);
        let first = encoder.encode(&tree.composed_path(ids[5])).unwrap();
        assert_eq!(encoder.cached(), 4);
        let second = encoder.encode(&tree.composed_path(ids[6])).unwrap();
        // html, body and div[2] were reused; only span[2] was added.
        assert_eq!(encoder.cached(), 5);
        assert_eq!(first, "html>body>div[2]>span");
        assert_eq!(second, "html>body>div[2]>span[2]");
    }

    #[test]
    fn partial_chain_does_not_poison_full_chain() {
        let (tree, ids) = sample();
        let mut encoder = AddressEncoder::new(&tree);
        assert_eq!(encoder.encode(&[ids[5], ids[4]]).as_deref(), Some("div[2]>span"));
        assert_eq!(
            encoder.encode(&tree.composed_path(ids[5])).as_deref(),
            Some("html>body>div[2]>span")
        );
        assert_eq!(encoder.encode(&[ids[5]]).as_deref(), Some("span"));
    }

    #[test]
    fn encode_is_idempotent() {
        let (tree, ids) = sample();
        let path = tree.composed_path(ids[7]);
        let mut encoder = AddressEncoder::new(&tree);
        assert_eq!(encoder.encode(&path), encoder.encode(&path));
        assert_eq!(encoder.encode(&path), encode(&tree, &path));
    }
}
