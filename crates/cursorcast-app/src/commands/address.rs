use cursorcast_common::{CursorcastError, Result};
use cursorcast_presence::{decode, encode};

use crate::page::sample_page;

/// Address of the element under `(x, y)` on the sample page.
pub fn encode_point(x: f64, y: f64) -> Result<String> {
    let tree = sample_page()?;
    let path = tree
        .hit_test(x, y)
        .ok_or_else(|| CursorcastError::Other(format!("no element at ({x}, {y})")))?;
    encode(&tree, &path)
        .ok_or_else(|| CursorcastError::Other(format!("no address for ({x}, {y})")))
}

/// Description and box of the element `address` resolves to.
pub fn decode_address(address: &str) -> Result<String> {
    let tree = sample_page()?;
    let node = decode(&tree, address)
        .ok_or_else(|| CursorcastError::Other(format!("{address:?} does not resolve")))?;
    let description = tree.describe(node);
    Ok(match tree.rect(node) {
        Some(r) => format!("{description} at ({}, {}) {}x{}", r.x, r.y, r.width, r.height),
        None => description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode_the_same_element() {
        let address = encode_point(860.0, 345.0).unwrap();
        assert_eq!(address, "body>main>profile-card>>>div>button");
        let described = decode_address(&address).unwrap();
        assert!(described.starts_with("<button>"), "{described}");
        assert!(described.ends_with("at (820, 330) 120x40"), "{described}");
    }

    #[test]
    fn outside_the_viewport_has_no_address() {
        assert!(encode_point(5000.0, 5000.0).is_err());
    }

    #[test]
    fn unknown_addresses_are_errors() {
        assert!(decode_address("body>aside").is_err());
        assert!(decode_address("").is_err());
        assert!(decode_address("body>main>>>div").is_err());
    }
}
