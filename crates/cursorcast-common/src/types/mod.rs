mod color;
mod core;

pub use self::core::*;
pub use color::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_edge_exclusive() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert!(r.contains(10.0, 20.0));
        assert!(r.contains(109.9, 69.9));
        assert!(!r.contains(110.0, 40.0));
        assert!(!r.contains(50.0, 70.0));
        assert!(!r.contains(9.9, 25.0));
    }

    #[test]
    fn rect_serialization() {
        let r = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let json = serde_json::to_string(&r).unwrap();
        let deserialized: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(r, deserialized);
    }

    #[test]
    fn color_from_hex_6() {
        let c = Color::from_hex("#ff8800").unwrap();
        assert_eq!(c, Color::from_rgba(255, 136, 0, 255));
    }

    #[test]
    fn color_from_hex_8() {
        let c = Color::from_hex("#ff880080").unwrap();
        assert_eq!(c, Color::from_rgba(255, 136, 0, 128));
    }

    #[test]
    fn color_from_hex_invalid() {
        assert!(Color::from_hex("zzzzzz").is_none());
        assert!(Color::from_hex("#abc").is_none());
        assert!(Color::from_hex("").is_none());
        assert!(Color::from_hex("#ééé").is_none());
    }

    #[test]
    fn color_to_hex_opaque() {
        let c = Color::from_rgba(255, 0, 128, 255);
        assert_eq!(c.to_hex(), "#ff0080");
    }

    #[test]
    fn color_to_hex_translucent() {
        let c = Color::from_rgba(255, 0, 128, 64);
        assert_eq!(c.to_hex(), "#ff008040");
        assert_eq!(c.to_rgba_string(), "rgba(255,0,128,64)");
    }

    #[test]
    fn oklch_extremes_map_to_black_and_white() {
        assert_eq!(Color::from_oklch(1.0, 0.0, 0.0).to_hex(), "#ffffff");
        assert_eq!(Color::from_oklch(0.0, 0.0, 0.0).to_hex(), "#000000");
    }

    #[test]
    fn oklch_neutral_is_gray() {
        let c = Color::from_oklch(0.6, 0.0, 123.0);
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);
    }

    #[test]
    fn oklch_hue_changes_dominant_channel() {
        let red = Color::from_oklch(0.65, 0.2, 30.0);
        let blue = Color::from_oklch(0.65, 0.2, 260.0);
        assert!(red.r > red.b);
        assert!(blue.b > blue.r);
    }

    #[test]
    fn random_cursor_colors_are_opaque_hex() {
        for _ in 0..32 {
            let c = Color::random_cursor_color();
            assert_eq!(c.a, 255);
            let hex = c.to_hex();
            assert_eq!(hex.len(), 7);
            assert_eq!(Color::from_hex(&hex), Some(c));
        }
    }
}
