//! Rendering surface for remote cursor markers.
//!
//! The presence store only talks to the [`MarkerSurface`] trait; hosts plug
//! in whatever draws the markers. [`MarkerLayer`] is the in-memory surface
//! used by the CLI and the tests.

use std::collections::HashMap;

use cursorcast_common::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(pub u64);

/// A surface that owns one visual marker per remote participant.
pub trait MarkerSurface {
    /// Create a marker for `participant_id`, drawn in `color`. New markers
    /// have no translation applied.
    fn create_marker(&mut self, participant_id: &str, color: &str) -> MarkerId;

    fn set_color(&mut self, marker: MarkerId, color: &str);

    /// Move the marker with a single 2-D translation.
    fn translate(&mut self, marker: MarkerId, x: f64, y: f64);

    fn remove_marker(&mut self, marker: MarkerId);

    /// Current translation of `marker`, for surfaces that can report it.
    fn position(&self, _marker: MarkerId) -> Option<Point> {
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub participant_id: String,
    pub color: String,
    /// `None` until the first successful positioning.
    pub translation: Option<Point>,
}

impl Marker {
    /// CSS transform for the current translation.
    pub fn transform(&self) -> Option<String> {
        self.translation
            .map(|p| format!("translate({}px, {}px)", p.x, p.y))
    }
}

/// In-memory marker surface.
#[derive(Debug, Default)]
pub struct MarkerLayer {
    markers: HashMap<MarkerId, Marker>,
    next_id: u64,
    created: u64,
    translations: u64,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, marker: MarkerId) -> Option<&Marker> {
        self.markers.get(&marker)
    }

    /// Find the live marker drawn for `participant_id`.
    pub fn find(&self, participant_id: &str) -> Option<&Marker> {
        self.markers
            .values()
            .find(|m| m.participant_id == participant_id)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Total markers ever created on this surface.
    pub fn created(&self) -> u64 {
        self.created
    }

    /// Total translate operations applied on this surface.
    pub fn translations(&self) -> u64 {
        self.translations
    }
}

impl MarkerSurface for MarkerLayer {
    fn create_marker(&mut self, participant_id: &str, color: &str) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.created += 1;
        self.markers.insert(
            id,
            Marker {
                participant_id: participant_id.to_string(),
                color: color.to_string(),
                translation: None,
            },
        );
        id
    }

    fn set_color(&mut self, marker: MarkerId, color: &str) {
        if let Some(m) = self.markers.get_mut(&marker) {
            m.color = color.to_string();
        }
    }

    fn translate(&mut self, marker: MarkerId, x: f64, y: f64) {
        if let Some(m) = self.markers.get_mut(&marker) {
            m.translation = Some(Point::new(x, y));
            self.translations += 1;
        }
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        self.markers.remove(&marker);
    }

    fn position(&self, marker: MarkerId) -> Option<Point> {
        self.markers.get(&marker)?.translation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_marker_is_unpositioned() {
        let mut layer = MarkerLayer::new();
        let id = layer.create_marker("alice", "#ff0000");
        let marker = layer.get(id).unwrap();
        assert_eq!(marker.translation, None);
        assert_eq!(marker.transform(), None);
        assert_eq!(layer.created(), 1);
    }

    #[test]
    fn translate_sets_transform() {
        let mut layer = MarkerLayer::new();
        let id = layer.create_marker("alice", "#ff0000");
        layer.translate(id, 12.5, 40.0);
        assert_eq!(
            layer.get(id).unwrap().transform().as_deref(),
            Some("translate(12.5px, 40px)")
        );
        assert_eq!(layer.translations(), 1);
    }

    #[test]
    fn recolor_and_remove() {
        let mut layer = MarkerLayer::new();
        let id = layer.create_marker("bob", "#00ff00");
        layer.set_color(id, "#0000ff");
        assert_eq!(layer.find("bob").unwrap().color, "#0000ff");
        layer.remove_marker(id);
        assert!(layer.is_empty());
        assert!(layer.find("bob").is_none());
    }

    #[test]
    fn operations_on_removed_marker_are_ignored() {
        let mut layer = MarkerLayer::new();
        let id = layer.create_marker("bob", "#00ff00");
        layer.remove_marker(id);
        layer.translate(id, 1.0, 1.0);
        layer.set_color(id, "#ffffff");
        assert!(layer.get(id).is_none());
        assert_eq!(layer.translations(), 0);
    }

    #[test]
    fn marker_ids_are_not_reused() {
        let mut layer = MarkerLayer::new();
        let a = layer.create_marker("a", "#000000");
        layer.remove_marker(a);
        let b = layer.create_marker("b", "#000000");
        assert_ne!(a, b);
    }
}
