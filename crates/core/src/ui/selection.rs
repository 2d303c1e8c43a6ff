//! Selection handling and coordinate mapping.
//!
//! Selections are tracked in display coordinates while dragging and turned
//! into world rectangles only when a crop is requested.

use crate::coords::{OrthoCamera, WorldRect, display_to_world};
use eframe::egui;

/// Minimum distance (in pixels) for a drag to be considered a valid selection.
pub const MIN_SELECTION_DISTANCE: f32 = 4.0;

/// Determines if a drag was long enough to be an intentional selection.
pub fn is_valid_selection(start: egui::Pos2, end: egui::Pos2) -> bool {
    start.distance(end) > MIN_SELECTION_DISTANCE
}

/// Maps a display-space selection into world units.
pub fn selection_to_world(
    start: egui::Pos2,
    end: egui::Pos2,
    viewport: egui::Rect,
    camera: &OrthoCamera,
) -> WorldRect {
    WorldRect::from_corners(
        display_to_world(start, viewport, camera),
        display_to_world(end, viewport, camera),
    )
}

/// Result of processing selection input events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionEvent {
    /// User started a new selection drag.
    Started,
    /// User is actively dragging.
    Dragging,
    /// User completed a valid selection.
    Completed,
    /// User completed a drag but it was too small.
    Cancelled,
    /// No selection event occurred.
    None,
}

/// Processes primary-button drags into selection state changes.
pub fn process_drag_event(
    response: &egui::Response,
    start: &mut Option<egui::Pos2>,
    current: &mut Option<egui::Pos2>,
) -> SelectionEvent {
    let primary = egui::PointerButton::Primary;
    if response.drag_started_by(primary) {
        *start = response.interact_pointer_pos();
        *current = *start;
        return SelectionEvent::Started;
    }

    if response.dragged_by(primary) {
        *current = response.interact_pointer_pos().or(*current);
        return SelectionEvent::Dragging;
    }

    if response.drag_stopped_by(primary) {
        if let (Some(s), Some(e)) = (*start, *current) {
            if is_valid_selection(s, e) {
                return SelectionEvent::Completed;
            }
        }
        *start = None;
        *current = None;
        return SelectionEvent::Cancelled;
    }

    SelectionEvent::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::WorldPoint;

    #[test]
    fn short_drags_are_not_selections() {
        assert!(!is_valid_selection(egui::pos2(0.0, 0.0), egui::pos2(3.0, 0.0)));
        assert!(is_valid_selection(egui::pos2(0.0, 0.0), egui::pos2(3.0, 4.0)));
    }

    #[test]
    fn selection_maps_to_normalized_world_rect() {
        let viewport = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 100.0));
        let camera = OrthoCamera {
            center: WorldPoint::default(),
            zoom: 2.0,
        };
        // dragged from bottom-right to top-left
        let rect =
            selection_to_world(egui::pos2(70.0, 60.0), egui::pos2(30.0, 40.0), viewport, &camera);
        assert_eq!(
            rect,
            WorldRect {
                min_x: -10.0,
                min_y: -5.0,
                max_x: 10.0,
                max_y: 5.0,
            }
        );

        // the upper half of the screen is positive world y
        let rect =
            selection_to_world(egui::pos2(50.0, 10.0), egui::pos2(60.0, 20.0), viewport, &camera);
        assert_eq!((rect.min_y, rect.max_y), (15.0, 20.0));
    }
}
