//! Coordinate mapping between display, world and texture space.
//!
//! World units describe the unrotated image plane with the origin at the
//! image center, x to the right and y up. Texture row 0 is the bottom edge,
//! so texture rows grow with world y. Display space is pointer pixels inside
//! a viewport with y down; an orthographic [`OrthoCamera`] maps between the
//! two and flips the vertical axis. Positive rotations turn the displayed
//! image clockwise. Texture space is source pixel indices.

use eframe::egui;

/// Rounds half-way cases toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// A point in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

impl WorldPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in world units with `min <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldRect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl WorldRect {
    /// Builds a rectangle from two opposite corners in any order.
    pub fn from_corners(a: WorldPoint, b: WorldPoint) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// Rectangle of the given size centered on the world origin.
    pub fn centered(width: f64, height: f64) -> Self {
        Self {
            min_x: -width / 2.0,
            min_y: -height / 2.0,
            max_x: width / 2.0,
            max_y: height / 2.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> WorldPoint {
        WorldPoint::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

/// Undoes a clockwise display rotation of `degrees` about the world origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseRotation {
    cos: f64,
    sin: f64,
}

impl InverseRotation {
    pub fn from_degrees(degrees: f64) -> Self {
        let (sin, cos) = (-degrees.to_radians()).sin_cos();
        Self { cos, sin }
    }

    pub fn apply(&self, point: WorldPoint) -> WorldPoint {
        WorldPoint::new(
            point.x * self.cos + point.y * self.sin,
            -point.x * self.sin + point.y * self.cos,
        )
    }
}

/// Maps a world point to the nearest source pixel index.
///
/// The result may lie outside the texture; callers bounds-check it.
pub fn world_to_texture(
    world_x: f64,
    world_y: f64,
    display_width: f64,
    display_height: f64,
    source_width: u32,
    source_height: u32,
) -> (i64, i64) {
    let sx = source_width as f64 / display_width;
    let sy = source_height as f64 / display_height;
    (
        round_half_up((world_x + display_width / 2.0) * sx) as i64,
        round_half_up((world_y + display_height / 2.0) * sy) as i64,
    )
}

/// Width and height of the axis-aligned box around a rotated rectangle.
pub fn rotated_extent(width: f64, height: f64, degrees: f64) -> (f64, f64) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    (width * cos + height * sin, width * sin + height * cos)
}

/// Top-down orthographic camera: a world-space center and a zoom in
/// display pixels per world unit. There is no tilt to drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoCamera {
    pub center: WorldPoint,
    pub zoom: f64,
}

impl Default for OrthoCamera {
    fn default() -> Self {
        Self {
            center: WorldPoint::default(),
            zoom: 1.0,
        }
    }
}

impl OrthoCamera {
    /// Centers on the origin and zooms so a `width` x `height` world box fits
    /// inside `viewport` with `margin` display pixels to spare on each side.
    pub fn fit(viewport: egui::Rect, width: f64, height: f64, margin: f32) -> Self {
        let avail_w = (viewport.width() - 2.0 * margin) as f64;
        let avail_h = (viewport.height() - 2.0 * margin) as f64;
        let zoom = (avail_w / width).min(avail_h / height);
        Self {
            center: WorldPoint::default(),
            zoom: if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 },
        }
    }

    /// Multiplies the zoom, keeping `anchor` fixed on screen.
    pub fn zoom_about(&mut self, factor: f64, anchor: WorldPoint) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        self.center = WorldPoint::new(
            anchor.x + (self.center.x - anchor.x) / factor,
            anchor.y + (self.center.y - anchor.y) / factor,
        );
        self.zoom *= factor;
    }

    /// Moves the view by a display-space delta.
    pub fn pan(&mut self, delta: egui::Vec2) {
        self.center.x -= delta.x as f64 / self.zoom;
        self.center.y += delta.y as f64 / self.zoom;
    }
}

/// Unprojects a pointer position inside `viewport` into world units.
pub fn display_to_world(
    pointer: egui::Pos2,
    viewport: egui::Rect,
    camera: &OrthoCamera,
) -> WorldPoint {
    let offset = pointer - viewport.center();
    WorldPoint::new(
        camera.center.x + offset.x as f64 / camera.zoom,
        camera.center.y - offset.y as f64 / camera.zoom,
    )
}

/// Projects a world point into display coordinates; inverse of [`display_to_world`].
pub fn world_to_display(
    point: WorldPoint,
    viewport: egui::Rect,
    camera: &OrthoCamera,
) -> egui::Pos2 {
    let center = viewport.center();
    egui::pos2(
        center.x + ((point.x - camera.center.x) * camera.zoom) as f32,
        center.y - ((point.y - camera.center.y) * camera.zoom) as f32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(200.0, 100.0))
    }

    #[test]
    fn rounding_matches_half_up() {
        assert_eq!(round_half_up(127.5), 128.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(-1.5), -1.0);
        assert_eq!(round_half_up(2.49), 2.0);
    }

    #[test]
    fn corners_are_normalized() {
        let rect =
            WorldRect::from_corners(WorldPoint::new(5.0, -1.0), WorldPoint::new(-3.0, 4.0));
        assert_eq!(rect, WorldRect { min_x: -3.0, min_y: -1.0, max_x: 5.0, max_y: 4.0 });
        assert_eq!((rect.width(), rect.height()), (8.0, 5.0));
        assert_eq!(rect.center(), WorldPoint::new(1.0, 1.5));
    }

    #[test]
    fn display_maps_through_camera() {
        let camera = OrthoCamera {
            center: WorldPoint::default(),
            zoom: 2.0,
        };
        let world = |x, y| display_to_world(egui::pos2(x, y), viewport(), &camera);
        assert_eq!(world(100.0, 50.0), WorldPoint::new(0.0, 0.0));
        // up on screen is up in the world
        assert_eq!(world(120.0, 40.0), WorldPoint::new(10.0, 5.0));
    }

    #[test]
    fn display_mapping_inverts() {
        let camera = OrthoCamera {
            center: WorldPoint::new(3.0, -7.0),
            zoom: 0.5,
        };
        let pointer = egui::pos2(37.0, 81.0);
        let world = display_to_world(pointer, viewport(), &camera);
        assert_eq!(world_to_display(world, viewport(), &camera), pointer);
    }

    #[test]
    fn fit_uses_tighter_axis() {
        let camera = OrthoCamera::fit(viewport(), 50.0, 10.0, 0.0);
        assert_eq!(camera.zoom, 4.0);
        let camera = OrthoCamera::fit(viewport(), 0.0, 0.0, 0.0);
        assert_eq!(camera.zoom, 1.0);
    }

    #[test]
    fn zoom_keeps_anchor_in_place() {
        let mut camera = OrthoCamera::default();
        let anchor = WorldPoint::new(10.0, 20.0);
        let before = world_to_display(anchor, viewport(), &camera);
        camera.zoom_about(2.0, anchor);
        assert_eq!(world_to_display(anchor, viewport(), &camera), before);
        assert_eq!(camera.zoom, 2.0);
    }

    #[test]
    fn pan_moves_center_against_drag() {
        let mut camera = OrthoCamera {
            center: WorldPoint::default(),
            zoom: 2.0,
        };
        camera.pan(egui::vec2(10.0, -4.0));
        assert_eq!(camera.center, WorldPoint::new(-5.0, -2.0));
    }

    #[test]
    fn texture_mapping_scales_and_offsets() {
        assert_eq!(world_to_texture(-2.0, -2.0, 4.0, 4.0, 4, 4), (0, 0));
        assert_eq!(world_to_texture(1.0, 0.0, 4.0, 4.0, 4, 4), (3, 2));
        // display at half scale: one world unit spans two texels
        assert_eq!(world_to_texture(1.0, -1.0, 2.0, 2.0, 4, 4), (4, 0));
    }

    #[test]
    fn inverse_rotation_by_quarter_turn() {
        let rotation = InverseRotation::from_degrees(90.0);
        let p = rotation.apply(WorldPoint::new(1.0, 0.0));
        assert!((p.x - 0.0).abs() < 1e-12 && (p.y - 1.0).abs() < 1e-12);
        let p = rotation.apply(WorldPoint::new(0.0, 1.0));
        assert!((p.x + 1.0).abs() < 1e-12 && p.y.abs() < 1e-12);
    }

    #[test]
    fn rotated_extent_swaps_at_quarter_turn() {
        let (w, h) = rotated_extent(4.0, 2.0, 90.0);
        assert!((w - 2.0).abs() < 1e-12 && (h - 4.0).abs() < 1e-12);
        let (w, h) = rotated_extent(2.0, 2.0, 45.0);
        assert!((w - 2.0 * 2f64.sqrt()).abs() < 1e-12 && (h - w).abs() < 1e-12);
    }
}
