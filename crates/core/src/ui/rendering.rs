//! Drawing helpers for the editor canvas.
//!
//! The map is drawn as a textured quad rotated about its center; the pixel
//! buffer behind it is never rotated.

use eframe::egui;
use eframe::egui::emath::Rot2;

/// Builds the textured quad for an image of `size` display pixels centered
/// at `center`, turned clockwise by `rotation_degrees`.
///
/// Raster row 0 is the bottom edge, so the texture's v axis runs upward.
pub fn image_mesh(
    texture: egui::TextureId,
    center: egui::Pos2,
    size: egui::Vec2,
    rotation_degrees: f64,
) -> egui::Mesh {
    let mut mesh = egui::Mesh::with_texture(texture);
    mesh.add_rect_with_uv(
        egui::Rect::from_center_size(center, size),
        egui::Rect::from_min_max(egui::pos2(0.0, 1.0), egui::pos2(1.0, 0.0)),
        egui::Color32::WHITE,
    );

    // screen y points down, so a positive angle turns clockwise
    let rot = Rot2::from_angle(rotation_degrees.to_radians() as f32);
    for vertex in &mut mesh.vertices {
        vertex.pos = center + rot * (vertex.pos - center);
    }
    mesh
}

/// Dims everything in `canvas` outside `selection`.
pub fn draw_selection_overlay(
    painter: &egui::Painter,
    canvas: egui::Rect,
    selection: egui::Rect,
    alpha: u8,
) {
    let color = egui::Color32::from_black_alpha(alpha);
    let selection = selection.intersect(canvas);
    let bands = [
        // above, below, left, right
        egui::Rect::from_min_max(canvas.min, egui::pos2(canvas.max.x, selection.min.y)),
        egui::Rect::from_min_max(egui::pos2(canvas.min.x, selection.max.y), canvas.max),
        egui::Rect::from_min_max(
            egui::pos2(canvas.min.x, selection.min.y),
            egui::pos2(selection.min.x, selection.max.y),
        ),
        egui::Rect::from_min_max(
            egui::pos2(selection.max.x, selection.min.y),
            egui::pos2(canvas.max.x, selection.max.y),
        ),
    ];
    for band in bands.into_iter().filter(|b| b.is_positive()) {
        painter.rect_filled(band, 0.0, color);
    }
}

/// Draws a border around the selection rectangle.
pub fn draw_selection_border(
    painter: &egui::Painter,
    selection: egui::Rect,
    stroke_width: f32,
    color: egui::Color32,
) {
    painter.rect_stroke(
        selection,
        0.0,
        egui::Stroke::new(stroke_width, color),
        egui::StrokeKind::Middle,
    );
}

/// Outlines the rotated image footprint so transparent maps stay visible.
pub fn draw_image_outline(painter: &egui::Painter, mesh: &egui::Mesh, color: egui::Color32) {
    // add_rect_with_uv emits corners as top-left, top-right, bottom-left, bottom-right
    if let [tl, tr, bl, br] = mesh.vertices.as_slice() {
        painter.add(egui::Shape::closed_line(
            vec![tl.pos, tr.pos, br.pos, bl.pos],
            egui::Stroke::new(1.0, color),
        ));
    }
}
