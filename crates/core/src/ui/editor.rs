//! Main editor application.
//!
//! This module contains the `MapEditorApp` struct which implements the
//! `eframe::App` trait: the current map is drawn rotated about its center,
//! a primary-button drag selects a rectangle and Enter crops it. The crop
//! result replaces the displayed image and can be rotated and cropped again.

use super::rendering::{
    draw_image_outline, draw_selection_border, draw_selection_overlay, image_mesh,
};
use super::selection::{SelectionEvent, process_drag_event, selection_to_world};
use super::state::{EditorOutcome, EditorStatus};
use crate::config::EditorConfig;
use crate::coords::{OrthoCamera, WorldPoint, display_to_world, rotated_extent, world_to_display};
use crate::crop::{CropRequest, crop};
use crate::error::{EditorError, Result};
use crate::raster::RasterImage;
use crate::texture::ResourceCache;
use eframe::egui;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Display pixels kept free around the fitted image.
const FIT_MARGIN: f32 = 24.0;

pub struct MapEditorApp {
    // Image state
    image: RasterImage,
    texture: ResourceCache<egui::TextureHandle>,
    needs_upload: bool,
    rotation_degrees: f64,
    camera: Option<OrthoCamera>,

    // Selection state
    selection_start: Option<egui::Pos2>,
    current_pos: Option<egui::Pos2>,
    is_selection_finalized: bool,

    config: EditorConfig,
    status: EditorStatus,
    crops: usize,
    outcome: Arc<Mutex<Option<EditorOutcome>>>,
}

impl MapEditorApp {
    pub fn new(
        image: RasterImage,
        rotation_degrees: f64,
        config: EditorConfig,
        outcome: Arc<Mutex<Option<EditorOutcome>>>,
    ) -> Self {
        Self {
            image,
            texture: ResourceCache::new(),
            needs_upload: true,
            rotation_degrees,
            camera: None,
            selection_start: None,
            current_pos: None,
            is_selection_finalized: false,
            config,
            status: EditorStatus::Idle,
            crops: 0,
            outcome,
        }
    }

    fn display_size(&self) -> (f64, f64) {
        self.image.display_size(self.config.display_scale)
    }

    /// Re-uploads the texture after the image changed, reusing the GPU
    /// texture when the dimensions did not.
    fn upload_texture(&mut self, ctx: &egui::Context) {
        if !self.needs_upload {
            return;
        }
        let (width, height) = (self.image.width(), self.image.height());
        let reused = self.texture.dimensions() == Some((width, height));
        let color = egui::ColorImage::from_rgba_unmultiplied(
            [width as usize, height as usize],
            self.image.pixels(),
        );
        self.texture.ensure(
            width,
            height,
            || ctx.load_texture("map", color.clone(), egui::TextureOptions::NEAREST),
            |handle| handle.set(color.clone(), egui::TextureOptions::NEAREST),
        );
        self.needs_upload = false;
        debug!(width, height, reused, "Uploaded map texture");
    }

    fn fit_camera(&mut self, viewport: egui::Rect) {
        let (width, height) = self.display_size();
        let (width, height) = rotated_extent(width, height, self.rotation_degrees);
        self.camera = Some(OrthoCamera::fit(viewport, width, height, FIT_MARGIN));
    }

    fn clear_selection(&mut self) {
        self.selection_start = None;
        self.current_pos = None;
        self.is_selection_finalized = false;
    }

    fn crop_selection(&mut self, viewport: egui::Rect) {
        let (Some(start), Some(end), Some(camera)) =
            (self.selection_start, self.current_pos, self.camera)
        else {
            return;
        };
        let request = CropRequest::for_image(
            &self.image,
            self.config.display_scale,
            self.rotation_degrees,
            selection_to_world(start, end, viewport, &camera),
        )
        .with_background(self.config.background);

        match crop(Some(&self.image), &request) {
            Some(cropped) => {
                info!(
                    width = cropped.width(),
                    height = cropped.height(),
                    "Selection cropped"
                );
                self.status = EditorStatus::Cropped {
                    width: cropped.width(),
                    height: cropped.height(),
                };
                self.image = cropped;
                self.needs_upload = true;
                self.rotation_degrees = 0.0;
                self.crops += 1;
                self.fit_camera(viewport);
            }
            None => self.status = EditorStatus::Rejected,
        }
        self.clear_selection();
        self.store_outcome();
    }

    fn store_outcome(&self) {
        if let Ok(mut outcome) = self.outcome.lock() {
            *outcome = Some(EditorOutcome {
                image: self.image.clone(),
                rotation_degrees: self.rotation_degrees,
                crops: self.crops,
            });
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context, viewport: egui::Rect) {
        let (rotate, shift, enter, escape, fit) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::R),
                i.modifiers.shift,
                i.key_pressed(egui::Key::Enter),
                i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::F),
            )
        });

        if rotate {
            let step = self.config.rotation_step_degrees;
            let delta = if shift { -step } else { step };
            self.rotation_degrees = (self.rotation_degrees + delta) % 360.0;
            self.store_outcome();
        }
        if fit {
            self.fit_camera(viewport);
        }
        if enter && self.is_selection_finalized {
            self.crop_selection(viewport);
        }
        if escape {
            if self.selection_start.is_some() {
                self.clear_selection();
            } else {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }

    fn handle_camera_input(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        viewport: egui::Rect,
    ) {
        let Some(camera) = self.camera.as_mut() else {
            return;
        };
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            camera.pan(response.drag_delta());
        }

        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll != 0.0 {
            if let Some(pointer) = response.hover_pos() {
                let anchor = display_to_world(pointer, viewport, camera);
                camera.zoom_about((scroll as f64 / 200.0).exp(), anchor);
            }
        }
    }

    fn draw_status(&self, ctx: &egui::Context) {
        let text = format!(
            "{}x{} px  |  rotation {:.0}° cw  |  {}  |  \
             R/Shift+R rotate, F fit, right-drag pan, Esc close",
            self.image.width(),
            self.image.height(),
            self.rotation_degrees,
            self.status.message(),
        );
        egui::Area::new(egui::Id::new("status_line"))
            .fixed_pos(egui::pos2(8.0, 8.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .fill(egui::Color32::from_rgb(30, 30, 30))
                    .inner_margin(6.0)
                    .show(ui, |ui| ui.label(text));
            });
    }
}

impl eframe::App for MapEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());
        self.upload_texture(ctx);

        let panel_frame = egui::Frame::default()
            .fill(egui::Color32::from_gray(40))
            .inner_margin(egui::Margin::same(0));

        egui::CentralPanel::default().frame(panel_frame).show(ctx, |ui| {
            let viewport = ui.max_rect();
            if self.camera.is_none() {
                self.fit_camera(viewport);
            }

            let response = ui.interact(viewport, ui.id().with("canvas"), egui::Sense::drag());
            let event =
                process_drag_event(&response, &mut self.selection_start, &mut self.current_pos);
            match event {
                SelectionEvent::Started => self.is_selection_finalized = false,
                SelectionEvent::Completed => self.is_selection_finalized = true,
                _ => {}
            }
            self.handle_camera_input(ui, &response, viewport);
            self.handle_keys(ctx, viewport);

            let (Some(camera), Some(texture)) = (self.camera, self.texture.get()) else {
                return;
            };
            let (width, height) = self.display_size();
            let center = world_to_display(WorldPoint::default(), viewport, &camera);
            let size = egui::vec2((width * camera.zoom) as f32, (height * camera.zoom) as f32);
            let mesh = image_mesh(texture.id(), center, size, self.rotation_degrees);
            draw_image_outline(ui.painter(), &mesh, egui::Color32::from_gray(90));
            ui.painter().add(egui::Shape::mesh(mesh));

            if let (Some(start), Some(current)) = (self.selection_start, self.current_pos) {
                let selection = egui::Rect::from_two_pos(start, current);
                draw_selection_overlay(ui.painter(), viewport, selection, 120);
                draw_selection_border(ui.painter(), selection, 1.5, egui::Color32::WHITE);
            }
        });

        self.draw_status(ctx);
    }
}

/// Opens the editor window and blocks until it is closed.
///
/// # Arguments
/// * `image` - The map to edit
/// * `rotation_degrees` - Initial display rotation
/// * `config` - Background color, rotation step and display scale
///
/// # Returns
/// The image shown when the window closed, with its rotation and crop count.
pub fn run(
    image: RasterImage,
    rotation_degrees: f64,
    config: EditorConfig,
) -> Result<EditorOutcome> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_title("Map Editor"),
        ..Default::default()
    };

    let initial = EditorOutcome {
        image: image.clone(),
        rotation_degrees,
        crops: 0,
    };
    let outcome = Arc::new(Mutex::new(None));
    let app_outcome = outcome.clone();

    eframe::run_native(
        "Map Editor",
        options,
        Box::new(move |_cc| {
            let app = MapEditorApp::new(image, rotation_degrees, config, app_outcome);
            Ok(Box::new(app) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|e| EditorError::ui(format!("Failed to run UI: {}", e)))?;

    let mut lock = outcome
        .lock()
        .map_err(|_| EditorError::ui("Failed to acquire outcome lock"))?;
    Ok(lock.take().unwrap_or(initial))
}
