use std::path::PathBuf;

use crate::config::EngineConfig;
use crate::engine::DrawingEngine;
use crate::export::{ExportFormat, FileExporter};
use crate::input::TouchInputHandler;
use crate::render::PixmapCanvas;
use crate::style::Argb;

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct FingerPaintApp {
    config: EngineConfig,
    export_format: ExportFormat,
    save_dir: PathBuf,

    // The canvas itself is not persisted, only the settings it was built from
    #[serde(skip)]
    engine: DrawingEngine,
    #[serde(skip)]
    input: TouchInputHandler,
    #[serde(skip)]
    frame: Option<PixmapCanvas>,
    #[serde(skip)]
    texture: Option<egui::TextureHandle>,
    #[serde(skip)]
    status: Option<String>,
}

impl Default for FingerPaintApp {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            engine: DrawingEngine::new(&config),
            config,
            export_format: ExportFormat::default(),
            save_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            input: TouchInputHandler::new(),
            frame: None,
            texture: None,
            status: None,
        }
    }
}

impl FingerPaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let Some(storage) = cc.storage else {
            return Self::default();
        };
        let mut app: Self = eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default();
        if let Err(err) = app.config.validate() {
            log::warn!("Ignoring stored settings: {}", err);
            app.config = EngineConfig::default();
        }
        app.engine = DrawingEngine::new(&app.config);
        app
    }

    fn save_image(&mut self) {
        let mut exporter = FileExporter::new(&self.save_dir).with_format(self.export_format);
        self.status = Some(match self.engine.save_with(&mut exporter) {
            Ok(path) => format!("Image saved to {}", path.display()),
            Err(err) => {
                log::warn!("Image not saved: {}", err);
                format!("Image not saved: {}", err)
            }
        });
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Color:");
            let mut color = self.engine.drawing_color().to_color32();
            if egui::color_picker::color_edit_button_srgba(ui, &mut color, egui::color_picker::Alpha::OnlyBlend)
                .changed()
            {
                self.engine.set_drawing_color(Argb::from_color32(color));
            }

            let mut width = self.engine.stroke_width();
            if ui.add(egui::Slider::new(&mut width, 1.0..=100.0).text("Width")).changed() {
                self.engine.set_stroke_width(width);
            }

            ui.separator();

            if ui.button("Clear").clicked() {
                self.engine.clear();
                self.status = None;
            }
            if ui.button("Save").clicked() {
                self.save_image();
            }

            if let Some(status) = &self.status {
                ui.label(status);
            }
        });
    }

    fn canvas(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::drag());
        let rect = response.rect;
        let (width, height) = (rect.width().floor() as u32, rect.height().floor() as u32);
        if width == 0 || height == 0 {
            return;
        }
        if let Err(err) = self.engine.resize(width, height) {
            log::error!("Canvas resize failed: {}", err);
            return;
        }

        self.input.set_canvas_rect(rect);
        for batch in self.input.process_input(ctx) {
            self.engine.on_input_event(&batch);
        }

        let stale_frame = self.frame.as_ref().map(PixmapCanvas::size) != Some((width, height));
        if stale_frame {
            match PixmapCanvas::new(width, height) {
                Ok(frame) => self.frame = Some(frame),
                Err(err) => {
                    log::error!("Frame allocation failed: {}", err);
                    return;
                }
            }
        }

        if self.engine.take_redraw_request() || stale_frame || self.texture.is_none() {
            if let Some(frame) = self.frame.as_mut() {
                self.engine.on_frame(frame);
                let image = frame.to_color_image();
                match self.texture.as_mut() {
                    Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
                    None => {
                        self.texture = Some(ctx.load_texture("finger_paint_canvas", image, egui::TextureOptions::NEAREST));
                    }
                }
            }
        }

        if let Some(texture) = &self.texture {
            let canvas_rect = egui::Rect::from_min_size(rect.min, egui::vec2(width as f32, height as f32));
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(texture.id(), canvas_rect, uv, egui::Color32::WHITE);
        }
    }
}

impl eframe::App for FingerPaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.config = self.engine.config();
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            self.controls(ui);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.canvas(ctx, ui);
            });
    }
}
