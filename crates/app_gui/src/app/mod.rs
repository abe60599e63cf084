//! Application shell: tabs, navigation and the captured photo preview.

mod camera_panel;
mod result_panel;
mod settings;

use crate::camera::DesktopCamera;
use anyhow::Result;
use eframe::{App, Frame, egui};
use freshcam_core::{
    CaptureController, ClassificationPipeline, Classifier, EndpointConfig, FreshcamConfig,
    HttpClassifier, ImageHandle, Navigator,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const PREVIEW_SIZE: u32 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Panel {
    Camera,
    Result,
    Settings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Route {
    Result(String),
    Camera,
    Back,
}

/// Collects navigation requests; the shell applies them after drawing.
#[derive(Default)]
struct UiNavigator {
    pending: Option<Route>,
}

impl Navigator for UiNavigator {
    fn show_result(&mut self, image_uri: &str) {
        self.pending = Some(Route::Result(image_uri.to_string()));
    }

    fn go_to_camera(&mut self) {
        self.pending = Some(Route::Camera);
    }

    fn go_back(&mut self) {
        self.pending = Some(Route::Back);
    }
}

pub struct UiApp {
    panel: Panel,
    capture: CaptureController<DesktopCamera>,
    classifier: Arc<dyn Classifier>,
    pipeline: Option<ClassificationPipeline>,
    preview: Option<egui::TextureHandle>,
    nav: UiNavigator,
    config: FreshcamConfig,
    config_path: PathBuf,
    pending_endpoint: EndpointConfig,
    status: String,
    app_version: &'static str,
}

impl UiApp {
    pub fn new(config: FreshcamConfig, config_path: PathBuf, photos_dir: PathBuf) -> Result<Self> {
        let classifier = HttpClassifier::new(&config.endpoint)?;
        tracing::info!("classification endpoint: {}", classifier.url());
        Ok(Self {
            panel: Panel::Camera,
            capture: CaptureController::new(DesktopCamera::new(photos_dir)),
            classifier: Arc::new(classifier),
            pipeline: None,
            preview: None,
            nav: UiNavigator::default(),
            pending_endpoint: config.endpoint.clone(),
            config,
            config_path,
            status: String::new(),
            app_version: env!("FRESHCAM_VERSION"),
        })
    }

    fn follow(&mut self, ctx: &egui::Context, route: Route) {
        match route {
            Route::Result(uri) => {
                self.close_result();
                let handle = ImageHandle::from_uri(uri);
                self.preview = load_preview(ctx, Path::new(handle.local_path()));
                let repaint = ctx.clone();
                let mut pipeline = ClassificationPipeline::new(Arc::clone(&self.classifier))
                    .with_notifier(move || repaint.request_repaint());
                if let Err(e) = pipeline.submit(handle) {
                    tracing::warn!("could not start classification: {e}");
                    self.status = format!("Could not start analysis: {e}");
                }
                self.pipeline = Some(pipeline);
                self.panel = Panel::Result;
            }
            Route::Camera | Route::Back => {
                self.close_result();
                self.panel = Panel::Camera;
            }
        }
    }

    /// Leaving the result screen discards the photo and any verdict.
    fn close_result(&mut self) {
        if let Some(mut pipeline) = self.pipeline.take() {
            pipeline.leave();
        }
        self.preview = None;
    }
}

fn load_preview(ctx: &egui::Context, path: &Path) -> Option<egui::TextureHandle> {
    match image::open(path) {
        Ok(img) => {
            let thumb = img.thumbnail(PREVIEW_SIZE, PREVIEW_SIZE).to_rgba8();
            let (w, h) = thumb.dimensions();
            let size = [w as usize, h as usize];
            let pixels = thumb.into_raw();
            let color = egui::ColorImage::from_rgba_unmultiplied(size, &pixels);
            let name = format!("preview:{}", path.display());
            Some(ctx.load_texture(name, color, egui::TextureOptions::LINEAR))
        }
        Err(e) => {
            tracing::warn!("Failed to load preview for {}: {}", path.display(), e);
            None
        }
    }
}

impl App for UiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        if let Some(pipeline) = self.pipeline.as_mut() {
            pipeline.poll();
        }

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let on_camera = matches!(self.panel, Panel::Camera | Panel::Result);
                if ui.selectable_label(on_camera, "Camera").clicked() {
                    self.nav.go_to_camera();
                }
                if ui
                    .selectable_label(self.panel == Panel::Settings, "Settings")
                    .clicked()
                {
                    self.close_result();
                    self.panel = Panel::Settings;
                }
                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(&self.status);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.panel {
            Panel::Camera => self.render_camera_panel(ui),
            Panel::Result => self.render_result_panel(ui),
            Panel::Settings => self.render_settings_panel(ui),
        });

        if self.panel == Panel::Result && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.nav.go_back();
        }

        if let Some(route) = self.nav.pending.take() {
            self.follow(ctx, route);
        }
    }
}
