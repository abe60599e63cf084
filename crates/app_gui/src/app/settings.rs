//! Settings panel rendering for the classification endpoint and photo folder.

use super::{Panel, UiApp};
use crate::camera::DesktopCamera;
use eframe::egui;
use freshcam_core::{CaptureController, HttpClassifier};
use rfd::FileDialog;
use std::sync::Arc;

impl UiApp {
    /// Renders the settings screen including endpoint options and versions.
    pub(super) fn render_settings_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Settings");
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.label("Classification service");
            ui.text_edit_singleline(&mut self.pending_endpoint.base_url);
        });
        ui.add_space(6.0);
        ui.checkbox(
            &mut self.pending_endpoint.include_nutrition,
            "Include nutrition and environmental impact",
        );
        ui.checkbox(
            &mut self.pending_endpoint.include_recipes,
            "Include recipes and storage tips",
        );
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label("Request timeout");
            ui.add(
                egui::DragValue::new(&mut self.pending_endpoint.timeout_secs)
                    .range(0..=300)
                    .suffix(" s")
                    .speed(1),
            );
        });
        ui.label("0 keeps the network default.");
        ui.add_space(8.0);
        if ui.button("Apply").clicked() {
            self.apply_endpoint();
        }

        ui.add_space(12.0);
        ui.separator();
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label("Photos folder");
            ui.label(self.capture.camera().photos_dir().display().to_string());
            if ui.button("Choose folder...").clicked()
                && let Some(dir) = FileDialog::new()
                    .set_directory(self.capture.camera().photos_dir())
                    .pick_folder()
            {
                self.config.camera.photos_dir = Some(dir.clone());
                self.capture = CaptureController::new(DesktopCamera::new(dir));
                self.save_config();
            }
        });

        ui.add_space(16.0);
        ui.separator();
        ui.add_space(6.0);
        ui.heading("Versions");
        ui.label(format!("App version: {}", self.app_version));
    }

    fn apply_endpoint(&mut self) {
        match HttpClassifier::new(&self.pending_endpoint) {
            Ok(classifier) => {
                tracing::info!("classification endpoint: {}", classifier.url());
                self.classifier = Arc::new(classifier);
                self.config.endpoint = self.pending_endpoint.clone();
                self.save_config();
                self.panel = Panel::Camera;
            }
            Err(e) => {
                self.status = format!("Invalid endpoint settings: {e:#}");
            }
        }
    }

    fn save_config(&mut self) {
        match self.config.save(&self.config_path) {
            Ok(()) => {
                self.status = format!("Settings saved to {}", self.config_path.display());
            }
            Err(e) => {
                tracing::warn!("saving settings failed: {e:#}");
                self.status = format!("Could not save settings: {e:#}");
            }
        }
    }
}
