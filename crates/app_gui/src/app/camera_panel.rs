use super::UiApp;
use eframe::egui;
use freshcam_core::CaptureView;

impl UiApp {
    pub(super) fn render_camera_panel(&mut self, ui: &mut egui::Ui) {
        self.capture.on_mount();

        match self.capture.view() {
            CaptureView::RequestingPermission => {
                ui.label("Loading permissions...");
            }
            CaptureView::PermissionPrompt => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.label("We need camera access to scan your fruit");
                    ui.label(format!(
                        "FreshCam cannot open {}",
                        self.capture.camera().photos_dir().display()
                    ));
                    ui.add_space(12.0);
                    if ui.button("Grant Permission").clicked() {
                        self.capture.retry_permission();
                    }
                });
            }
            CaptureView::Preview { ready } => {
                // Picking from disk needs no warm-up.
                if !ready {
                    self.capture.set_camera_ready(true);
                }
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.heading("Align your fruit inside the frame");
                    ui.add_space(20.0);
                    let shutter = egui::Button::new("Take Photo").min_size(egui::vec2(120.0, 48.0));
                    if ui.add_enabled(self.capture.can_capture(), shutter).clicked() {
                        self.capture.capture(&mut self.nav);
                    }
                });
            }
        }
    }
}
