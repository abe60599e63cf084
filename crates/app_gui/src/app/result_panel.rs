//! Result screen: one layout per pipeline state.

use super::UiApp;
use eframe::egui;
use freshcam_core::view::{RESULT_TITLE, TAKE_ANOTHER};
use freshcam_core::{Fact, Navigator, ResultView, SuccessView, Tone};

const DANGER: egui::Color32 = egui::Color32::from_rgb(0xE5, 0x39, 0x35);
const INFO: egui::Color32 = egui::Color32::from_rgb(0x21, 0x96, 0xF3);
const SUCCESS: egui::Color32 = egui::Color32::from_rgb(0x66, 0xBB, 0x6A);
const MUTED: egui::Color32 = egui::Color32::from_gray(0x77);

fn tone_color(tone: Tone) -> egui::Color32 {
    match tone {
        Tone::Info => INFO,
        Tone::Success => SUCCESS,
        Tone::Danger => DANGER,
    }
}

impl UiApp {
    pub(super) fn render_result_panel(&mut self, ui: &mut egui::Ui) {
        let view = self
            .pipeline
            .as_ref()
            .map(|p| p.view())
            .unwrap_or(ResultView::Idle);

        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            match view {
                ResultView::Idle => {
                    ui.label("No photo to analyze.");
                }
                ResultView::Loading { message } => {
                    ui.add(egui::Spinner::new().size(32.0));
                    ui.label(message);
                }
                ResultView::Failed { reason } => {
                    ui.colored_label(DANGER, egui::RichText::new(reason).strong().size(17.0));
                    ui.add_space(12.0);
                    if ui.button("Try Again").clicked()
                        && let Some(pipeline) = self.pipeline.as_mut()
                        && let Err(e) = pipeline.retry()
                    {
                        tracing::warn!("retry rejected: {e}");
                    }
                }
                ResultView::Success(success) => {
                    egui::ScrollArea::vertical()
                        .auto_shrink([false; 2])
                        .show(ui, |ui| {
                            ui.vertical_centered(|ui| self.render_success(ui, &success));
                        });
                }
            }
            ui.add_space(24.0);
            if ui.button(TAKE_ANOTHER).clicked() {
                self.nav.go_to_camera();
            }
        });
    }

    fn render_success(&self, ui: &mut egui::Ui, view: &SuccessView) {
        if let Some(tex) = &self.preview {
            let size = tex.size_vec2();
            let (resp, painter) = ui.allocate_painter(size, egui::Sense::hover());
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(tex.id(), resp.rect, uv, egui::Color32::WHITE);
            ui.add_space(16.0);
        }
        ui.heading(RESULT_TITLE);
        ui.add_space(12.0);

        info_box(ui, "Fruit", egui::RichText::new(&view.fruit_name));
        info_box(
            ui,
            "Ripeness",
            egui::RichText::new(&view.ripeness_label).color(tone_color(view.tone)),
        );
        info_box(ui, "Confidence", egui::RichText::new(&view.confidence));
        if let Some(source) = &view.source {
            ui.colored_label(MUTED, format!("Source: {source}"));
        }

        if let Some(rows) = &view.nutrition {
            section(ui, "Nutrition", rows);
        }
        if let Some(rows) = &view.environmental_impact {
            section(ui, "Environmental impact", rows);
        }
        if let Some(rows) = &view.safety {
            section(ui, "Food safety", rows);
        }
        if !view.health_benefits.is_empty() {
            ui.add_space(10.0);
            ui.strong("Health benefits");
            for benefit in &view.health_benefits {
                ui.label(format!("• {benefit}"));
            }
        }
        if let Some(tip) = &view.waste_reduction_tip {
            ui.add_space(10.0);
            ui.label(egui::RichText::new(tip).italics());
        }
        for recipe in &view.recipes {
            ui.add_space(10.0);
            egui::CollapsingHeader::new(recipe.name.as_str())
                .id_salt(("recipe", &recipe.name))
                .show(ui, |ui| {
                    if let Some(subtitle) = &recipe.subtitle {
                        ui.colored_label(MUTED, subtitle.as_str());
                    }
                    if let Some(why) = &recipe.why_this_ripeness {
                        ui.label(egui::RichText::new(why.as_str()).italics());
                    }
                    for ingredient in &recipe.ingredients {
                        ui.label(format!("• {ingredient}"));
                    }
                    if let Some(instructions) = &recipe.instructions {
                        ui.label(instructions.as_str());
                    }
                });
        }
    }
}

fn info_box(ui: &mut egui::Ui, label: &str, value: egui::RichText) {
    ui.add_space(6.0);
    ui.colored_label(MUTED, label);
    ui.label(value.strong().size(22.0));
}

fn section(ui: &mut egui::Ui, title: &str, rows: &[Fact]) {
    ui.add_space(10.0);
    ui.strong(title);
    egui::Grid::new(title).num_columns(2).show(ui, |ui| {
        for fact in rows {
            ui.colored_label(MUTED, fact.label);
            ui.label(&fact.value);
            ui.end_row();
        }
    });
}
