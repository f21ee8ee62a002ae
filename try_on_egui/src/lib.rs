#![warn(clippy::all, rust_2018_idioms)]

mod app;
mod download;
mod file_picker;
mod icons;
mod preview;
mod result_display;
mod uploader;
pub use app::TryOnApp;

const ACCENT: egui::Color32 = egui::Color32::from_rgb(251, 191, 36);
const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(248, 113, 113);

/// Titled panel shared by the uploaders and the result display.
fn card<R>(
    ui: &mut egui::Ui,
    title: &str,
    add_contents: impl FnOnce(&mut egui::Ui) -> R,
) -> R {
    egui::Frame::group(ui.style())
        .rounding(16.0)
        .inner_margin(16.0)
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(egui::RichText::new(title).color(ACCENT).strong());
            });
            ui.add_space(8.0);
            add_contents(ui)
        })
        .inner
}
