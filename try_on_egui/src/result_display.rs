use try_on::ResultView;

use crate::preview::Preview;
use crate::{icons, ACCENT};

/// Shows loading, the generated image or the placeholder, in that order of
/// precedence. Returns `true` when "Download Image" was clicked.
#[must_use]
pub(crate) fn show(ui: &mut egui::Ui, view: ResultView<'_>, image: Option<&Preview>) -> bool {
    crate::card(ui, "Generated Image", |ui| {
        let width = ui.available_width();
        let size = egui::vec2(width, (width * 1.1).clamp(240.0, 720.0));
        match view {
            ResultView::Loading => {
                show_loading(ui, size);
                false
            }
            ResultView::Image(payload) => {
                let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
                let painter = ui.painter_at(rect);
                painter.rect_filled(rect, 8.0, ui.visuals().extreme_bg_color);
                if !image.is_some_and(|image| image.paint_fitted(&painter, rect)) {
                    painter.text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        format!("Cannot display {} image", payload.mime()),
                        egui::FontId::proportional(14.0),
                        ui.visuals().weak_text_color(),
                    );
                }
                ui.add_space(16.0);
                ui.vertical_centered(|ui| {
                    let label = egui::RichText::new(format!("{} Download Image", icons::DOWNLOAD))
                        .size(16.0)
                        .strong()
                        .color(egui::Color32::from_rgb(30, 41, 59));
                    ui.add(
                        egui::Button::new(label)
                            .fill(ACCENT)
                            .rounding(20.0)
                            .min_size(egui::vec2(180.0, 40.0)),
                    )
                    .clicked()
                })
                .inner
            }
            ResultView::Placeholder => {
                show_placeholder(ui, size);
                false
            }
        }
    })
}

fn show_loading(ui: &mut egui::Ui, size: egui::Vec2) {
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 8.0, ui.visuals().extreme_bg_color);

    // pulse between half and full opacity
    let time = ui.input(|i| i.time);
    let alpha = 0.5 + 0.5 * (time * 3.0).sin().abs() as f32;
    painter.text(
        rect.center() - egui::vec2(0.0, 48.0),
        egui::Align2::CENTER_CENTER,
        icons::SPARKLES,
        egui::FontId::proportional(48.0),
        ACCENT.gamma_multiply(alpha),
    );
    painter.text(
        rect.center() + egui::vec2(0.0, 8.0),
        egui::Align2::CENTER_CENTER,
        "AI is crafting your look...",
        egui::FontId::proportional(18.0),
        ui.visuals().text_color().gamma_multiply(alpha),
    );
    painter.text(
        rect.center() + egui::vec2(0.0, 32.0),
        egui::Align2::CENTER_CENTER,
        "This may take a moment.",
        egui::FontId::proportional(13.0),
        ui.visuals().weak_text_color(),
    );
    let spinner = egui::Rect::from_center_size(
        rect.center() + egui::vec2(0.0, 72.0),
        egui::vec2(24.0, 24.0),
    );
    // the spinner repaints while visible, which also drives the pulse
    ui.put(spinner, egui::Spinner::new().size(24.0).color(ACCENT));
}

fn show_placeholder(ui: &mut egui::Ui, size: egui::Vec2) {
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    let painter = ui.painter_at(rect);
    let weak = ui.visuals().weak_text_color();
    painter.rect_filled(rect, 8.0, ui.visuals().extreme_bg_color);
    painter.text(
        rect.center() - egui::vec2(0.0, 56.0),
        egui::Align2::CENTER_CENTER,
        icons::PICTURE,
        egui::FontId::proportional(64.0),
        weak,
    );
    painter.text(
        rect.center() + egui::vec2(0.0, 8.0),
        egui::Align2::CENTER_CENTER,
        "Your Masterpiece Awaits",
        egui::FontId::proportional(22.0),
        ui.visuals().text_color(),
    );
    let galley = painter.layout(
        "Upload images and click 'Create Try-On' to see the magic happen here.".to_string(),
        egui::FontId::proportional(14.0),
        weak,
        (rect.width() - 64.0).clamp(120.0, 380.0),
    );
    let pos = egui::pos2(rect.center().x - galley.size().x / 2.0, rect.center().y + 34.0);
    painter.galley(pos, galley, weak);
}
