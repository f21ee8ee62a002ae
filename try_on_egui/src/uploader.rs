use try_on::{ImageFile, SlotRole};

use crate::file_picker::FilePicker;
use crate::preview::Preview;
use crate::{icons, ACCENT};

/// Clickable drop target for one slot. Holds no slot state: a chosen file is
/// returned to the owner, which supplies the preview on the next frame.
#[derive(Debug)]
pub(crate) struct ImageUploader {
    role: SlotRole,
    picker: FilePicker,
    region: Option<egui::Rect>,
}

impl ImageUploader {
    pub(crate) fn new(role: SlotRole) -> Self {
        Self {
            role,
            picker: FilePicker::default(),
            region: None,
        }
    }

    pub(crate) fn role(&self) -> SlotRole {
        self.role
    }

    /// Whether `pos` is over the region drawn last frame.
    pub(crate) fn contains(&self, pos: egui::Pos2) -> bool {
        self.region.is_some_and(|rect| rect.contains(pos))
    }

    #[must_use]
    pub(crate) fn show(
        &mut self,
        ui: &mut egui::Ui,
        preview: Option<&Preview>,
    ) -> Option<ImageFile> {
        crate::card(ui, self.role.title(), |ui| {
            ui.push_id(self.role.id(), |ui| self.show_region(ui, preview));
        });
        let picked = self.picker.take()?;
        match ImageFile::new(picked.file_name, picked.bytes) {
            Ok(file) => Some(file),
            Err(e) => {
                log::warn!("Ignoring picked file: {e}");
                None
            }
        }
    }

    fn show_region(&mut self, ui: &mut egui::Ui, preview: Option<&Preview>) {
        let width = ui.available_width();
        let size = egui::vec2(width, (width * 0.75).clamp(160.0, 420.0));
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
        self.region = Some(rect);

        let file_hovering = ui.ctx().input(|i| {
            !i.raw.hovered_files.is_empty()
                && i.pointer.latest_pos().is_some_and(|pos| rect.contains(pos))
        });
        let highlighted = response.hovered() || file_hovering;

        let painter = ui.painter_at(rect);
        let visuals = ui.visuals();
        painter.rect_filled(rect, 8.0, visuals.extreme_bg_color);

        match preview {
            Some(preview) => {
                if !preview.paint_fitted(&painter, rect) {
                    painter.text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        format!("{}\nPreview unavailable", preview.file_name()),
                        egui::FontId::proportional(14.0),
                        visuals.weak_text_color(),
                    );
                }
                if highlighted {
                    painter.rect_filled(rect, 8.0, egui::Color32::from_black_alpha(178));
                    painter.text(
                        rect.center() - egui::vec2(0.0, 14.0),
                        egui::Align2::CENTER_CENTER,
                        icons::UPLOAD,
                        egui::FontId::proportional(28.0),
                        egui::Color32::WHITE,
                    );
                    painter.text(
                        rect.center() + egui::vec2(0.0, 16.0),
                        egui::Align2::CENTER_CENTER,
                        "Change Image",
                        egui::FontId::proportional(16.0),
                        egui::Color32::WHITE,
                    );
                }
            }
            None => {
                let icon_color = if highlighted {
                    ACCENT
                } else {
                    visuals.weak_text_color()
                };
                painter.text(
                    rect.center() - egui::vec2(0.0, 30.0),
                    egui::Align2::CENTER_CENTER,
                    icons::role(self.role),
                    egui::FontId::proportional(48.0),
                    icon_color,
                );
                painter.text(
                    rect.center() + egui::vec2(0.0, 16.0),
                    egui::Align2::CENTER_CENTER,
                    self.role.call_to_action(),
                    egui::FontId::proportional(16.0),
                    visuals.text_color(),
                );
                painter.text(
                    rect.center() + egui::vec2(0.0, 38.0),
                    egui::Align2::CENTER_CENTER,
                    "Click to browse",
                    egui::FontId::proportional(13.0),
                    visuals.weak_text_color(),
                );
            }
        }

        let border = if highlighted {
            ACCENT
        } else {
            visuals.widgets.noninteractive.bg_stroke.color
        };
        painter.rect_stroke(rect, 8.0, egui::Stroke::new(2.0, border));

        if response
            .on_hover_cursor(egui::CursorIcon::PointingHand)
            .clicked()
        {
            self.picker.open(ui.ctx(), self.role.title());
        }
    }
}
